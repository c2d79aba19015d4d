//! Smoothing fit of a melt curve onto a dense temperature grid.
//!
//! The instrument samples fluorescence at fixed temperature steps; the fit
//! resamples those readings onto a dense uniform grid with a Gaussian kernel
//! whose bandwidth follows the user-facing smoothing factor. A factor of 0
//! stays close to interpolation, a factor of 1 flattens most of the noise.

use crate::config::ANALYSIS;

/// Uniform grid of `len` points spanning `[start, end]` inclusive.
pub fn dense_grid(start: f64, end: f64, len: usize) -> Vec<f64> {
    if len < 2 {
        return vec![start];
    }
    let step = (end - start) / (len - 1) as f64;
    (0..len).map(|i| start + step * i as f64).collect()
}

/// Kernel bandwidth in temperature units for a smoothing factor in `[0, 1]`.
///
/// The floor is the mean sample spacing so the estimate always sees a few
/// readings; above that the bandwidth grows linearly with the factor up to a
/// fixed fraction of the fitted span.
pub fn bandwidth(smoothing: f64, span: f64, n_points: usize) -> f64 {
    let spacing = span / n_points.max(1) as f64;
    let smoothing = smoothing.clamp(0.0, 1.0);
    spacing + smoothing * span * ANALYSIS.fit.max_bandwidth_fraction
}

/// Gaussian-kernel estimate of `ys` over `grid`.
///
/// `xs`/`ys` are the observed readings (any order), `grid` the evaluation
/// points. Weights more than four bandwidths away are negligible and skipped.
pub fn gaussian_smooth(xs: &[f64], ys: &[f64], grid: &[f64], bandwidth: f64) -> Vec<f64> {
    debug_assert_eq!(xs.len(), ys.len());
    let cutoff = 4.0 * bandwidth;

    grid.iter()
        .map(|&g| {
            let mut weight_sum = 0.0;
            let mut value_sum = 0.0;
            let mut nearest = (f64::INFINITY, 0.0);

            for (&x, &y) in xs.iter().zip(ys) {
                let distance = (x - g).abs();
                if distance < nearest.0 {
                    nearest = (distance, y);
                }
                if distance > cutoff {
                    continue;
                }
                let z = distance / bandwidth;
                let weight = (-0.5 * z * z).exp();
                weight_sum += weight;
                value_sum += weight * y;
            }

            if weight_sum > 0.0 {
                value_sum / weight_sum
            } else {
                // Grid point far from every reading: fall back to the nearest one.
                nearest.1
            }
        })
        .collect()
}

/// Central-difference derivative of `ys` with respect to `xs`; one-sided at
/// the ends. `xs` must be strictly increasing.
pub fn central_derivative(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let mut derivative = Vec::with_capacity(n);
    derivative.push((ys[1] - ys[0]) / (xs[1] - xs[0]));
    for i in 1..n - 1 {
        derivative.push((ys[i + 1] - ys[i - 1]) / (xs[i + 1] - xs[i - 1]));
    }
    derivative.push((ys[n - 1] - ys[n - 2]) / (xs[n - 1] - xs[n - 2]));
    derivative
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_grid_spans_the_range_inclusively() {
        let grid = dense_grid(25.0, 95.0, 141);
        assert_eq!(grid.len(), 141);
        assert!((grid[0] - 25.0).abs() < 1e-9);
        assert!((grid[140] - 95.0).abs() < 1e-9);
        assert!((grid[1] - grid[0] - 0.5).abs() < 1e-9, "uniform 0.5 step");
    }

    #[test]
    fn smoothing_a_constant_signal_returns_the_constant() {
        let xs: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let ys = vec![3.25; 50];
        let grid = dense_grid(0.0, 49.0, 200);
        let smoothed = gaussian_smooth(&xs, &ys, &grid, 2.0);
        for value in smoothed {
            assert!((value - 3.25).abs() < 1e-9);
        }
    }

    #[test]
    fn larger_bandwidth_flattens_noise_harder() {
        // Alternating noise around zero; a wide kernel should nearly cancel it.
        let xs: Vec<f64> = (0..100).map(|i| i as f64 * 0.5).collect();
        let ys: Vec<f64> = (0..100).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let grid = dense_grid(5.0, 44.5, 80);

        let rough = gaussian_smooth(&xs, &ys, &grid, 0.2);
        let smooth = gaussian_smooth(&xs, &ys, &grid, 3.0);

        let amplitude = |v: &[f64]| v.iter().map(|y| y.abs()).fold(0.0_f64, f64::max);
        assert!(
            amplitude(&smooth) < amplitude(&rough),
            "wide kernel should damp alternating noise more than a narrow one"
        );
        assert!(amplitude(&smooth) < 0.1);
    }

    #[test]
    fn derivative_of_a_linear_ramp_is_its_slope() {
        let xs: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.5 * x + 1.0).collect();
        for slope in central_derivative(&xs, &ys) {
            assert!((slope - 2.5).abs() < 1e-9);
        }
    }

    #[test]
    fn bandwidth_grows_with_the_smoothing_factor() {
        let narrow = bandwidth(0.0, 40.0, 100);
        let wide = bandwidth(1.0, 40.0, 100);
        assert!(narrow < wide);
        assert!(narrow > 0.0, "floor keeps the kernel from collapsing");
    }
}
