//! Dynamic-time-warping shape distance between melt curves.
//!
//! DTW compares the *shape* of two fluorescence traces independent of small
//! temperature shifts, which is what makes it usable for spotting wells whose
//! signal looks nothing like the reference (empty wells, aggregation, bad
//! seals). Curves are z-normalized first so absolute signal level drops out.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use rayon::prelude::*;
use statrs::statistics::Statistics;

use crate::config::ANALYSIS;
use crate::models::PlateData;

/// Z-normalize a sequence: zero mean, unit standard deviation.
///
/// Flat sequences (zero spread) normalize to all zeros rather than NaN.
pub fn z_normalize(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let mean = values.mean();
    let sd = values.std_dev();
    if !sd.is_finite() || sd <= f64::EPSILON {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - mean) / sd).collect()
}

/// DTW distance between two sequences, normalized by their combined length
/// so plates with different read counts stay comparable.
pub fn dtw_distance(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return f64::INFINITY;
    }

    let m = b.len();
    let mut previous = vec![f64::INFINITY; m + 1];
    let mut current = vec![f64::INFINITY; m + 1];
    previous[0] = 0.0;

    for &ai in a {
        current[0] = f64::INFINITY;
        for j in 1..=m {
            let cost = (ai - b[j - 1]).abs();
            let best = previous[j].min(previous[j - 1]).min(current[j - 1]);
            current[j] = cost + best;
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[m] / (a.len() + b.len()) as f64
}

/// DTW distance of every well from the reference well, over the readings
/// inside `[min_temp, max_temp]`, z-normalized. Computed in parallel.
pub fn distances_from_reference(
    data: &PlateData,
    reference: &str,
    min_temp: f64,
    max_temp: f64,
) -> Result<BTreeMap<String, f64>> {
    let reference_curve = data.curve_for(reference)?;
    let (_, reference_fluor) = reference_curve.filtered(min_temp, max_temp);
    if reference_fluor.len() < ANALYSIS.fit.min_points {
        bail!(
            "reference well {reference} has only {} readings between {min_temp:.1} and {max_temp:.1} °C",
            reference_fluor.len()
        );
    }
    let reference_normalized = z_normalize(&reference_fluor);

    let distances: BTreeMap<String, f64> = data
        .curves
        .par_iter()
        .map(|curve| {
            let (_, fluor) = curve.filtered(min_temp, max_temp);
            let normalized = z_normalize(&fluor);
            let distance = dtw_distance(&normalized, &reference_normalized);
            (curve.well.clone(), distance)
        })
        .collect();

    Ok(distances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FileFormat;
    use crate::domain::PlateSize;
    use crate::models::WellCurve;

    fn sigmoid(tm: f64) -> Vec<f64> {
        (0..120)
            .map(|i| {
                let t = 25.0 + 0.5 * i as f64;
                1.0 / (1.0 + (-(t - tm) / 1.5).exp())
            })
            .collect()
    }

    #[test]
    fn identical_sequences_have_zero_distance() {
        let a = sigmoid(50.0);
        assert!(dtw_distance(&a, &a) < 1e-12);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = sigmoid(50.0);
        let b = sigmoid(58.0);
        let ab = dtw_distance(&a, &b);
        let ba = dtw_distance(&b, &a);
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn z_normalization_removes_scale_and_offset() {
        let a = sigmoid(50.0);
        let scaled: Vec<f64> = a.iter().map(|v| 250.0 * v + 1000.0).collect();
        let distance = dtw_distance(&z_normalize(&a), &z_normalize(&scaled));
        assert!(distance < 1e-9, "affine rescaling should not change shape");
    }

    #[test]
    fn flat_sequences_normalize_to_zeros() {
        let flat = vec![7.0; 40];
        assert!(z_normalize(&flat).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn a_shifted_sigmoid_is_closer_than_a_flat_line() {
        let reference = z_normalize(&sigmoid(50.0));
        let shifted = z_normalize(&sigmoid(54.0));
        let flat = z_normalize(&vec![0.5; 120]);

        let shifted_distance = dtw_distance(&shifted, &reference);
        let flat_distance = dtw_distance(&flat, &reference);
        assert!(
            shifted_distance < flat_distance,
            "shifted sigmoid ({shifted_distance:.3}) should beat a flat line ({flat_distance:.3})"
        );
    }

    #[test]
    fn reference_well_reports_zero_distance_to_itself() {
        let curves = vec![
            WellCurve {
                well: "A1".to_string(),
                temperatures: (0..120).map(|i| 25.0 + 0.5 * i as f64).collect(),
                fluorescence: sigmoid(50.0),
            },
            WellCurve {
                well: "A2".to_string(),
                temperatures: (0..120).map(|i| 25.0 + 0.5 * i as f64).collect(),
                fluorescence: sigmoid(56.0),
            },
        ];
        let data = PlateData {
            format: FileFormat::LightCycler480,
            plate_size: PlateSize::Wells96,
            curves,
            available_wells: vec!["A1".to_string(), "A2".to_string()],
            min_temp: 25.0,
            max_temp: 84.5,
        };

        let distances = distances_from_reference(&data, "A1", 25.0, 84.5).unwrap();
        assert_eq!(distances.len(), 2);
        assert!(distances["A1"] < 1e-12);
        assert!(distances["A2"] > distances["A1"]);
    }
}
