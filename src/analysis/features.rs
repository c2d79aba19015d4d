//! Per-well melt-curve feature extraction.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use argminmax::ArgMinMax;
use find_peaks::PeakFinder;
use rayon::prelude::*;

use crate::analysis::smoothing::{bandwidth, central_derivative, dense_grid, gaussian_smooth};
use crate::config::ANALYSIS;
use crate::models::{CurveFeatures, PlateData, WellClass, WellCurve, WellRecord};

/// Parameters of one fit: the temperature window and the smoothing factor.
#[derive(Debug, Clone, Copy)]
pub struct FitParams {
    pub min_temp: f64,
    pub max_temp: f64,
    pub smoothing: f64,
}

/// Fit a well's melt curve and extract its features.
///
/// Restricts the readings to the configured temperature window, fits the
/// smoothing curve on a dense grid, takes the derivative, and reads Tm off
/// the strongest unfolding peak. `avg_control_tm` turns Tm into a shift.
pub fn extract_curve_features(
    curve: &WellCurve,
    params: &FitParams,
    avg_control_tm: Option<f64>,
) -> Result<CurveFeatures> {
    let (temps, fluor) = curve.filtered(params.min_temp, params.max_temp);

    if temps.len() < ANALYSIS.fit.min_points {
        bail!(
            "well {}: only {} readings between {:.1} and {:.1} °C (need at least {})",
            curve.well,
            temps.len(),
            params.min_temp,
            params.max_temp,
            ANALYSIS.fit.min_points
        );
    }

    let first = temps[0];
    let last = temps[temps.len() - 1];
    let span = last - first;
    if span <= 0.0 {
        bail!("well {}: temperature range collapses to a point", curve.well);
    }

    let grid_len = (temps.len() * ANALYSIS.fit.dense_grid_factor)
        .max(ANALYSIS.fit.dense_grid_min_points);
    let x_spline = dense_grid(first, last, grid_len);
    let h = bandwidth(params.smoothing, span, temps.len());
    let y_spline = gaussian_smooth(&temps, &fluor, &x_spline, h);
    let y_spline_derivative = central_derivative(&x_spline, &y_spline);

    let tm_index = melt_peak_index(&y_spline_derivative);
    let (min_index, max_index) = y_spline.argminmax();

    let tm = x_spline[tm_index];
    let raw_points = temps.iter().zip(&fluor).map(|(&t, &f)| [t, f]).collect();

    Ok(CurveFeatures {
        tm,
        delta_tm: avg_control_tm.map(|avg| tm - avg),
        min_fluorescence: y_spline[min_index],
        max_fluorescence: y_spline[max_index],
        temp_at_min: x_spline[min_index],
        temp_at_max: x_spline[max_index],
        max_derivative_value: y_spline_derivative[tm_index],
        raw_points,
        x_spline,
        y_spline,
        y_spline_derivative,
    })
}

/// Index of the melt transition in the derivative trace.
///
/// The strongest sufficiently-prominent peak wins; when peak detection finds
/// nothing (flat or monotone signals) the global derivative maximum is used.
fn melt_peak_index(derivative: &[f64]) -> usize {
    let (min_index, max_index) = derivative.argminmax();
    let relief = derivative[max_index] - derivative[min_index];

    if relief > 0.0 {
        let mut finder = PeakFinder::new(derivative);
        finder.with_min_prominence(relief * ANALYSIS.fit.peak_prominence_fraction);
        let best = finder
            .find_peaks()
            .into_iter()
            .map(|peak| peak.middle_position())
            .max_by(|a, b| {
                derivative[*a]
                    .partial_cmp(&derivative[*b])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        if let Some(index) = best {
            return index;
        }
    }

    max_index
}

/// Fit every well of the plate with one set of parameters, in parallel.
///
/// Fit failures become `WellRecord::failed` entries instead of aborting the
/// batch, so a single empty well never blocks the rest of the plate.
pub fn analyze_plate(
    data: &PlateData,
    wells: &[String],
    params: &FitParams,
    avg_control_tm: Option<f64>,
    classes: &BTreeMap<String, WellClass>,
) -> BTreeMap<String, WellRecord> {
    #[cfg(debug_assertions)]
    let started = std::time::Instant::now();

    let records: BTreeMap<String, WellRecord> = wells
        .par_iter()
        .map(|well| {
            let class = classes.get(well).copied().unwrap_or(WellClass::Typical);
            let record = match data
                .curve_for(well)
                .and_then(|curve| extract_curve_features(curve, params, avg_control_tm))
            {
                Ok(features) => WellRecord::fitted(
                    class,
                    params.smoothing,
                    params.min_temp,
                    params.max_temp,
                    features,
                ),
                Err(error) => WellRecord::failed(
                    class,
                    params.smoothing,
                    params.min_temp,
                    params.max_temp,
                    error.to_string(),
                ),
            };
            (well.clone(), record)
        })
        .collect();

    #[cfg(debug_assertions)]
    if crate::config::PRINT_ANALYSIS_TIMINGS {
        log::info!(
            "analyzed {} wells in {:?}",
            records.len(),
            started.elapsed()
        );
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sigmoid melt curve: low plateau, transition at `tm`, high plateau.
    fn sigmoid_curve(well: &str, tm: f64) -> WellCurve {
        let temperatures: Vec<f64> = (0..141).map(|i| 25.0 + 0.5 * i as f64).collect();
        let fluorescence = temperatures
            .iter()
            .map(|t| 100.0 + 900.0 / (1.0 + (-(t - tm) / 1.5).exp()))
            .collect();
        WellCurve {
            well: well.to_string(),
            temperatures,
            fluorescence,
        }
    }

    fn default_params() -> FitParams {
        FitParams {
            min_temp: 25.0,
            max_temp: 95.0,
            smoothing: 0.01,
        }
    }

    #[test]
    fn tm_lands_on_the_sigmoid_inflection() {
        let curve = sigmoid_curve("C5", 52.0);
        let features = extract_curve_features(&curve, &default_params(), None).unwrap();
        assert!(
            (features.tm - 52.0).abs() < 1.0,
            "Tm {:.2} should sit near the inflection at 52.0",
            features.tm
        );
        assert!(features.max_derivative_value > 0.0);
        assert!(features.delta_tm.is_none());
    }

    #[test]
    fn delta_tm_is_the_shift_against_the_control_average() {
        let curve = sigmoid_curve("D7", 55.0);
        let features = extract_curve_features(&curve, &default_params(), Some(52.0)).unwrap();
        let delta = features.delta_tm.expect("control average was provided");
        assert!((delta - 3.0).abs() < 1.5, "delta {delta:.2} should be near 3");
    }

    #[test]
    fn plateaus_give_the_fluorescence_extremes() {
        let curve = sigmoid_curve("A1", 50.0);
        let features = extract_curve_features(&curve, &default_params(), None).unwrap();
        assert!(features.min_fluorescence < 150.0);
        assert!(features.max_fluorescence > 950.0);
        assert!(features.temp_at_min < features.temp_at_max);
        assert!(features.fluorescence_range() > 800.0);
    }

    #[test]
    fn narrowing_the_window_restricts_the_fit() {
        let curve = sigmoid_curve("B2", 50.0);
        let params = FitParams {
            min_temp: 40.0,
            max_temp: 60.0,
            smoothing: 0.01,
        };
        let features = extract_curve_features(&curve, &params, None).unwrap();
        assert!(features.x_spline.first().copied().unwrap_or(0.0) >= 40.0);
        assert!(features.x_spline.last().copied().unwrap_or(100.0) <= 60.0);
        assert!((features.tm - 50.0).abs() < 1.0);
    }

    #[test]
    fn plate_batches_record_failures_instead_of_aborting() {
        use crate::data::FileFormat;
        use crate::domain::PlateSize;

        let good = sigmoid_curve("A1", 50.0);
        let sparse = WellCurve {
            well: "A2".to_string(),
            temperatures: vec![25.0, 26.0],
            fluorescence: vec![1.0, 1.1],
        };
        let wells = vec!["A1".to_string(), "A2".to_string()];
        let data = PlateData {
            format: FileFormat::LightCycler480,
            plate_size: PlateSize::Wells96,
            curves: vec![good, sparse],
            available_wells: wells.clone(),
            min_temp: 25.0,
            max_temp: 95.0,
        };
        let mut classes = BTreeMap::new();
        classes.insert("A2".to_string(), WellClass::Atypical);

        let records = analyze_plate(&data, &wells, &default_params(), Some(49.0), &classes);

        assert_eq!(records.len(), 2);
        let a1 = &records["A1"];
        assert_eq!(a1.class, WellClass::Typical, "unlisted wells default to typical");
        assert!(a1.features.is_some());
        let a2 = &records["A2"];
        assert_eq!(a2.class, WellClass::Atypical);
        assert!(a2.features.is_none());
        assert!(a2.fit_error.as_deref().unwrap_or("").contains("A2"));
    }

    #[test]
    fn too_few_readings_in_the_window_is_an_error() {
        let curve = sigmoid_curve("E3", 50.0);
        let params = FitParams {
            min_temp: 94.0,
            max_temp: 95.0,
            smoothing: 0.01,
        };
        let err = extract_curve_features(&curve, &params, None).unwrap_err();
        assert!(err.to_string().contains("E3"), "error names the well: {err}");
    }
}
