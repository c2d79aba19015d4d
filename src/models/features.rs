//! Typed per-well analysis records.
//!
//! Every field the dashboard displays or exports lives in a named struct
//! field; nothing is carried in stringly-keyed maps.

use crate::models::classification::WellClass;

/// The fitted features of one melt curve.
#[derive(Debug, Clone)]
pub struct CurveFeatures {
    /// Melting temperature: the temperature at the strongest unfolding rate.
    pub tm: f64,
    /// Tm shift against the control average, when one is known.
    pub delta_tm: Option<f64>,

    pub min_fluorescence: f64,
    pub max_fluorescence: f64,
    pub temp_at_min: f64,
    pub temp_at_max: f64,
    /// Derivative value at Tm ("max slope" in the UI).
    pub max_derivative_value: f64,

    // Fitted arrays for plotting
    pub raw_points: Vec<[f64; 2]>,
    pub x_spline: Vec<f64>,
    pub y_spline: Vec<f64>,
    pub y_spline_derivative: Vec<f64>,
}

impl CurveFeatures {
    pub fn fluorescence_range(&self) -> f64 {
        self.max_fluorescence - self.min_fluorescence
    }
}

/// The saved analysis of one well: classification, the parameters the fit was
/// run with, and the fit itself (or the reason it failed).
#[derive(Debug, Clone)]
pub struct WellRecord {
    pub class: WellClass,
    /// Set once a user has manually confirmed or changed the classification.
    pub reviewed: bool,

    // Parameters the stored features were computed with
    pub smoothing: f64,
    pub min_temp: f64,
    pub max_temp: f64,

    pub features: Option<CurveFeatures>,
    pub fit_error: Option<String>,
}

impl WellRecord {
    pub fn fitted(
        class: WellClass,
        smoothing: f64,
        min_temp: f64,
        max_temp: f64,
        features: CurveFeatures,
    ) -> Self {
        WellRecord {
            class,
            reviewed: false,
            smoothing,
            min_temp,
            max_temp,
            features: Some(features),
            fit_error: None,
        }
    }

    pub fn failed(
        class: WellClass,
        smoothing: f64,
        min_temp: f64,
        max_temp: f64,
        error: String,
    ) -> Self {
        WellRecord {
            class,
            reviewed: false,
            smoothing,
            min_temp,
            max_temp,
            features: None,
            fit_error: Some(error),
        }
    }

    pub fn is_atypical(&self) -> bool {
        self.class == WellClass::Atypical
    }
}

/// One row of the control-well summary table.
#[derive(Debug, Clone)]
pub struct ControlSummary {
    pub well: String,
    pub tm: f64,
    pub min_fluorescence: f64,
    pub max_fluorescence: f64,
    pub fluorescence_range: f64,
    pub max_slope: f64,
}

impl ControlSummary {
    pub fn from_features(well: &str, features: &CurveFeatures) -> Self {
        ControlSummary {
            well: well.to_string(),
            tm: features.tm,
            min_fluorescence: features.min_fluorescence,
            max_fluorescence: features.max_fluorescence,
            fluorescence_range: features.fluorescence_range(),
            max_slope: features.max_derivative_value,
        }
    }
}
