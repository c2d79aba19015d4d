//! Analysis and computation configuration

/// Settings for the smoothing fit and feature extraction
pub struct FitSettings {
    // Default spline smoothing factor (same default the UI sliders start at)
    pub default_smoothing: f64,
    // Minimum readings inside the temperature window for a valid fit
    pub min_points: usize,
    // Dense evaluation grid: readings * factor, but never fewer than the floor
    pub dense_grid_factor: usize,
    pub dense_grid_min_points: usize,
    // Kernel bandwidth at smoothing = 1.0, as a fraction of the fitted span
    pub max_bandwidth_fraction: f64,
    // A derivative peak must rise above this fraction of the derivative relief
    pub peak_prominence_fraction: f64,
}

/// Settings for atypical-well detection
pub struct DetectionSettings {
    // Wells at or below this DTW distance count as typical
    pub default_lower_threshold: f64,
    // Wells at or above this DTW distance count as atypical
    pub default_upper_threshold: f64,
    // Upper bound of the threshold inputs
    pub threshold_max: f64,
}

/// The Master Analysis Configuration
pub struct AnalysisConfig {
    pub fit: FitSettings,
    pub detection: DetectionSettings,
    // Step size of every smoothing slider
    pub smoothing_step: f64,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    fit: FitSettings {
        default_smoothing: 0.01,
        min_points: 8,
        dense_grid_factor: 4,
        dense_grid_min_points: 200,
        max_bandwidth_fraction: 0.15,
        peak_prominence_fraction: 0.05,
    },

    detection: DetectionSettings {
        default_lower_threshold: 0.5,
        default_upper_threshold: 1.5,
        threshold_max: 10.0,
    },

    smoothing_step: 0.01,
};
