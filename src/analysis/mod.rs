// Curve fitting, feature extraction and shape comparison
pub mod dtw;
pub mod features;
pub mod smoothing;

// Re-export commonly used items
pub use dtw::{distances_from_reference, dtw_distance};
pub use features::{FitParams, analyze_plate, extract_curve_features};
