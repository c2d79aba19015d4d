// Domain models for DSF analysis
// These modules contain pure business logic independent of UI/visualization

pub mod classification;
pub mod curve;
pub mod features;

// Re-export key types for convenience
pub use classification::{WellClass, classify_by_distance};
pub use curve::{PlateData, WellCurve};
pub use features::{ControlSummary, CurveFeatures, WellRecord};
