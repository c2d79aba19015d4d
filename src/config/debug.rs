//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep the noisy ones `false` by default
//! so debug builds stay readable.

/// Emit UI interaction logs (page switches, well selection, manual actions).
pub const PRINT_UI_INTERACTIONS: bool = true;

/// Emit per-file parse summaries (row counts, skipped rows) during upload.
pub const PRINT_PARSE_EVENTS: bool = true;

/// Emit timings for whole-plate analysis and DTW runs.
pub const PRINT_ANALYSIS_TIMINGS: bool = false;

/// Emit details of UI state serialization/deserialization.
pub const PRINT_STATE_SERDE: bool = false;
