//! File persistence and export configuration

/// Path for saving/loading application UI state
pub const APP_STATE_PATH: &str = ".dsf_viewer_state.json";

/// Base filename for exported result tables (without extension)
pub const EXPORT_FILENAME_WITHOUT_EXT: &str = "dsf_analysis_results";

/// Generate a date-stamped export filename
/// Example: "dsf_analysis_results_2026-08-06.csv"
pub fn stamped_export_filename() -> String {
    let stamp = chrono::Local::now().format("%Y-%m-%d");
    format!("{EXPORT_FILENAME_WITHOUT_EXT}_{stamp}.csv")
}
