//! Configuration module for the DSF viewer application.

pub mod analysis;

mod debug; // Private; the re-export below forces call sites through crate::config::
pub use debug::{
    PRINT_ANALYSIS_TIMINGS, PRINT_PARSE_EVENTS, PRINT_STATE_SERDE, PRINT_UI_INTERACTIONS,
};

pub mod persistence;
pub mod plot;

// Re-export commonly used items
pub use analysis::ANALYSIS;
pub use persistence::{APP_STATE_PATH, EXPORT_FILENAME_WITHOUT_EXT, stamped_export_filename};
pub use plot::PLOT_CONFIG;
