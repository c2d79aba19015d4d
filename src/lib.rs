// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod session;
pub mod ui;

// Re-export commonly used types
pub use data::{FileFormat, load_plate_file};
pub use domain::{PlateGrid, PlateSize, natural_sort_wells};
pub use models::{CurveFeatures, PlateData, WellClass, WellCurve, WellRecord};
pub use session::{Page, SessionState};
pub use ui::DsfViewerApp;

// CLI argument parsing
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Load this instrument export at startup instead of starting empty
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// File format of the preloaded export (defaults to QuantStudio 7)
    #[arg(long, value_enum)]
    pub format: Option<FileFormat>,
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(
    cc: &eframe::CreationContext,
    preloaded: Option<PlateData>,
) -> Box<dyn eframe::App> {
    let app = ui::DsfViewerApp::new(cc, preloaded);
    Box::new(app)
}
