use std::path::PathBuf;

use clap::Parser;
use eframe::NativeOptions;

use dsf_viewer::{Cli, FileFormat, load_plate_file, run_app};

fn main() -> eframe::Result {
    // A. Init logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Optional preload from the command line
    let format = args.format.unwrap_or(FileFormat::QuantStudio7);
    let preloaded = args.file.as_ref().and_then(|path| {
        match load_plate_file(path, format) {
            Ok(data) => {
                log::info!(
                    "preloaded {} wells from {}",
                    data.well_count(),
                    path.display()
                );
                Some(data)
            }
            Err(error) => {
                log::error!("could not preload {}: {error:#}", path.display());
                None
            }
        }
    });

    // D. Run native app
    let options = NativeOptions {
        persistence_path: Some(PathBuf::from(dsf_viewer::config::APP_STATE_PATH)),
        ..Default::default()
    };

    eframe::run_native(
        "DSF Viewer - melt curves, shifted.",
        options,
        Box::new(move |cc| Ok(run_app(cc, preloaded))),
    )
}
