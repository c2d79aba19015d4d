//! Writes a synthetic 96-well LightCycler-format dataset so the viewer can be
//! tried without real instrument data. Wells A1-A3 are the controls (shared
//! Tm), H10-H12 are left empty (flat noise), everything else melts at a
//! staggered Tm.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dsf_viewer::domain::plate::row_label;

const CONTROL_TM: f64 = 50.0;
const TEMP_START: f64 = 25.0;
const TEMP_END: f64 = 95.0;
const TEMP_STEP: f64 = 0.5;

#[derive(Parser, Debug)]
#[command(about = "Generate a synthetic DSF plate in LightCycler 480 text format")]
struct Args {
    /// Output path
    #[arg(long, default_value = "demo_plate.txt")]
    out: PathBuf,

    /// Noise seed, fixed so runs are reproducible
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    build_demo_plate(&args)
}

fn build_demo_plate(args: &Args) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(&args.out)
        .with_context(|| format!("creating {:?}", args.out))?;

    writer.write_record(["Pos", "Sample Name", "Temp", "Fluorescence"])?;

    let temperatures: Vec<f64> = {
        let steps = ((TEMP_END - TEMP_START) / TEMP_STEP) as usize;
        (0..=steps).map(|i| TEMP_START + TEMP_STEP * i as f64).collect()
    };

    let mut wells = 0usize;
    for row in 0..8 {
        for col in 1..=12u32 {
            let well = format!("{}{}", row_label(row), col);

            let is_control = row == 0 && col <= 3;
            let is_empty = row == 7 && col >= 10;

            let (sample_name, tm) = if is_control {
                ("control".to_string(), CONTROL_TM)
            } else if is_empty {
                ("empty".to_string(), 0.0)
            } else {
                // Staggered shifts around the control Tm
                (
                    format!("compound {:02}", row * 12 + col as usize),
                    rng.random_range(CONTROL_TM - 3.0..CONTROL_TM + 8.0),
                )
            };

            for &t in &temperatures {
                let fluorescence = if is_empty {
                    // No protein: baseline noise only
                    120.0 + rng.random_range(-10.0..10.0)
                } else {
                    let sigmoid = 900.0 / (1.0 + (-(t - tm) / 1.5).exp());
                    100.0 + sigmoid + rng.random_range(-8.0..8.0)
                };
                let temp_field = format!("{t:.2}");
                let fluor_field = format!("{fluorescence:.3}");
                writer.write_record([
                    well.as_str(),
                    sample_name.as_str(),
                    temp_field.as_str(),
                    fluor_field.as_str(),
                ])?;
            }
            wells += 1;
        }
    }

    writer.flush()?;
    println!(
        "✅ Demo plate written to {:?} ({} wells, {} readings each).",
        args.out,
        wells,
        temperatures.len()
    );
    println!("   Try: dsf-viewer --file {:?} --format lightcycler480", args.out);
    Ok(())
}
