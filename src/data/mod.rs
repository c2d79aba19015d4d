// Instrument-file parsing and result export
pub mod export;
pub mod lightcycler;
pub mod quantstudio;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result, bail};
use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::domain::{PlateSize, natural_sort_wells};
use crate::models::{PlateData, WellCurve};

/// Supported plate-reader export formats.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, clap::ValueEnum,
)]
pub enum FileFormat {
    #[strum(to_string = "QuantStudio 7")]
    #[value(name = "quantstudio7")]
    QuantStudio7,
    #[strum(to_string = "LightCycler 480")]
    #[value(name = "lightcycler480")]
    LightCycler480,
}

/// One acquisition row as it comes out of a parser: a well label plus a
/// single temperature/fluorescence pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReading {
    pub well: String,
    pub temperature: f64,
    pub fluorescence: f64,
}

/// Parse an instrument export from disk into [`PlateData`].
pub fn load_plate_file(path: &Path, format: FileFormat) -> Result<PlateData> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);

    let readings = match format {
        FileFormat::QuantStudio7 => quantstudio::parse(reader),
        FileFormat::LightCycler480 => lightcycler::parse(reader),
    }
    .with_context(|| format!("parsing {} as {format}", path.display()))?;

    assemble_plate(readings, format)
}

/// Group flat readings into per-well curves and derive the plate metadata.
pub fn assemble_plate(readings: Vec<RawReading>, format: FileFormat) -> Result<PlateData> {
    if readings.is_empty() {
        bail!("the file contained no usable readings");
    }

    let mut per_well: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
    for reading in readings {
        per_well
            .entry(reading.well)
            .or_default()
            .push((reading.temperature, reading.fluorescence));
    }

    let plate_size = match format {
        // QuantStudio melt exports come from 384-well blocks
        FileFormat::QuantStudio7 => PlateSize::Wells384,
        FileFormat::LightCycler480 => PlateSize::from_distinct_wells(per_well.len()),
    };

    let mut curves = Vec::with_capacity(per_well.len());
    for (well, mut points) in per_well {
        points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        let (temperatures, fluorescence) = points.into_iter().unzip();
        curves.push(WellCurve {
            well,
            temperatures,
            fluorescence,
        });
    }

    let labels: Vec<String> = curves.iter().map(|c| c.well.clone()).collect();
    let available_wells = natural_sort_wells(&labels);

    let (min_temp, max_temp) = match curves
        .iter()
        .flat_map(|c| c.temperatures.iter().copied())
        .minmax()
    {
        MinMaxResult::MinMax(min, max) => (min, max),
        MinMaxResult::OneElement(only) => (only, only),
        MinMaxResult::NoElements => bail!("the file contained wells but no temperatures"),
    };

    #[cfg(debug_assertions)]
    if crate::config::PRINT_PARSE_EVENTS {
        log::info!(
            "assembled {} wells ({plate_size}-well plate), {:.1}-{:.1} °C",
            curves.len(),
            min_temp,
            max_temp
        );
    }

    Ok(PlateData {
        format,
        plate_size,
        curves,
        available_wells,
        min_temp,
        max_temp,
    })
}

/// Parse a numeric cell, tolerating thousands separators ("1,234.56").
pub(crate) fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains(',') {
        trimmed.replace(',', "").parse().ok()
    } else {
        trimmed.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(well: &str, temperature: f64, fluorescence: f64) -> RawReading {
        RawReading {
            well: well.to_string(),
            temperature,
            fluorescence,
        }
    }

    #[test]
    fn readings_group_into_sorted_curves() {
        let readings = vec![
            reading("A1", 30.0, 12.0),
            reading("A1", 25.0, 10.0),
            reading("B1", 25.0, 20.0),
            reading("A1", 35.0, 14.0),
            reading("B1", 30.0, 22.0),
        ];
        let plate = assemble_plate(readings, FileFormat::LightCycler480).unwrap();

        assert_eq!(plate.well_count(), 2);
        assert_eq!(plate.plate_size, PlateSize::Wells96);
        let a1 = plate.curve_for("A1").unwrap();
        assert_eq!(a1.temperatures, vec![25.0, 30.0, 35.0], "sorted by temperature");
        assert_eq!(a1.fluorescence, vec![10.0, 12.0, 14.0]);
        assert_eq!(plate.min_temp, 25.0);
        assert_eq!(plate.max_temp, 35.0);
    }

    #[test]
    fn available_wells_come_out_in_plate_order() {
        let readings = vec![
            reading("A10", 25.0, 1.0),
            reading("A2", 25.0, 1.0),
            reading("A1", 25.0, 1.0),
        ];
        let plate = assemble_plate(readings, FileFormat::LightCycler480).unwrap();
        assert_eq!(plate.available_wells, vec!["A1", "A2", "A10"]);
    }

    #[test]
    fn quantstudio_plates_are_always_384() {
        let readings = vec![reading("A1", 25.0, 1.0)];
        let plate = assemble_plate(readings, FileFormat::QuantStudio7).unwrap();
        assert_eq!(plate.plate_size, PlateSize::Wells384);
    }

    #[test]
    fn empty_uploads_are_rejected() {
        assert!(assemble_plate(Vec::new(), FileFormat::LightCycler480).is_err());
    }

    #[test]
    fn numbers_with_thousands_separators_parse() {
        assert_eq!(parse_number("1,234.56"), Some(1234.56));
        assert_eq!(parse_number(" 42.5 "), Some(42.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
    }
}
