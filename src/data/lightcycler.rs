//! Parser for LightCycler 480 melting-curve text exports.
//!
//! Tab-separated text, optionally preceded by an experiment title line. The
//! header row names a position column (`Pos` / `SamplePos`), a temperature
//! column (`Temp` or anything containing "temperature") and a fluorescence
//! column; per-acquisition rows follow.

use std::io::BufRead;

use anyhow::{Result, bail};
use csv::ReaderBuilder;

use crate::data::{RawReading, parse_number};

struct Columns {
    well: usize,
    temperature: usize,
    fluorescence: usize,
}

fn detect_header(record: &csv::StringRecord) -> Option<Columns> {
    let mut well = None;
    let mut temperature = None;
    let mut fluorescence = None;

    for (index, field) in record.iter().enumerate() {
        let name = field.trim().to_ascii_lowercase();
        if name == "pos" || name.contains("position") || name == "samplepos" {
            well = Some(index);
        } else if name == "temp" || name.contains("temperature") {
            temperature = Some(index);
        } else if name.contains("fluor") {
            fluorescence = Some(index);
        }
    }

    Some(Columns {
        well: well?,
        temperature: temperature?,
        fluorescence: fluorescence?,
    })
}

pub fn parse<R: BufRead>(reader: R) -> Result<Vec<RawReading>> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let mut columns: Option<Columns> = None;
    let mut readings = Vec::new();
    let mut skipped = 0usize;

    for record in csv_reader.records() {
        let record = record?;

        let Some(cols) = &columns else {
            // Title/metadata lines have no recognizable column set.
            columns = detect_header(&record);
            continue;
        };

        let well = record.get(cols.well).map(str::trim).unwrap_or_default();
        let temperature = record.get(cols.temperature).and_then(parse_number);
        let fluorescence = record.get(cols.fluorescence).and_then(parse_number);

        match (well.is_empty(), temperature, fluorescence) {
            (false, Some(temperature), Some(fluorescence)) => readings.push(RawReading {
                well: well.to_string(),
                temperature,
                fluorescence,
            }),
            _ => skipped += 1,
        }
    }

    if columns.is_none() {
        bail!("no LightCycler header row (expected Pos / Temp / Fluorescence columns)");
    }
    if readings.is_empty() {
        bail!("the header was found but no data rows were usable ({skipped} skipped)");
    }
    if skipped > 0 {
        log::warn!("LightCycler import skipped {skipped} malformed rows");
    }

    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const EXPORT: &str = "\
Experiment: thermal shift screen 0412\n\
Pos\tSample Name\tProgram\tTemp\tFluorescence\n\
A1\tbuffer\t2\t25.06\t3.1415\n\
A1\tbuffer\t2\t25.56\t3.2001\n\
H12\tcompound 88\t2\t25.06\t2.0007\n";

    #[test]
    fn parses_rows_after_the_title_line() {
        let readings = parse(Cursor::new(EXPORT)).unwrap();
        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].well, "A1");
        assert!((readings[0].temperature - 25.06).abs() < 1e-9);
        assert_eq!(readings[2].well, "H12");
    }

    #[test]
    fn header_names_are_matched_case_insensitively() {
        let text = "SamplePos\tTEMPERATURE\tfluor (465-510)\nB2\t30.5\t88.25\n";
        let readings = parse(Cursor::new(text)).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].well, "B2");
        assert_eq!(readings[0].fluorescence, 88.25);
    }

    #[test]
    fn rows_with_missing_values_are_skipped_not_fatal() {
        let text = "Pos\tTemp\tFluorescence\nA1\t25.0\t10.0\nA2\t\t11.0\nA3\t26.0\t\n";
        let readings = parse(Cursor::new(text)).unwrap();
        assert_eq!(readings.len(), 1, "only the complete row survives");
    }

    #[test]
    fn a_file_without_any_header_is_an_error() {
        assert!(parse(Cursor::new("just some text\nwithout columns\n")).is_err());
    }
}
