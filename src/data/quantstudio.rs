//! Parser for QuantStudio 7 melt-region exports.
//!
//! The export is tab-separated text. A block of metadata lines prefixed with
//! `*` (instrument, block type, run date) precedes a header row that contains
//! at least `Well Position`, `Temperature` and `Fluorescence` columns; extra
//! columns are ignored.

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
        if name.contains("well position") {
            well = Some(index);
        } else if name.contains("temperature") {
            temperature = Some(index);
        } else if name.contains("fluorescence") {
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
        .comment(Some(b'*'))
        .from_reader(reader);

    let mut columns: Option<Columns> = None;
    let mut readings = Vec::new();
    let mut skipped = 0usize;

    for record in csv_reader.records() {
        let record = record?;

        let Some(cols) = &columns else {
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
        bail!("no QuantStudio header row (expected Well Position / Temperature / Fluorescence)");
    }
    if readings.is_empty() {
        bail!("the header was found but no data rows were usable ({skipped} skipped)");
    }
    if skipped > 0 {
        log::warn!("QuantStudio import skipped {skipped} malformed rows");
    }

    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const EXPORT: &str = "\
* Block Type = 384-Well Block\n\
* Instrument Type = QuantStudio 7 Flex\n\
* Experiment Run End Time = 2024-03-12 14:02:11\n\
Well\tWell Position\tTemperature\tFluorescence\n\
1\tA1\t25.013\t1,523.4\n\
1\tA1\t25.513\t1,530.9\n\
2\tA2\t25.013\t980.1\n\
2\tA2\t25.513\tn/a\n";

    #[test]
    fn parses_rows_after_the_metadata_block() {
        let readings = parse(Cursor::new(EXPORT)).unwrap();
        assert_eq!(readings.len(), 3, "the n/a row is skipped");
        assert_eq!(readings[0].well, "A1");
        assert!((readings[0].temperature - 25.013).abs() < 1e-9);
        assert!((readings[0].fluorescence - 1523.4).abs() < 1e-9);
        assert_eq!(readings[2].well, "A2");
    }

    #[test]
    fn a_file_without_the_header_is_an_error() {
        let err = parse(Cursor::new("* Only metadata\n* Nothing else\n")).unwrap_err();
        assert!(err.to_string().contains("header"));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let text = "Well Position\tSample Name\tTemperature\tFluorescence\tDerivative\n\
                    B3\tlysozyme\t30.0\t100.5\t0.4\n";
        let readings = parse(Cursor::new(text)).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].well, "B3");
        assert_eq!(readings[0].fluorescence, 100.5);
    }
}
