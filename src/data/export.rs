//! CSV export of the per-well analysis results.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::WellRecord;

/// One exported row. Fitted fields stay blank for atypical wells and for
/// wells whose fit failed; raw-signal stats are kept where available.
#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    well: &'a str,
    reviewed: bool,
    atypical: bool,
    tm: Option<f64>,
    delta_tm: Option<f64>,
    min_fluorescence: Option<f64>,
    max_fluorescence: Option<f64>,
    fluorescence_range: Option<f64>,
    max_slope: Option<f64>,
    smoothing: Option<f64>,
    min_temp: Option<f64>,
    max_temp: Option<f64>,
}

fn row_for<'a>(well: &'a str, record: Option<&WellRecord>) -> ResultRow<'a> {
    let Some(record) = record else {
        return ResultRow {
            well,
            reviewed: false,
            atypical: false,
            tm: None,
            delta_tm: None,
            min_fluorescence: None,
            max_fluorescence: None,
            fluorescence_range: None,
            max_slope: None,
            smoothing: None,
            min_temp: None,
            max_temp: None,
        };
    };

    let atypical = record.is_atypical();
    let features = record.features.as_ref();
    let fitted = features.filter(|_| !atypical);

    ResultRow {
        well,
        reviewed: record.reviewed,
        atypical,
        tm: fitted.map(|f| f.tm),
        delta_tm: fitted.and_then(|f| f.delta_tm),
        min_fluorescence: features.map(|f| f.min_fluorescence),
        max_fluorescence: features.map(|f| f.max_fluorescence),
        fluorescence_range: features.map(|f| f.fluorescence_range()),
        max_slope: fitted.map(|f| f.max_derivative_value),
        smoothing: Some(record.smoothing),
        min_temp: Some(record.min_temp),
        max_temp: Some(record.max_temp),
    }
}

/// Write one row per well, in the given (natural plate) order.
pub fn write_results<W: Write>(
    writer: W,
    wells: &[String],
    records: &BTreeMap<String, WellRecord>,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for well in wells {
        csv_writer.serialize(row_for(well, records.get(well)))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_to_path(
    path: &Path,
    wells: &[String],
    records: &BTreeMap<String, WellRecord>,
) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_results(file, wells, records)
        .with_context(|| format!("writing results to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurveFeatures, WellClass};

    fn features(tm: f64, delta: f64) -> CurveFeatures {
        CurveFeatures {
            tm,
            delta_tm: Some(delta),
            min_fluorescence: 100.0,
            max_fluorescence: 900.0,
            temp_at_min: 25.0,
            temp_at_max: 95.0,
            max_derivative_value: 55.5,
            raw_points: Vec::new(),
            x_spline: Vec::new(),
            y_spline: Vec::new(),
            y_spline_derivative: Vec::new(),
        }
    }

    fn export_string(wells: &[&str], records: &BTreeMap<String, WellRecord>) -> String {
        let owned: Vec<String> = wells.iter().map(|w| w.to_string()).collect();
        let mut buffer = Vec::new();
        write_results(&mut buffer, &owned, records).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn typical_wells_export_their_fit() {
        let mut records = BTreeMap::new();
        records.insert(
            "A1".to_string(),
            WellRecord::fitted(WellClass::Typical, 0.01, 25.0, 95.0, features(52.5, 1.25)),
        );

        let out = export_string(&["A1"], &records);
        let mut lines = out.lines();
        assert_eq!(
            lines.next().unwrap(),
            "well,reviewed,atypical,tm,delta_tm,min_fluorescence,max_fluorescence,\
             fluorescence_range,max_slope,smoothing,min_temp,max_temp"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("A1,false,false,52.5,1.25,100.0,900.0,800.0,55.5,"));
    }

    #[test]
    fn atypical_wells_keep_signal_stats_but_report_no_fit() {
        let mut records = BTreeMap::new();
        let mut record =
            WellRecord::fitted(WellClass::Atypical, 0.01, 25.0, 95.0, features(41.0, -9.0));
        record.reviewed = true;
        records.insert("B2".to_string(), record);

        let out = export_string(&["B2"], &records);
        let row = out.lines().nth(1).unwrap();
        // tm, delta_tm and max_slope stay blank; fluorescence stats remain.
        assert!(row.starts_with("B2,true,true,,,100.0,900.0,800.0,,"));
    }

    #[test]
    fn wells_without_a_record_export_an_empty_row() {
        let out = export_string(&["C3"], &BTreeMap::new());
        let row = out.lines().nth(1).unwrap();
        assert_eq!(row, "C3,false,false,,,,,,,,,");
    }

    #[test]
    fn rows_follow_the_given_well_order() {
        let mut records = BTreeMap::new();
        for well in ["A1", "A2", "A10"] {
            records.insert(
                well.to_string(),
                WellRecord::fitted(WellClass::Typical, 0.01, 25.0, 95.0, features(50.0, 0.0)),
            );
        }
        let out = export_string(&["A1", "A2", "A10"], &records);
        let wells: Vec<&str> = out
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap())
            .collect();
        assert_eq!(wells, vec!["A1", "A2", "A10"], "natural order, not lexicographic");
    }
}
