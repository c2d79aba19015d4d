use anyhow::{Result, anyhow};

use crate::data::FileFormat;
use crate::domain::PlateSize;

// ============================================================================
// WellCurve: raw readings of a single well
// ============================================================================

/// One well's melt readings, sorted by ascending temperature.
#[derive(Debug, Clone)]
pub struct WellCurve {
    pub well: String,

    // Parallel vectors, one entry per acquisition
    pub temperatures: Vec<f64>,
    pub fluorescence: Vec<f64>,
}

impl WellCurve {
    pub fn len(&self) -> usize {
        self.temperatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperatures.is_empty()
    }

    /// The readings inside `[min_temp, max_temp]`, as new parallel vectors.
    pub fn filtered(&self, min_temp: f64, max_temp: f64) -> (Vec<f64>, Vec<f64>) {
        let mut temps = Vec::new();
        let mut fluor = Vec::new();
        for (t, f) in self.temperatures.iter().zip(&self.fluorescence) {
            if *t >= min_temp && *t <= max_temp {
                temps.push(*t);
                fluor.push(*f);
            }
        }
        (temps, fluor)
    }
}

// ============================================================================
// PlateData: everything parsed out of one uploaded file
// ============================================================================

#[derive(Debug, Clone)]
pub struct PlateData {
    pub format: FileFormat,
    pub plate_size: PlateSize,
    pub curves: Vec<WellCurve>,
    /// Distinct well labels in natural plate order.
    pub available_wells: Vec<String>,
    /// Temperature extent across the whole plate.
    pub min_temp: f64,
    pub max_temp: f64,
}

impl PlateData {
    pub fn curve_for(&self, well: &str) -> Result<&WellCurve> {
        self.curves
            .iter()
            .find(|curve| curve.well == well)
            .ok_or_else(|| anyhow!("no readings for well {well} in the uploaded data"))
    }

    pub fn well_count(&self) -> usize {
        self.curves.len()
    }

    pub fn reading_count(&self) -> usize {
        self.curves.iter().map(WellCurve::len).sum()
    }
}
