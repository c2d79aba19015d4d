//! Plate geometry: supported plate sizes and the well-label to grid mapping.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::well::split_well_label;

/// Microtiter plate sizes the dashboard understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlateSize {
    /// 8 rows (A-H) x 12 columns.
    Wells96,
    /// 16 rows (A-P) x 24 columns.
    Wells384,
}

impl PlateSize {
    pub fn rows(self) -> usize {
        match self {
            PlateSize::Wells96 => 8,
            PlateSize::Wells384 => 16,
        }
    }

    pub fn cols(self) -> usize {
        match self {
            PlateSize::Wells96 => 12,
            PlateSize::Wells384 => 24,
        }
    }

    pub fn well_count(self) -> usize {
        self.rows() * self.cols()
    }

    /// Infer the plate size from the number of distinct wells in an upload.
    pub fn from_distinct_wells(count: usize) -> Self {
        if count > 96 {
            PlateSize::Wells384
        } else {
            PlateSize::Wells96
        }
    }
}

impl fmt::Display for PlateSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlateSize::Wells96 => write!(f, "96"),
            PlateSize::Wells384 => write!(f, "384"),
        }
    }
}

/// Row letters to a 0-based row index: A=0 ... Z=25, AA=26, AB=27, ...
pub fn row_index(letters: &str) -> usize {
    let mut index: usize = 0;
    for c in letters.chars() {
        let digit = (c.to_ascii_uppercase() as usize).saturating_sub('A' as usize) + 1;
        index = index * 26 + digit;
    }
    index.saturating_sub(1)
}

/// Inverse of [`row_index`].
pub fn row_label(index: usize) -> String {
    let mut remaining = index + 1;
    let mut letters = Vec::new();
    while remaining > 0 {
        remaining -= 1;
        letters.push((b'A' + (remaining % 26) as u8) as char);
        remaining /= 26;
    }
    letters.iter().rev().collect()
}

/// Grid position of a well label on a plate of the given size.
///
/// Returns `(row, column)` with both 0-based, or `None` when the label is
/// malformed or lies outside the plate bounds.
pub fn grid_position(label: &str, size: PlateSize) -> Option<(usize, usize)> {
    let (letters, column) = split_well_label(label)?;
    let row = row_index(letters);
    if column == 0 {
        return None;
    }
    let col = column as usize - 1;
    if row >= size.rows() || col >= size.cols() {
        return None;
    }
    Some((row, col))
}

/// A well-label keyed value set laid out as a row-major plate grid, ready for
/// heatmap rendering. Missing wells are `None`.
#[derive(Debug, Clone)]
pub struct PlateGrid {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<u32>,
    values: Vec<Vec<Option<f64>>>,
}

impl PlateGrid {
    pub fn from_values(values: &BTreeMap<String, f64>, size: PlateSize) -> Self {
        let mut grid = vec![vec![None; size.cols()]; size.rows()];
        for (well, value) in values {
            match grid_position(well, size) {
                Some((row, col)) => grid[row][col] = Some(*value),
                None => {
                    log::warn!("well '{well}' does not fit a {size}-well plate, skipping");
                }
            }
        }

        PlateGrid {
            row_labels: (0..size.rows()).map(row_label).collect(),
            col_labels: (1..=size.cols() as u32).collect(),
            values: grid,
        }
    }

    pub fn rows(&self) -> usize {
        self.values.len()
    }

    pub fn cols(&self) -> usize {
        self.col_labels.len()
    }

    pub fn value_at(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row)?.get(col).copied().flatten()
    }

    /// Iterate present cells as `(row, col, value)`.
    pub fn present_cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.values.iter().enumerate().flat_map(|(row, cols)| {
            cols.iter()
                .enumerate()
                .filter_map(move |(col, value)| value.map(|v| (row, col, v)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_letters_round_trip() {
        for (letters, index) in [("A", 0), ("H", 7), ("P", 15), ("Z", 25), ("AA", 26)] {
            assert_eq!(row_index(letters), index, "index of {letters}");
            assert_eq!(row_label(index), letters, "label of {index}");
        }
    }

    #[test]
    fn grid_positions_respect_plate_bounds() {
        assert_eq!(grid_position("A1", PlateSize::Wells96), Some((0, 0)));
        assert_eq!(grid_position("H12", PlateSize::Wells96), Some((7, 11)));
        assert_eq!(grid_position("P24", PlateSize::Wells384), Some((15, 23)));

        // Outside a 96-well plate but fine on a 384-well one.
        assert_eq!(grid_position("P24", PlateSize::Wells96), None);
        // Column indices are 1-based on the plate.
        assert_eq!(grid_position("A0", PlateSize::Wells96), None);
        assert_eq!(grid_position("Control", PlateSize::Wells96), None);
    }

    #[test]
    fn plate_size_inference_matches_the_upload_rule() {
        assert_eq!(PlateSize::from_distinct_wells(96), PlateSize::Wells96);
        assert_eq!(PlateSize::from_distinct_wells(97), PlateSize::Wells384);
        assert_eq!(PlateSize::from_distinct_wells(12), PlateSize::Wells96);
    }

    #[test]
    fn grid_holds_values_at_their_well_positions() {
        let mut values = BTreeMap::new();
        values.insert("A1".to_string(), 1.5);
        values.insert("B2".to_string(), -0.25);
        values.insert("Control".to_string(), 9.0); // skipped, not a position

        let grid = PlateGrid::from_values(&values, PlateSize::Wells96);
        assert_eq!(grid.rows(), 8);
        assert_eq!(grid.cols(), 12);
        assert_eq!(grid.value_at(0, 0), Some(1.5));
        assert_eq!(grid.value_at(1, 1), Some(-0.25));
        assert_eq!(grid.value_at(2, 2), None);
        assert_eq!(grid.present_cells().count(), 2);
    }
}
