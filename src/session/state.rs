//! The explicit, typed session state shared by every page.
//!
//! One struct owns everything the pages read and write; page handlers get it
//! by `&mut` reference. Resets are explicit: a new upload replaces the whole
//! session, and parameter changes invalidate exactly the results that depend
//! on them.

use std::collections::BTreeMap;

use crate::config::ANALYSIS;
use crate::data::FileFormat;
use crate::domain::{PlateSize, natural_sort_wells};
use crate::models::{ControlSummary, PlateData, WellClass, WellRecord};

pub struct SessionState {
    // Upload
    pub data: Option<PlateData>,
    pub file_format: Option<FileFormat>,
    pub available_wells: Vec<String>,
    pub plate_size: Option<PlateSize>,
    /// Analysis temperature window; meaningful once data is loaded.
    pub min_temp: f64,
    pub max_temp: f64,

    // Control analysis
    pub control_wells: Vec<String>,
    pub selected_control: Option<String>,
    pub smoothing_control: f64,
    pub control_results: Option<Vec<ControlSummary>>,
    pub avg_control_tm: Option<f64>,

    // Atypical-well detection
    pub dtw_lower_threshold: f64,
    pub dtw_upper_threshold: f64,
    pub dtw_distances: Option<BTreeMap<String, f64>>,
    pub typical_wells: Vec<String>,
    pub undecided_wells: Vec<String>,
    pub atypical_wells: Vec<String>,

    // Per-well analysis
    pub well_records: BTreeMap<String, WellRecord>,
    pub selected_well: Option<String>,
    pub smoothing_features: f64,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            data: None,
            file_format: None,
            available_wells: Vec::new(),
            plate_size: None,
            min_temp: 0.0,
            max_temp: 0.0,
            control_wells: Vec::new(),
            selected_control: None,
            smoothing_control: ANALYSIS.fit.default_smoothing,
            control_results: None,
            avg_control_tm: None,
            dtw_lower_threshold: ANALYSIS.detection.default_lower_threshold,
            dtw_upper_threshold: ANALYSIS.detection.default_upper_threshold,
            dtw_distances: None,
            typical_wells: Vec::new(),
            undecided_wells: Vec::new(),
            atypical_wells: Vec::new(),
            well_records: BTreeMap::new(),
            selected_well: None,
            smoothing_features: ANALYSIS.fit.default_smoothing,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything and return to the defaults.
    pub fn reset_all(&mut self) {
        *self = SessionState::default();
    }

    /// Replace the session with a freshly uploaded plate.
    pub fn install_plate(&mut self, data: PlateData) {
        self.reset_all();
        self.file_format = Some(data.format);
        self.plate_size = Some(data.plate_size);
        self.available_wells = data.available_wells.clone();
        self.min_temp = data.min_temp;
        self.max_temp = data.max_temp;
        self.data = Some(data);
    }

    /// Clear the control-analysis outputs (kept inputs: well list, smoothing).
    pub fn invalidate_control_results(&mut self) {
        self.control_results = None;
        self.avg_control_tm = None;
    }

    /// Clear everything that depends on the analysis temperature window:
    /// control results, DTW distances, classifications and well records.
    pub fn invalidate_temperature_dependent(&mut self) {
        self.invalidate_control_results();
        self.invalidate_detection();
        self.well_records.clear();
    }

    /// Clear the DTW distances and the classification lists derived from them.
    pub fn invalidate_detection(&mut self) {
        self.dtw_distances = None;
        self.typical_wells.clear();
        self.undecided_wells.clear();
        self.atypical_wells.clear();
    }

    /// Change the analysis temperature window, invalidating dependents when
    /// the values actually move.
    pub fn set_temperature_range(&mut self, min_temp: f64, max_temp: f64) {
        if min_temp.to_bits() == self.min_temp.to_bits()
            && max_temp.to_bits() == self.max_temp.to_bits()
        {
            return;
        }
        self.min_temp = min_temp;
        self.max_temp = max_temp;
        self.invalidate_temperature_dependent();
    }

    /// Toggle a well's membership in the control set.
    pub fn toggle_control_well(&mut self, well: &str) {
        if let Some(position) = self.control_wells.iter().position(|w| w == well) {
            self.control_wells.remove(position);
            if self.selected_control.as_deref() == Some(well) {
                self.selected_control = None;
            }
        } else {
            self.control_wells.push(well.to_string());
            self.control_wells = natural_sort_wells(&self.control_wells);
        }
        self.invalidate_control_results();
        // The reference curve may have changed, so shape distances are stale.
        self.invalidate_detection();
    }

    /// Change the reference control well.
    pub fn select_control(&mut self, well: String) {
        if self.selected_control.as_deref() == Some(well.as_str()) {
            return;
        }
        self.selected_control = Some(well);
        self.invalidate_control_results();
        self.invalidate_detection();
    }

    /// Current classification of a well: a reviewed record wins, then the
    /// threshold lists; wells absent from all lists count as typical.
    pub fn class_for(&self, well: &str) -> WellClass {
        if let Some(record) = self.well_records.get(well)
            && record.reviewed
        {
            return record.class;
        }
        if self.typical_wells.iter().any(|w| w == well) {
            WellClass::Typical
        } else if self.undecided_wells.iter().any(|w| w == well) {
            WellClass::Undecided
        } else if self.atypical_wells.iter().any(|w| w == well) {
            WellClass::Atypical
        } else {
            WellClass::Typical
        }
    }

    /// Manually reclassify a well: moves it between the lists and marks its
    /// record as reviewed.
    pub fn set_well_class(&mut self, well: &str, class: WellClass) {
        for list in [
            &mut self.typical_wells,
            &mut self.undecided_wells,
            &mut self.atypical_wells,
        ] {
            list.retain(|w| w != well);
        }
        let target = match class {
            WellClass::Typical => &mut self.typical_wells,
            WellClass::Undecided => &mut self.undecided_wells,
            WellClass::Atypical => &mut self.atypical_wells,
        };
        target.push(well.to_string());
        *target = natural_sort_wells(target);

        if let Some(record) = self.well_records.get_mut(well) {
            record.class = class;
            record.reviewed = true;
        }
    }

    // Completion predicates used by the page dependency graph

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    pub fn has_control_analysis(&self) -> bool {
        self.selected_control.is_some() && self.avg_control_tm.is_some()
    }

    pub fn has_atypical_detection(&self) -> bool {
        self.dtw_distances.is_some()
    }

    pub fn has_well_analysis(&self) -> bool {
        !self.well_records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurveFeatures, WellCurve};

    fn plate() -> PlateData {
        let curves = vec![
            WellCurve {
                well: "A1".to_string(),
                temperatures: vec![25.0, 26.0, 27.0],
                fluorescence: vec![1.0, 2.0, 3.0],
            },
            WellCurve {
                well: "A2".to_string(),
                temperatures: vec![25.0, 26.0, 27.0],
                fluorescence: vec![1.0, 2.0, 3.0],
            },
        ];
        PlateData {
            format: FileFormat::LightCycler480,
            plate_size: PlateSize::Wells96,
            curves,
            available_wells: vec!["A1".to_string(), "A2".to_string()],
            min_temp: 25.0,
            max_temp: 27.0,
        }
    }

    fn empty_features() -> CurveFeatures {
        CurveFeatures {
            tm: 50.0,
            delta_tm: None,
            min_fluorescence: 0.0,
            max_fluorescence: 1.0,
            temp_at_min: 25.0,
            temp_at_max: 27.0,
            max_derivative_value: 0.5,
            raw_points: Vec::new(),
            x_spline: Vec::new(),
            y_spline: Vec::new(),
            y_spline_derivative: Vec::new(),
        }
    }

    #[test]
    fn installing_a_plate_resets_and_populates() {
        let mut state = SessionState::new();
        state.control_wells.push("Z9".to_string());
        state.avg_control_tm = Some(48.0);

        state.install_plate(plate());

        assert!(state.has_data());
        assert_eq!(state.available_wells, vec!["A1", "A2"]);
        assert_eq!(state.plate_size, Some(PlateSize::Wells96));
        assert_eq!(state.min_temp, 25.0);
        assert!(state.control_wells.is_empty(), "stale controls dropped");
        assert!(state.avg_control_tm.is_none());
    }

    #[test]
    fn temperature_changes_invalidate_downstream_results() {
        let mut state = SessionState::new();
        state.install_plate(plate());
        state.avg_control_tm = Some(50.0);
        state.dtw_distances = Some(BTreeMap::new());
        state.typical_wells = vec!["A1".to_string()];
        state.well_records.insert(
            "A1".to_string(),
            WellRecord::fitted(WellClass::Typical, 0.01, 25.0, 27.0, empty_features()),
        );

        // Same values: nothing moves.
        state.set_temperature_range(25.0, 27.0);
        assert!(state.avg_control_tm.is_some());

        state.set_temperature_range(26.0, 27.0);
        assert!(state.avg_control_tm.is_none());
        assert!(state.dtw_distances.is_none());
        assert!(state.typical_wells.is_empty());
        assert!(state.well_records.is_empty());
    }

    #[test]
    fn toggling_controls_clears_results_and_detection() {
        let mut state = SessionState::new();
        state.install_plate(plate());
        state.avg_control_tm = Some(50.0);
        state.dtw_distances = Some(BTreeMap::new());

        state.toggle_control_well("A2");
        state.toggle_control_well("A1");
        assert_eq!(state.control_wells, vec!["A1", "A2"], "kept in plate order");
        assert!(state.avg_control_tm.is_none());
        assert!(state.dtw_distances.is_none());

        state.toggle_control_well("A1");
        assert_eq!(state.control_wells, vec!["A2"]);
    }

    #[test]
    fn deselecting_the_reference_control_clears_it() {
        let mut state = SessionState::new();
        state.install_plate(plate());
        state.toggle_control_well("A1");
        state.select_control("A1".to_string());
        assert!(!state.has_control_analysis(), "no average yet");

        state.toggle_control_well("A1");
        assert!(state.selected_control.is_none());
    }

    #[test]
    fn manual_reclassification_moves_lists_and_marks_reviewed() {
        let mut state = SessionState::new();
        state.typical_wells = vec!["A1".to_string(), "A2".to_string()];
        state.well_records.insert(
            "A2".to_string(),
            WellRecord::fitted(WellClass::Typical, 0.01, 25.0, 95.0, empty_features()),
        );

        state.set_well_class("A2", WellClass::Atypical);

        assert_eq!(state.typical_wells, vec!["A1"]);
        assert_eq!(state.atypical_wells, vec!["A2"]);
        let record = &state.well_records["A2"];
        assert_eq!(record.class, WellClass::Atypical);
        assert!(record.reviewed);
        assert_eq!(state.class_for("A2"), WellClass::Atypical);
    }

    #[test]
    fn class_for_falls_back_to_lists_then_typical() {
        let mut state = SessionState::new();
        state.undecided_wells = vec!["B5".to_string()];
        assert_eq!(state.class_for("B5"), WellClass::Undecided);
        assert_eq!(state.class_for("C9"), WellClass::Typical);
    }
}
