//! The dashboard pages and their explicit dependency graph.
//!
//! Which state a page needs, and which upstream step populates it, is written
//! down here instead of being scattered through ad hoc presence checks.

use serde::{Deserialize, Serialize};

use crate::session::state::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Page {
    #[default]
    Home,
    Upload,
    Controls,
    Atypical,
    Wells,
    Summary,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Home,
        Page::Upload,
        Page::Controls,
        Page::Atypical,
        Page::Wells,
        Page::Summary,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Upload => "Upload Data",
            Page::Controls => "Control Analysis",
            Page::Atypical => "Detect Atypical Wells",
            Page::Wells => "Well Analysis",
            Page::Summary => "Summary & Download",
        }
    }

    /// Upstream steps that must be complete before this page is usable.
    pub fn requirements(self) -> &'static [Requirement] {
        use Requirement::*;
        match self {
            Page::Home | Page::Upload => &[],
            Page::Controls => &[UploadedData],
            Page::Atypical => &[UploadedData, ControlAnalysis],
            Page::Wells => &[UploadedData, ControlAnalysis, AtypicalDetection],
            Page::Summary => &[UploadedData, ControlAnalysis, WellAnalysis],
        }
    }

    /// The requirements this session does not meet yet.
    pub fn missing_requirements(self, state: &SessionState) -> Vec<Requirement> {
        self.requirements()
            .iter()
            .copied()
            .filter(|requirement| !requirement.is_met(state))
            .collect()
    }

    pub fn is_unlocked(self, state: &SessionState) -> bool {
        self.requirements().iter().all(|r| r.is_met(state))
    }
}

/// One upstream step a page can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    UploadedData,
    ControlAnalysis,
    AtypicalDetection,
    WellAnalysis,
}

impl Requirement {
    pub fn is_met(self, state: &SessionState) -> bool {
        match self {
            Requirement::UploadedData => state.has_data(),
            Requirement::ControlAnalysis => state.has_control_analysis(),
            Requirement::AtypicalDetection => state.has_atypical_detection(),
            Requirement::WellAnalysis => state.has_well_analysis(),
        }
    }

    /// The page that satisfies this requirement, for "complete X first" hints.
    pub fn label(self) -> &'static str {
        match self {
            Requirement::UploadedData => "Upload Data",
            Requirement::ControlAnalysis => "Control Analysis",
            Requirement::AtypicalDetection => "Detect Atypical Wells",
            Requirement::WellAnalysis => "Well Analysis",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FileFormat;
    use crate::domain::PlateSize;
    use crate::models::{PlateData, WellClass, WellRecord};
    use std::collections::BTreeMap;

    fn state_with_data() -> SessionState {
        let mut state = SessionState::new();
        state.install_plate(PlateData {
            format: FileFormat::LightCycler480,
            plate_size: PlateSize::Wells96,
            curves: vec![crate::models::WellCurve {
                well: "A1".to_string(),
                temperatures: vec![25.0, 26.0],
                fluorescence: vec![1.0, 2.0],
            }],
            available_wells: vec!["A1".to_string()],
            min_temp: 25.0,
            max_temp: 26.0,
        });
        state
    }

    #[test]
    fn everything_past_upload_is_locked_on_a_fresh_session() {
        let state = SessionState::new();
        assert!(Page::Home.is_unlocked(&state));
        assert!(Page::Upload.is_unlocked(&state));
        assert!(!Page::Controls.is_unlocked(&state));
        assert!(!Page::Atypical.is_unlocked(&state));
        assert!(!Page::Wells.is_unlocked(&state));
        assert!(!Page::Summary.is_unlocked(&state));
    }

    #[test]
    fn pages_unlock_step_by_step() {
        let mut state = state_with_data();
        assert!(Page::Controls.is_unlocked(&state));
        assert!(!Page::Atypical.is_unlocked(&state));

        state.selected_control = Some("A1".to_string());
        state.avg_control_tm = Some(50.0);
        assert!(Page::Atypical.is_unlocked(&state));
        assert!(!Page::Wells.is_unlocked(&state), "needs DTW distances first");

        state.dtw_distances = Some(BTreeMap::new());
        assert!(Page::Wells.is_unlocked(&state));
        assert!(!Page::Summary.is_unlocked(&state), "needs well analysis");

        state.well_records.insert(
            "A1".to_string(),
            WellRecord::failed(WellClass::Typical, 0.01, 25.0, 26.0, "x".to_string()),
        );
        assert!(Page::Summary.is_unlocked(&state));
    }

    #[test]
    fn missing_requirements_name_the_upstream_pages() {
        let state = SessionState::new();
        let missing = Page::Wells.missing_requirements(&state);
        let labels: Vec<&str> = missing.iter().map(|r| r.label()).collect();
        assert_eq!(
            labels,
            vec!["Upload Data", "Control Analysis", "Detect Atypical Wells"]
        );
    }
}
