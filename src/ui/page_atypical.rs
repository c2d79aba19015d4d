//! Atypical-well detection page: DTW distances from the reference well,
//! threshold selection, and the resulting classification lists.

use eframe::egui::{DragValue, ScrollArea, Ui};

use crate::analysis::distances_from_reference;
use crate::config::{ANALYSIS, PLOT_CONFIG};
use crate::domain::{PlateGrid, natural_sort_wells};
use crate::models::{WellClass, classify_by_distance};
use crate::ui::app::{AppError, DsfViewerApp};
use crate::ui::heatmap::show_plate_heatmap;
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::{section_heading, spaced_separator};

impl DsfViewerApp {
    pub(super) fn show_atypical_page(&mut self, ui: &mut Ui) {
        section_heading(ui, "Detect Atypical Wells");

        let Some(reference) = self.session.selected_control.clone() else {
            return;
        };

        self.ensure_dtw_distances(&reference);

        if let Some(AppError::Analysis(message)) = &self.last_error
            && self.session.dtw_distances.is_none()
        {
            ui.label_error(message.as_str());
            return;
        }

        if let (Some(distances), Some(plate_size)) =
            (&self.session.dtw_distances, self.session.plate_size)
        {
            ui.label_subheader(format!("Shape comparison with reference well {reference}"));
            let grid = PlateGrid::from_values(distances, plate_size);
            show_plate_heatmap(
                ui,
                "dtw_distances",
                &grid,
                "DTW distance",
                PLOT_CONFIG.distance_gradient_colors,
            );
        }

        spaced_separator(ui);
        self.render_threshold_inputs(ui);
        self.reclassify_from_thresholds();

        spaced_separator(ui);
        self.render_classification_lists(ui);
    }

    /// DTW distances are dropped whenever the reference, the control set or
    /// the temperature range changes; recompute them on demand.
    fn ensure_dtw_distances(&mut self, reference: &str) {
        if self.session.dtw_distances.is_some() {
            return;
        }

        let result = match self.session.data.as_ref() {
            Some(data) => distances_from_reference(
                data,
                reference,
                self.session.min_temp,
                self.session.max_temp,
            ),
            None => return,
        };

        match result {
            Ok(distances) => {
                self.session.dtw_distances = Some(distances);
                self.last_error = None;
            }
            Err(error) => {
                log::error!("DTW computation failed: {error:#}");
                self.last_error = Some(AppError::Analysis(format!("{error:#}")));
            }
        }
    }

    fn render_threshold_inputs(&mut self, ui: &mut Ui) {
        ui.label_subheader("Threshold selection");
        ui.label_subdued(
            "Wells are classified by the shape distance of their signal from the reference well: \
             similar shapes (small distance) are typical, very different shapes are atypical, and \
             everything in between stays undecided for manual review. Atypical wells report no \
             features such as Tm.",
        );
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            let max = ANALYSIS.detection.threshold_max;
            let mut lower = self.session.dtw_lower_threshold;
            let mut upper = self.session.dtw_upper_threshold;

            ui.label("Lower threshold (typical/undecided):");
            let lower_changed = ui
                .add(DragValue::new(&mut lower).speed(0.1).range(0.0..=upper))
                .on_hover_text("Wells at or below this distance are considered typical")
                .changed();

            ui.separator();

            ui.label("Upper threshold (undecided/atypical):");
            let upper_changed = ui
                .add(DragValue::new(&mut upper).speed(0.1).range(lower..=max))
                .on_hover_text("Wells at or above this distance are considered atypical")
                .changed();

            if lower_changed || upper_changed {
                self.session.dtw_lower_threshold = lower;
                self.session.dtw_upper_threshold = upper;
            }
        });
    }

    /// Rebuild the three classification lists from the current thresholds.
    fn reclassify_from_thresholds(&mut self) {
        let lower = self.session.dtw_lower_threshold;
        let upper = self.session.dtw_upper_threshold;

        let lists = self.session.dtw_distances.as_ref().map(|distances| {
            let mut typical = Vec::new();
            let mut undecided = Vec::new();
            let mut atypical = Vec::new();
            for (well, distance) in distances {
                match classify_by_distance(*distance, lower, upper) {
                    WellClass::Typical => typical.push(well.clone()),
                    WellClass::Undecided => undecided.push(well.clone()),
                    WellClass::Atypical => atypical.push(well.clone()),
                }
            }
            (
                natural_sort_wells(&typical),
                natural_sort_wells(&undecided),
                natural_sort_wells(&atypical),
            )
        });

        if let Some((typical, undecided, atypical)) = lists {
            self.session.typical_wells = typical;
            self.session.undecided_wells = undecided;
            self.session.atypical_wells = atypical;
        }
    }

    fn render_classification_lists(&mut self, ui: &mut Ui) {
        let columns = [
            ("Typical wells", &self.session.typical_wells),
            ("Undecided wells", &self.session.undecided_wells),
            ("Atypical wells", &self.session.atypical_wells),
        ];

        ui.columns(3, |column_uis| {
            for ((title, wells), column) in columns.iter().zip(column_uis.iter_mut()) {
                column.label_subheader(*title);
                column.label_subdued(format!("{} wells", wells.len()));
                ScrollArea::vertical()
                    .max_height(200.0)
                    .id_salt(*title)
                    .show(column, |ui| {
                        for well in wells.iter() {
                            ui.label(well);
                        }
                    });
            }
        });
    }
}
