//! Well-analysis page: the whole plate is fitted once in the background;
//! individual wells can then be refitted with their own smoothing and
//! temperature window, reclassified, and saved.

use eframe::egui::{Button, ComboBox, DragValue, Slider, Ui};
use strum::IntoEnumIterator;

use crate::analysis::features::{FitParams, extract_curve_features};
use crate::config::ANALYSIS;
use crate::models::{WellClass, WellRecord};
use crate::ui::app::{DsfViewerApp, cached_fit};
use crate::ui::config::UI_CONFIG;
use crate::ui::melt_plot::show_melt_curve;
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::{format_celsius, format_delta_tm, section_heading, spaced_separator};

#[cfg(debug_assertions)]
use crate::config::PRINT_UI_INTERACTIONS;

impl DsfViewerApp {
    pub(super) fn show_wells_page(&mut self, ui: &mut Ui) {
        section_heading(ui, "Well Analysis");

        if !self.session.has_well_analysis() {
            if !self.is_analyzing() {
                self.spawn_batch_analysis();
            }
            ui.add_space(30.0);
            ui.vertical_centered(|ui| {
                ui.spinner();
                ui.add_space(8.0);
                ui.label(format!(
                    "Analyzing {} wells…",
                    self.session.available_wells.len()
                ));
                ui.label_subdued("The first pass fits every well with the current settings.");
            });
            return;
        }

        // Make sure something is selected before drawing the controls.
        let selection_is_valid = self
            .session
            .selected_well
            .as_ref()
            .is_some_and(|well| self.session.available_wells.contains(well));
        if !selection_is_valid
            && let Some(first) = self.session.available_wells.first().cloned()
        {
            self.select_well(first);
        }
        let Some(well) = self.session.selected_well.clone() else {
            return;
        };

        self.render_well_controls(ui, &well);
        ui.add_space(6.0);
        self.render_save_row(ui, &well);

        spaced_separator(ui);
        self.render_well_plot(ui, &well);
    }

    /// Switch wells, loading the saved parameters of the new one.
    pub(super) fn select_well(&mut self, well: String) {
        if let Some(record) = self.session.well_records.get(&well) {
            self.session.smoothing_features = record.smoothing;
            self.well_min_temp = record.min_temp;
            self.well_max_temp = record.max_temp;
        }
        #[cfg(debug_assertions)]
        if PRINT_UI_INTERACTIONS {
            log::info!("[wells] selected {well}");
        }
        self.session.selected_well = Some(well);
        self.classification_changed = false;
        self.just_saved_well = None;
    }

    fn render_well_controls(&mut self, ui: &mut Ui, well: &str) {
        let (data_min, data_max) = self
            .session
            .data
            .as_ref()
            .map(|data| (data.min_temp, data.max_temp))
            .unwrap_or((0.0, 100.0));

        ui.horizontal(|ui| {
            let mut picked: Option<String> = None;
            ComboBox::from_label("Well")
                .selected_text(well.to_string())
                .show_ui(ui, |ui| {
                    for candidate in &self.session.available_wells {
                        if ui
                            .selectable_label(candidate == well, candidate.as_str())
                            .clicked()
                        {
                            picked = Some(candidate.clone());
                        }
                    }
                });
            if let Some(picked) = picked {
                self.select_well(picked);
            }

            ui.separator();

            ui.add(
                Slider::new(&mut self.session.smoothing_features, 0.0..=1.0)
                    .step_by(ANALYSIS.smoothing_step)
                    .text("Spline smoothing"),
            )
            .on_hover_text("Adjust the smoothing factor for this well's fit");

            ui.separator();

            ui.label("Range (°C):");
            ui.add(
                DragValue::new(&mut self.well_min_temp)
                    .speed(0.5)
                    .range(data_min..=self.well_max_temp),
            );
            ui.label("to");
            ui.add(
                DragValue::new(&mut self.well_max_temp)
                    .speed(0.5)
                    .range(self.well_min_temp..=data_max),
            );

            ui.separator();

            // Classification override
            let current_class = self.session.class_for(well);
            let mut picked_class: Option<WellClass> = None;
            ComboBox::from_label("Classification")
                .selected_text(current_class.to_string())
                .show_ui(ui, |ui| {
                    for class in WellClass::iter() {
                        if ui
                            .selectable_label(class == current_class, class.to_string())
                            .clicked()
                            && class != current_class
                        {
                            picked_class = Some(class);
                        }
                    }
                });
            if let Some(class) = picked_class {
                self.session.set_well_class(well, class);
                self.classification_changed = true;
            }
        });
    }

    fn render_save_row(&mut self, ui: &mut Ui, well: &str) {
        let settings_changed = self.settings_differ_from_saved(well);

        ui.horizontal(|ui| {
            if settings_changed {
                let save = ui
                    .add(Button::new("💾 Save changes"))
                    .on_hover_text("Refit this well with the current settings and keep the result");
                if save.clicked() {
                    self.save_well_changes(well);
                }
            } else if self.just_saved_well.as_deref() == Some(well) {
                ui.label_good("Saved updated analysis ✓");
            } else {
                ui.label_good("Saved");
            }

            if let Some(record) = self.session.well_records.get(well)
                && record.reviewed
            {
                ui.label_subdued("(manually reviewed)");
            }
        });
    }

    fn settings_differ_from_saved(&self, well: &str) -> bool {
        let Some(record) = self.session.well_records.get(well) else {
            return true;
        };
        self.classification_changed
            || record.smoothing.to_bits() != self.session.smoothing_features.to_bits()
            || record.min_temp.to_bits() != self.well_min_temp.to_bits()
            || record.max_temp.to_bits() != self.well_max_temp.to_bits()
    }

    /// Refit the selected well with the working parameters and persist it.
    fn save_well_changes(&mut self, well: &str) {
        let params = FitParams {
            min_temp: self.well_min_temp,
            max_temp: self.well_max_temp,
            smoothing: self.session.smoothing_features,
        };
        let avg_control_tm = self.session.avg_control_tm;
        let class = self.session.class_for(well);
        let previously_reviewed = self
            .session
            .well_records
            .get(well)
            .map(|record| record.reviewed)
            .unwrap_or(false);

        let Some(data) = self.session.data.as_ref() else {
            return;
        };
        let mut record = match data
            .curve_for(well)
            .and_then(|curve| extract_curve_features(curve, &params, avg_control_tm))
        {
            Ok(features) => WellRecord::fitted(
                class,
                params.smoothing,
                params.min_temp,
                params.max_temp,
                features,
            ),
            Err(error) => WellRecord::failed(
                class,
                params.smoothing,
                params.min_temp,
                params.max_temp,
                error.to_string(),
            ),
        };
        record.reviewed = previously_reviewed || self.classification_changed;

        self.session.well_records.insert(well.to_string(), record);
        self.just_saved_well = Some(well.to_string());
        self.classification_changed = false;

        #[cfg(debug_assertions)]
        if PRINT_UI_INTERACTIONS {
            log::info!("[wells] saved updated analysis for {well}");
        }
    }

    fn render_well_plot(&mut self, ui: &mut Ui, well: &str) {
        let Some(data) = self.session.data.as_ref() else {
            return;
        };

        // The preview always reflects the working parameters; saving makes
        // them permanent for this well.
        let result = cached_fit(
            &mut self.well_fit_cache,
            data,
            well,
            self.session.smoothing_features,
            self.well_min_temp,
            self.well_max_temp,
            self.session.avg_control_tm,
        );

        match result {
            Ok(features) => {
                ui.horizontal_top(|ui| {
                    let plot_width =
                        (ui.available_width() - UI_CONFIG.metrics_column_width).max(200.0);
                    ui.vertical(|ui| {
                        ui.set_width(plot_width);
                        show_melt_curve(ui, well, &features);
                    });
                    ui.vertical(|ui| {
                        ui.label_subheader("Analysis results");
                        ui.metric("Tm", &format_celsius(features.tm), UI_CONFIG.colors.accent);
                        match features.delta_tm {
                            Some(delta) => {
                                ui.metric("ΔTm", &format_delta_tm(delta), UI_CONFIG.colors.accent);
                            }
                            None => ui.metric("ΔTm", "—", UI_CONFIG.colors.label),
                        }
                        ui.metric(
                            "Min fluorescence",
                            &format!("{:.2}", features.min_fluorescence),
                            UI_CONFIG.colors.label,
                        );
                        ui.metric(
                            "Max fluorescence",
                            &format!("{:.2}", features.max_fluorescence),
                            UI_CONFIG.colors.label,
                        );
                        ui.metric(
                            "Fluorescence range",
                            &format!("{:.2}", features.fluorescence_range()),
                            UI_CONFIG.colors.label,
                        );
                        ui.metric(
                            "Max slope",
                            &format!("{:.3}", features.max_derivative_value),
                            UI_CONFIG.colors.label,
                        );
                    });
                });
            }
            Err(message) => {
                ui.label_error(format!("Well {well}: {message}"));
                ui.label_subdued(
                    "Widen the temperature range or adjust the smoothing, then save again.",
                );
            }
        }
    }
}
