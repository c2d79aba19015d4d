//! Control-analysis page: choose control wells, fit the reference curve, and
//! compute the average control Tm that every ΔTm is measured against.

use eframe::egui::{ComboBox, DragValue, Grid, ScrollArea, Slider, Ui};

use crate::analysis::features::{FitParams, extract_curve_features};
use crate::config::ANALYSIS;
use crate::models::ControlSummary;
use crate::ui::app::{AppError, DsfViewerApp, cached_fit};
use crate::ui::config::UI_CONFIG;
use crate::ui::melt_plot::show_melt_curve;
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::{format_celsius, section_heading, spaced_separator};

impl DsfViewerApp {
    pub(super) fn show_controls_page(&mut self, ui: &mut Ui) {
        section_heading(ui, "Control Analysis");

        self.render_control_picker(ui);

        if self.session.control_wells.is_empty() {
            ui.add_space(8.0);
            ui.label_warning(
                "Select at least one control well. Without controls no ΔTm values can be calculated.",
            );
            return;
        }

        // Keep the reference pointing at an actual control well.
        let reference_is_valid = self
            .session
            .selected_control
            .as_ref()
            .is_some_and(|well| self.session.control_wells.contains(well));
        if !reference_is_valid
            && let Some(first) = self.session.control_wells.first().cloned()
        {
            self.session.select_control(first);
        }

        spaced_separator(ui);
        self.render_control_settings(ui);
        self.ensure_control_results();

        spaced_separator(ui);
        self.render_reference_plot(ui);

        spaced_separator(ui);
        self.render_control_table(ui);
    }

    fn render_control_picker(&mut self, ui: &mut Ui) {
        ui.label_subheader("Control wells");
        ui.label_subdued("Tick every well that contains a control measurement.");

        let wells = self.session.available_wells.clone();
        let columns = UI_CONFIG.well_picker_columns;
        ScrollArea::vertical()
            .max_height(170.0)
            .id_salt("control_picker")
            .show(ui, |ui| {
                Grid::new("control_wells_grid")
                    .num_columns(columns)
                    .spacing([10.0, 2.0])
                    .show(ui, |ui| {
                        for (index, well) in wells.iter().enumerate() {
                            let mut selected =
                                self.session.control_wells.iter().any(|w| w == well);
                            if ui.checkbox(&mut selected, well.as_str()).changed() {
                                self.session.toggle_control_well(well);
                            }
                            if (index + 1) % columns == 0 {
                                ui.end_row();
                            }
                        }
                    });
            });
    }

    fn render_control_settings(&mut self, ui: &mut Ui) {
        let (data_min, data_max) = self
            .session
            .data
            .as_ref()
            .map(|data| (data.min_temp, data.max_temp))
            .unwrap_or((0.0, 100.0));

        ui.horizontal(|ui| {
            // Reference well for plots and shape comparison
            let current = self
                .session
                .selected_control
                .clone()
                .unwrap_or_else(|| "—".to_string());
            let mut picked: Option<String> = None;
            ComboBox::from_label("Reference well")
                .selected_text(current.clone())
                .show_ui(ui, |ui| {
                    for well in &self.session.control_wells {
                        if ui
                            .selectable_label(*well == current, well.as_str())
                            .clicked()
                        {
                            picked = Some(well.clone());
                        }
                    }
                });
            if let Some(well) = picked {
                self.session.select_control(well);
            }

            ui.separator();

            let mut smoothing = self.session.smoothing_control;
            let response = ui
                .add(
                    Slider::new(&mut smoothing, 0.0..=1.0)
                        .step_by(ANALYSIS.smoothing_step)
                        .text("Spline smoothing"),
                )
                .on_hover_text(
                    "Higher values smooth the signal harder, which helps with noisy curves that \
                     show too many peaks.",
                );
            if response.changed() {
                self.session.smoothing_control = smoothing;
                self.session.invalidate_control_results();
            }
        });

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let mut min_temp = self.session.min_temp;
            let mut max_temp = self.session.max_temp;
            let mut changed = false;

            ui.label("Temperature range (°C):");
            changed |= ui
                .add(
                    DragValue::new(&mut min_temp)
                        .speed(0.5)
                        .range(data_min..=max_temp),
                )
                .changed();
            ui.label("to");
            changed |= ui
                .add(
                    DragValue::new(&mut max_temp)
                        .speed(0.5)
                        .range(min_temp..=data_max),
                )
                .changed();

            ui.label_subdued(
                "Only this range is used for Tm fitting and atypical-well detection. Too wide \
                 picks up noise peaks, too narrow can miss transitions.",
            );

            if changed {
                // Invalidates control results, distances, classifications
                // and well records in one step.
                self.session.set_temperature_range(min_temp, max_temp);
            }
        });
    }

    /// Fit all control wells once and derive the average Tm.
    fn ensure_control_results(&mut self) {
        if self.session.control_results.is_some() {
            return;
        }
        let Some(data) = &self.session.data else {
            return;
        };

        let params = FitParams {
            min_temp: self.session.min_temp,
            max_temp: self.session.max_temp,
            smoothing: self.session.smoothing_control,
        };

        let mut summaries = Vec::new();
        let mut failures = Vec::new();
        let mut tm_sum = 0.0;

        for well in &self.session.control_wells {
            match data
                .curve_for(well)
                .and_then(|curve| extract_curve_features(curve, &params, None))
            {
                Ok(features) => {
                    tm_sum += features.tm;
                    summaries.push(ControlSummary::from_features(well, &features));
                }
                Err(error) => failures.push(error.to_string()),
            }
        }

        let fitted = summaries.len();
        self.session.avg_control_tm = (fitted > 0).then(|| tm_sum / fitted as f64);
        self.session.control_results = Some(summaries);
        self.last_error = (!failures.is_empty())
            .then(|| AppError::Analysis(failures.join("; ")));
    }

    fn render_reference_plot(&mut self, ui: &mut Ui) {
        let Some(reference) = self.session.selected_control.clone() else {
            return;
        };
        let Some(data) = self.session.data.as_ref() else {
            return;
        };

        let result = cached_fit(
            &mut self.control_fit_cache,
            data,
            &reference,
            self.session.smoothing_control,
            self.session.min_temp,
            self.session.max_temp,
            None,
        );

        match result {
            Ok(features) => {
                ui.horizontal_top(|ui| {
                    let plot_width =
                        (ui.available_width() - UI_CONFIG.metrics_column_width).max(200.0);
                    ui.vertical(|ui| {
                        ui.set_width(plot_width);
                        show_melt_curve(ui, &reference, &features);
                    });
                    ui.vertical(|ui| {
                        ui.label_subheader("Analysis results");
                        ui.metric("Tm", &format_celsius(features.tm), UI_CONFIG.colors.accent);
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
                ui.label_error(format!("Reference well {reference}: {message}"));
            }
        }
    }

    fn render_control_table(&mut self, ui: &mut Ui) {
        ui.label_subheader("Summary of control wells");

        if let Some(results) = &self.session.control_results
            && !results.is_empty()
        {
            Grid::new("control_summary")
                .num_columns(6)
                .striped(true)
                .spacing([24.0, 4.0])
                .show(ui, |ui| {
                    for header in [
                        "Well",
                        "Tm (°C)",
                        "Min fluorescence",
                        "Max fluorescence",
                        "Range",
                        "Max slope",
                    ] {
                        ui.label_subdued(header);
                    }
                    ui.end_row();

                    for row in results {
                        ui.label(&row.well);
                        ui.label(format!("{:.2}", row.tm));
                        ui.label(format!("{:.2}", row.min_fluorescence));
                        ui.label(format!("{:.2}", row.max_fluorescence));
                        ui.label(format!("{:.2}", row.fluorescence_range));
                        ui.label(format!("{:.3}", row.max_slope));
                        ui.end_row();
                    }
                });
        }

        ui.add_space(6.0);
        match self.session.avg_control_tm {
            Some(avg) => {
                ui.metric(
                    "Average Tm of control wells",
                    &format_celsius(avg),
                    UI_CONFIG.colors.good,
                );
            }
            None => ui.label_warning("No control well produced a valid fit in this range."),
        }
    }
}
