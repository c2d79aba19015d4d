//! Summary page: the ΔTm plate heatmap and the downloadable results table.

use eframe::egui::{Grid, ScrollArea, Ui};
use std::collections::BTreeMap;

use crate::config::{PLOT_CONFIG, stamped_export_filename};
use crate::data::export::export_to_path;
use crate::domain::PlateGrid;
use crate::ui::app::{AppError, DsfViewerApp};
use crate::ui::heatmap::show_plate_heatmap;
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::{section_heading, spaced_separator};

impl DsfViewerApp {
    pub(super) fn show_summary_page(&mut self, ui: &mut Ui) {
        section_heading(ui, "Summary & Download");

        ui.label_subdued(
            "Review your results: the heatmap shows the final ΔTm of every well. If anything looks \
             unexpected, return to Well Analysis, adjust that well's smoothing or range, and save \
             the updated fit.",
        );
        ui.add_space(8.0);

        let Some(plate_size) = self.session.plate_size else {
            return;
        };

        // Atypical wells keep no ΔTm; their cells stay blank.
        let mut delta_tms: BTreeMap<String, f64> = BTreeMap::new();
        for (well, record) in &self.session.well_records {
            if record.is_atypical() {
                continue;
            }
            if let Some(features) = &record.features
                && let Some(delta) = features.delta_tm
            {
                delta_tms.insert(well.clone(), delta);
            }
        }

        let grid = PlateGrid::from_values(&delta_tms, plate_size);
        show_plate_heatmap(
            ui,
            "delta_tm",
            &grid,
            "ΔTm (K)",
            PLOT_CONFIG.delta_tm_gradient_colors,
        );

        spaced_separator(ui);
        self.render_results_table(ui);

        spaced_separator(ui);
        ui.vertical_centered(|ui| {
            if ui.button("📥 Download analysis results (CSV)").clicked() {
                self.export_results();
            }
        });
    }

    fn render_results_table(&self, ui: &mut Ui) {
        ui.label_subheader("Per-well results");
        ScrollArea::vertical()
            .max_height(320.0)
            .id_salt("results_table")
            .show(ui, |ui| {
                Grid::new("results_grid")
                    .num_columns(7)
                    .striped(true)
                    .spacing([20.0, 3.0])
                    .show(ui, |ui| {
                        for header in [
                            "Well",
                            "Class",
                            "Reviewed",
                            "Tm (°C)",
                            "ΔTm (K)",
                            "Range",
                            "Max slope",
                        ] {
                            ui.label_subdued(header);
                        }
                        ui.end_row();

                        for well in &self.session.available_wells {
                            let record = self.session.well_records.get(well);
                            ui.label(well);
                            match record {
                                Some(record) => {
                                    ui.label(record.class.to_string());
                                    ui.label(if record.reviewed { "yes" } else { "" });
                                    let fitted = record
                                        .features
                                        .as_ref()
                                        .filter(|_| !record.is_atypical());
                                    match fitted {
                                        Some(features) => {
                                            ui.label(format!("{:.2}", features.tm));
                                            ui.label(
                                                features
                                                    .delta_tm
                                                    .map(|d| format!("{d:+.2}"))
                                                    .unwrap_or_default(),
                                            );
                                            ui.label(format!(
                                                "{:.2}",
                                                features.fluorescence_range()
                                            ));
                                            ui.label(format!(
                                                "{:.3}",
                                                features.max_derivative_value
                                            ));
                                        }
                                        None => {
                                            for _ in 0..4 {
                                                ui.label("—");
                                            }
                                        }
                                    }
                                }
                                None => {
                                    for _ in 0..6 {
                                        ui.label("—");
                                    }
                                }
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    fn export_results(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(stamped_export_filename())
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };

        match export_to_path(
            &path,
            &self.session.available_wells,
            &self.session.well_records,
        ) {
            Ok(()) => {
                log::info!("results exported to {}", path.display());
                self.notice = Some(format!("Results written to {}", path.display()));
                self.last_error = None;
            }
            Err(error) => {
                log::error!("export failed: {error:#}");
                self.last_error = Some(AppError::Export(format!("{error:#}")));
            }
        }
    }
}
