//! Upload page: pick a format, load an instrument export, preview the data.

use eframe::egui::{Grid, Ui};
use strum::IntoEnumIterator;

use crate::data::{FileFormat, load_plate_file};
use crate::ui::app::{AppError, DsfViewerApp};
use crate::ui::config::UI_CONFIG;
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::{section_heading, spaced_separator};

#[cfg(debug_assertions)]
use crate::config::PRINT_UI_INTERACTIONS;

impl DsfViewerApp {
    pub(super) fn show_upload_page(&mut self, ui: &mut Ui) {
        section_heading(ui, "Upload Data");

        ui.label_subheader("File format");
        for format in FileFormat::iter() {
            ui.radio_value(&mut self.preferred_format, format, format.to_string());
        }
        ui.add_space(8.0);

        if ui.button("📂 Choose data file…").clicked() {
            self.pick_and_load_file();
        }
        ui.label_subdued("CSV or tab-separated text, as exported by the instrument.");

        if let Some(AppError::Parse(message)) = &self.last_error {
            ui.add_space(8.0);
            ui.label_error(message.as_str());
        }

        if self.session.has_data() {
            spaced_separator(ui);
            self.render_upload_summary(ui);
        }
    }

    fn pick_and_load_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("DSF data", &["csv", "txt", "tsv"])
            .pick_file()
        else {
            return;
        };

        #[cfg(debug_assertions)]
        if PRINT_UI_INTERACTIONS {
            log::info!(
                "[upload] parsing {} as {}",
                path.display(),
                self.preferred_format
            );
        }

        match load_plate_file(&path, self.preferred_format) {
            Ok(data) => {
                let wells = data.well_count();
                self.session.install_plate(data);
                self.last_error = None;
                self.notice = Some(format!("Loaded {wells} wells"));
            }
            Err(error) => {
                log::error!("upload failed: {error:#}");
                // A half-loaded session would unlock downstream pages with
                // stale data, so everything resets.
                self.session.reset_all();
                self.notice = None;
                self.last_error = Some(AppError::Parse(format!("{error:#}")));
            }
        }
    }

    fn render_upload_summary(&self, ui: &mut Ui) {
        let Some(data) = &self.session.data else {
            return;
        };

        ui.label_good("File uploaded and validated successfully!");
        ui.add_space(4.0);
        ui.metric("Format", &data.format.to_string(), UI_CONFIG.colors.label);
        ui.metric(
            "Plate size",
            &format!("{}-well", data.plate_size),
            UI_CONFIG.colors.label,
        );
        ui.metric(
            "Wells with data",
            &data.well_count().to_string(),
            UI_CONFIG.colors.label,
        );
        ui.metric(
            "Readings",
            &data.reading_count().to_string(),
            UI_CONFIG.colors.label,
        );
        ui.metric(
            "Temperature span",
            &format!("{:.1} – {:.1} °C", data.min_temp, data.max_temp),
            UI_CONFIG.colors.label,
        );

        spaced_separator(ui);
        ui.label_subheader("Data preview");
        Grid::new("upload_preview")
            .num_columns(3)
            .striped(true)
            .spacing([24.0, 4.0])
            .show(ui, |ui| {
                ui.label_subdued("Well");
                ui.label_subdued("Temperature (°C)");
                ui.label_subdued("Fluorescence");
                ui.end_row();

                let preview = data
                    .available_wells
                    .first()
                    .and_then(|well| data.curve_for(well).ok());
                if let Some(curve) = preview {
                    for (t, f) in curve
                        .temperatures
                        .iter()
                        .zip(&curve.fluorescence)
                        .take(8)
                    {
                        ui.label(&curve.well);
                        ui.label(format!("{t:.2}"));
                        ui.label(format!("{f:.2}"));
                        ui.end_row();
                    }
                }
            });
    }
}
