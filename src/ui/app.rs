use std::collections::BTreeMap;
use std::fmt;

use eframe::{Frame, egui};
use poll_promise::Promise;
use serde::{Deserialize, Serialize};

use crate::analysis::features::{FitParams, extract_curve_features};
use crate::data::FileFormat;
use crate::models::{CurveFeatures, PlateData, WellRecord};
use crate::session::{Page, SessionState};
use crate::ui::config::UI_CONFIG;
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::{colored_heading, format_celsius, setup_custom_visuals, spaced_separator};

#[cfg(debug_assertions)]
use crate::config::PRINT_UI_INTERACTIONS;

/// Error types for application operations
#[derive(Debug, Clone)]
pub enum AppError {
    /// No data is available for the operation
    DataNotAvailable,
    /// An uploaded file could not be parsed
    Parse(String),
    /// A fit or distance computation failed
    Analysis(String),
    /// Writing the results file failed
    Export(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DataNotAvailable => write!(f, "No data available"),
            AppError::Parse(msg) => write!(f, "Upload failed: {}", msg),
            AppError::Analysis(msg) => write!(f, "Analysis failed: {}", msg),
            AppError::Export(msg) => write!(f, "Export failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Identity of one fit, bit-compared so unchanged parameters reuse the
/// cached curve instead of refitting every frame.
#[derive(Clone, PartialEq, Eq)]
pub(super) struct FitKey {
    well: String,
    smoothing: u64,
    min_temp: u64,
    max_temp: u64,
    avg_control_tm: Option<u64>,
}

impl FitKey {
    pub(super) fn new(
        well: &str,
        smoothing: f64,
        min_temp: f64,
        max_temp: f64,
        avg_control_tm: Option<f64>,
    ) -> Self {
        FitKey {
            well: well.to_string(),
            smoothing: smoothing.to_bits(),
            min_temp: min_temp.to_bits(),
            max_temp: max_temp.to_bits(),
            avg_control_tm: avg_control_tm.map(f64::to_bits),
        }
    }
}

pub(super) type FitCache = Option<(FitKey, Result<CurveFeatures, String>)>;

/// Fit one well, reusing the cache when the parameters did not move.
pub(super) fn cached_fit(
    cache: &mut FitCache,
    data: &PlateData,
    well: &str,
    smoothing: f64,
    min_temp: f64,
    max_temp: f64,
    avg_control_tm: Option<f64>,
) -> Result<CurveFeatures, String> {
    let key = FitKey::new(well, smoothing, min_temp, max_temp, avg_control_tm);
    if let Some((cached_key, result)) = cache
        && *cached_key == key
    {
        return result.clone();
    }

    let params = FitParams {
        min_temp,
        max_temp,
        smoothing,
    };
    let result = data
        .curve_for(well)
        .and_then(|curve| extract_curve_features(curve, &params, avg_control_tm))
        .map_err(|e| e.to_string());
    *cache = Some((key, result.clone()));
    result
}

#[derive(Deserialize, Serialize)]
pub struct DsfViewerApp {
    // UI preferences (persisted across runs)
    #[serde(default)]
    pub(super) page: Page,
    #[serde(default = "default_format")]
    pub(super) preferred_format: FileFormat,

    // Session and runtime state - skipped, a restart starts a fresh session
    #[serde(skip)]
    pub(super) session: SessionState,
    #[serde(skip)]
    pub(super) batch_promise: Option<Promise<BTreeMap<String, WellRecord>>>,
    #[serde(skip)]
    pub(super) last_error: Option<AppError>,
    #[serde(skip)]
    pub(super) notice: Option<String>,
    #[serde(skip)]
    pub(super) just_saved_well: Option<String>,
    #[serde(skip)]
    pub(super) classification_changed: bool,

    // Working temperature window on the well page; saved per well on demand
    #[serde(skip)]
    pub(super) well_min_temp: f64,
    #[serde(skip)]
    pub(super) well_max_temp: f64,

    // Per-page fit caches
    #[serde(skip)]
    pub(super) control_fit_cache: FitCache,
    #[serde(skip)]
    pub(super) well_fit_cache: FitCache,
}

fn default_format() -> FileFormat {
    FileFormat::QuantStudio7
}

impl DsfViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, preloaded: Option<PlateData>) -> Self {
        let mut app = cc
            .storage
            .and_then(|storage| eframe::get_value::<DsfViewerApp>(storage, eframe::APP_KEY))
            .unwrap_or_else(DsfViewerApp::with_initial_state);

        #[cfg(debug_assertions)]
        if crate::config::PRINT_STATE_SERDE {
            log::info!("restored UI preferences, starting on {:?}", app.page);
        }

        if let Some(data) = preloaded {
            app.preferred_format = data.format;
            app.session.install_plate(data);
            app.page = Page::Upload;
        } else if !app.page.is_unlocked(&app.session) {
            // Sessions are not persisted, so deep links into the workflow
            // would land on a locked page.
            app.page = Page::Home;
        }

        app
    }

    pub fn with_initial_state() -> Self {
        DsfViewerApp {
            page: Page::default(),
            preferred_format: default_format(),
            session: SessionState::new(),
            batch_promise: None,
            last_error: None,
            notice: None,
            just_saved_well: None,
            classification_changed: false,
            well_min_temp: 0.0,
            well_max_temp: 0.0,
            control_fit_cache: None,
            well_fit_cache: None,
        }
    }

    pub(super) fn is_analyzing(&self) -> bool {
        self.batch_promise.is_some()
    }

    pub(super) fn poll_batch_analysis(&mut self, ctx: &egui::Context) {
        let Some(promise) = self.batch_promise.take() else {
            return;
        };
        match promise.try_take() {
            Ok(records) => {
                // If the data was replaced while the thread ran, the results
                // refer to the old plate and are dropped.
                if self.session.has_data() {
                    let analyzed = records.len();
                    self.session.well_records = records;
                    if self.session.selected_well.is_none() {
                        self.session.selected_well = self.session.available_wells.first().cloned();
                    }
                    self.well_min_temp = self.session.min_temp;
                    self.well_max_temp = self.session.max_temp;
                    self.notice = Some(format!("Analyzed {analyzed} wells"));
                }
            }
            Err(promise) => {
                self.batch_promise = Some(promise);
                ctx.request_repaint_after(std::time::Duration::from_millis(150));
            }
        }
    }

    pub(super) fn spawn_batch_analysis(&mut self) {
        let Some(data) = self.session.data.clone() else {
            self.last_error = Some(AppError::DataNotAvailable);
            return;
        };

        let wells = self.session.available_wells.clone();
        let params = FitParams {
            min_temp: self.session.min_temp,
            max_temp: self.session.max_temp,
            smoothing: self.session.smoothing_features,
        };
        let avg_control_tm = self.session.avg_control_tm;
        let classes: BTreeMap<String, crate::models::WellClass> = wells
            .iter()
            .map(|well| (well.clone(), self.session.class_for(well)))
            .collect();

        #[cfg(debug_assertions)]
        if PRINT_UI_INTERACTIONS {
            log::info!("[wells] starting whole-plate analysis of {} wells", wells.len());
        }

        self.batch_promise = Some(Promise::spawn_thread("plate_analysis", move || {
            crate::analysis::features::analyze_plate(&data, &wells, &params, avg_control_tm, &classes)
        }));
    }

    fn render_nav_panel(&mut self, ctx: &egui::Context) {
        let frame = egui::Frame::new().fill(UI_CONFIG.colors.side_panel);
        egui::SidePanel::left("nav_panel")
            .min_width(UI_CONFIG.nav_panel_width)
            .frame(frame)
            .show(ctx, |ui| {
                ui.add_space(10.0);
                ui.heading(colored_heading("DSF Viewer"));
                ui.label_subdued("Melt-curve analysis dashboard");
                spaced_separator(ui);

                for page in Page::ALL {
                    let missing = page.missing_requirements(&self.session);
                    let unlocked = missing.is_empty();

                    let mut response = ui.add_enabled(
                        unlocked,
                        egui::SelectableLabel::new(self.page == page, page.title()),
                    );
                    if !unlocked {
                        let hint: Vec<&str> = missing.iter().map(|r| r.label()).collect();
                        response = response
                            .on_disabled_hover_text(format!("Complete first: {}", hint.join(", ")));
                    }
                    if response.clicked() && self.page != page {
                        #[cfg(debug_assertions)]
                        if PRINT_UI_INTERACTIONS {
                            log::info!("[nav] switching to {}", page.title());
                        }
                        self.page = page;
                        self.notice = None;
                        self.last_error = None;
                    }
                }

                spaced_separator(ui);
                self.render_session_summary(ui);
            });
    }

    /// Compact session overview at the bottom of the navigation panel.
    fn render_session_summary(&self, ui: &mut egui::Ui) {
        ui.label_subheader("Session");
        match (&self.session.plate_size, &self.session.file_format) {
            (Some(size), Some(format)) => {
                ui.metric("Plate", &format!("{size}-well"), UI_CONFIG.colors.label);
                ui.metric("Format", &format.to_string(), UI_CONFIG.colors.label);
                ui.metric(
                    "Wells",
                    &self.session.available_wells.len().to_string(),
                    UI_CONFIG.colors.label,
                );
            }
            _ => {
                ui.label_subdued("No data loaded");
            }
        }
        if !self.session.control_wells.is_empty() {
            ui.metric(
                "Controls",
                &self.session.control_wells.len().to_string(),
                UI_CONFIG.colors.label,
            );
        }
        if let Some(avg) = self.session.avg_control_tm {
            ui.metric("Avg control Tm", &format_celsius(avg), UI_CONFIG.colors.accent);
        }
        if self.session.has_well_analysis() {
            ui.metric(
                "Analyzed",
                &self.session.well_records.len().to_string(),
                UI_CONFIG.colors.good,
            );
        }
    }

    fn render_status_panel(&mut self, ctx: &egui::Context) {
        let status_frame = egui::Frame::new()
            .fill(UI_CONFIG.colors.side_panel)
            .inner_margin(egui::Margin::symmetric(8, 4));
        egui::TopBottomPanel::bottom("status_panel")
            .frame(status_frame)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if self.is_analyzing() {
                        ui.spinner();
                        ui.label_warning("Analyzing plate…");
                        ui.separator();
                    }

                    if let Some(error) = &self.last_error {
                        ui.label_error(error.to_string());
                        ui.separator();
                    } else if let Some(notice) = &self.notice {
                        ui.label_good(notice.as_str());
                        ui.separator();
                    }

                    let classified = self.session.typical_wells.len()
                        + self.session.undecided_wells.len()
                        + self.session.atypical_wells.len();
                    if classified > 0 {
                        ui.metric(
                            "Typical",
                            &self.session.typical_wells.len().to_string(),
                            UI_CONFIG.colors.good,
                        );
                        ui.metric(
                            "Undecided",
                            &self.session.undecided_wells.len().to_string(),
                            UI_CONFIG.colors.warning,
                        );
                        ui.metric(
                            "Atypical",
                            &self.session.atypical_wells.len().to_string(),
                            UI_CONFIG.colors.error,
                        );
                    }
                });
            });
    }

    fn render_central_panel(&mut self, ctx: &egui::Context) {
        let frame = egui::Frame::new()
            .fill(UI_CONFIG.colors.central_panel)
            .inner_margin(egui::Margin::symmetric(16, 8));
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("page_scroll")
                .show(ui, |ui| {
                    if !self.page.is_unlocked(&self.session) {
                        self.render_locked_page(ui);
                        return;
                    }
                    match self.page {
                        Page::Home => self.show_home_page(ui),
                        Page::Upload => self.show_upload_page(ui),
                        Page::Controls => self.show_controls_page(ui),
                        Page::Atypical => self.show_atypical_page(ui),
                        Page::Wells => self.show_wells_page(ui),
                        Page::Summary => self.show_summary_page(ui),
                    }
                });
        });
    }

    fn render_locked_page(&self, ui: &mut egui::Ui) {
        ui.add_space(40.0);
        ui.vertical_centered(|ui| {
            ui.heading(self.page.title());
            ui.add_space(10.0);
            ui.label_warning("Please complete the following steps first:");
            for requirement in self.page.missing_requirements(&self.session) {
                ui.label(requirement.label());
            }
        });
    }

    fn show_home_page(&mut self, ui: &mut egui::Ui) {
        crate::ui::utils::section_heading(ui, "Differential Scanning Fluorimetry");
        ui.label("This application analyzes DSF plate-reader data and reports per-well melting-temperature shifts.");
        ui.add_space(10.0);
        ui.label("Work through the pages in order:");
        ui.add_space(4.0);
        for (page, description) in [
            (Page::Upload, "select the file format and load your data"),
            (Page::Controls, "pick control wells and fit their melt curves"),
            (Page::Atypical, "flag wells whose signal shape is unusual"),
            (Page::Wells, "fit every well and review the ΔTm values"),
            (Page::Summary, "inspect the plate heatmap and download the results"),
        ] {
            ui.horizontal(|ui| {
                ui.label_subheader(page.title());
                ui.label_subdued(description);
            });
        }
        spaced_separator(ui);
        ui.label_subdued(
            "Tip: the make_demo_plate companion binary writes a synthetic dataset for trying the workflow.",
        );
    }
}

impl eframe::App for DsfViewerApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        setup_custom_visuals(ctx);

        self.poll_batch_analysis(ctx);

        self.render_nav_panel(ctx);
        self.render_status_panel(ctx);
        self.render_central_panel(ctx);
    }
}
