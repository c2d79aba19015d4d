use eframe::egui::Color32;

/// UI Colors for consistent theming
#[derive(Clone, Copy, Default)]
pub struct UiColors {
    pub label: Color32,
    pub heading: Color32,
    pub subsection_heading: Color32,
    pub central_panel: Color32,
    pub side_panel: Color32,
    pub accent: Color32,
    pub good: Color32,
    pub warning: Color32,
    pub error: Color32,
    pub raw_points: Color32,
    pub fitted_curve: Color32,
    pub derivative: Color32,
    pub tm_marker: Color32,
    pub empty_cell: Color32,
}

/// Main UI configuration struct that holds all UI-related settings
#[derive(Default, Clone, Copy)]
pub struct UiConfig {
    pub colors: UiColors,
    pub nav_panel_width: f32,
    pub metrics_column_width: f32,
    pub well_picker_columns: usize,
}

/// Global UI configuration instance
pub static UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        label: Color32::from_gray(180),
        heading: Color32::from_rgb(120, 190, 255),
        subsection_heading: Color32::from_rgb(200, 170, 90),
        central_panel: Color32::from_rgb(28, 30, 34),
        side_panel: Color32::from_rgb(21, 22, 25),
        accent: Color32::from_rgb(100, 180, 255),
        good: Color32::from_rgb(130, 200, 140),
        warning: Color32::from_rgb(230, 200, 90),
        error: Color32::from_rgb(235, 110, 110),
        raw_points: Color32::from_gray(150),
        fitted_curve: Color32::from_rgb(100, 180, 255),
        derivative: Color32::from_rgb(230, 160, 80),
        tm_marker: Color32::from_rgb(235, 110, 110),
        empty_cell: Color32::from_gray(45),
    },
    nav_panel_width: 190.0,
    metrics_column_width: 170.0,
    well_picker_columns: 8,
};
