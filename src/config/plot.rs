//! Plot and heatmap rendering configuration

pub struct PlotConfig {
    // Diverging ramp for Tm shifts (cold = stabilized? no: negative shift)
    pub delta_tm_gradient_colors: &'static [&'static str],
    // Sequential ramp for DTW distances (blue = similar, red = different)
    pub distance_gradient_colors: &'static [&'static str],
    // Gap between heatmap cells, as a fraction of the cell size
    pub heatmap_cell_inset: f64,
    // Vertical share of the melt plot used to display the rescaled derivative
    pub derivative_display_fraction: f64,
    pub raw_point_radius: f32,
    pub melt_plot_height: f32,
    pub heatmap_height: f32,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    delta_tm_gradient_colors: &["#313695", "#74add1", "#f7f7f7", "#f46d43", "#a50026"],
    distance_gradient_colors: &["#2c7bb6", "#abd9e9", "#ffffbf", "#fdae61", "#d7191c"],
    heatmap_cell_inset: 0.06,
    derivative_display_fraction: 0.35,
    raw_point_radius: 1.8,
    melt_plot_height: 340.0,
    heatmap_height: 420.0,
};
