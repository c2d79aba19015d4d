//! The per-well melt-curve plot: raw readings, smoothing fit, rescaled
//! derivative and the Tm marker.

use eframe::egui::Ui;
use egui_plot::{AxisHints, Corner, HPlacement, Legend, Line, LineStyle, Plot, PlotPoints, Points,
    VLine};

use crate::config::PLOT_CONFIG;
use crate::models::CurveFeatures;
use crate::ui::config::UI_CONFIG;

pub fn show_melt_curve(ui: &mut Ui, well: &str, features: &CurveFeatures) {
    let fitted: Vec<[f64; 2]> = features
        .x_spline
        .iter()
        .zip(&features.y_spline)
        .map(|(&x, &y)| [x, y])
        .collect();

    // The derivative lives on a different scale; squeeze it into the lower
    // band of the fluorescence range so both traces share one axis.
    let (d_min, d_max) = features
        .y_spline_derivative
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &d| {
            (lo.min(d), hi.max(d))
        });
    let band = features.fluorescence_range() * PLOT_CONFIG.derivative_display_fraction;
    let scale = if d_max > d_min { band / (d_max - d_min) } else { 0.0 };
    let derivative: Vec<[f64; 2]> = features
        .x_spline
        .iter()
        .zip(&features.y_spline_derivative)
        .map(|(&x, &d)| [x, features.min_fluorescence + (d - d_min) * scale])
        .collect();

    let legend = Legend::default().position(Corner::LeftTop);

    Plot::new(("melt_plot", well))
        .legend(legend)
        .height(PLOT_CONFIG.melt_plot_height)
        .custom_x_axes(vec![AxisHints::new_x().label("Temperature (°C)")])
        .custom_y_axes(vec![
            AxisHints::new_y()
                .label("Fluorescence")
                .placement(HPlacement::Left),
        ])
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new("Readings", PlotPoints::from(features.raw_points.clone()))
                    .radius(PLOT_CONFIG.raw_point_radius)
                    .color(UI_CONFIG.colors.raw_points),
            );
            plot_ui.line(
                Line::new("Fit", PlotPoints::from(fitted))
                    .color(UI_CONFIG.colors.fitted_curve)
                    .width(2.0),
            );
            plot_ui.line(
                Line::new("dF/dT (rescaled)", PlotPoints::from(derivative))
                    .color(UI_CONFIG.colors.derivative)
                    .style(LineStyle::dashed_loose()),
            );
            plot_ui.vline(
                VLine::new("Tm", features.tm)
                    .color(UI_CONFIG.colors.tm_marker)
                    .style(LineStyle::dashed_dense()),
            );
        });
}
