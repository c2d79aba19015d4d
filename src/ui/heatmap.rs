//! Plate heatmaps: one colored cell per well, plate-style axes (row letters
//! down the side, column numbers along the top edge of the data).

use colorgrad::Gradient;
use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{AxisHints, GridMark, HPlacement, Plot, PlotPoints, Polygon};
use itertools::{Itertools, MinMaxResult};

use crate::config::PLOT_CONFIG;
use crate::domain::{PlateGrid, plate::row_label};
use crate::ui::config::UI_CONFIG;
use crate::ui::styles::UiStyleExt;

fn to_egui_color(colorgrad_color: colorgrad::Color) -> Color32 {
    let rgba8 = colorgrad_color.to_rgba8();
    Color32::from_rgba_unmultiplied(rgba8[0], rgba8[1], rgba8[2], 255)
}

/// Integer grid marks across the visible bounds, one per row/column.
fn integer_marks(bounds: (f64, f64), limit: usize) -> Vec<GridMark> {
    let (min, max) = bounds;
    let start = min.ceil().max(1.0) as i64;
    let end = max.floor().min(limit as f64) as i64;
    (start..=end)
        .map(|value| GridMark {
            value: value as f64,
            step_size: 1.0,
        })
        .collect()
}

/// Render a plate grid as a heatmap. `value_label` names the quantity for the
/// hover readout and the range caption underneath.
pub fn show_plate_heatmap(
    ui: &mut Ui,
    id_salt: &str,
    grid: &PlateGrid,
    value_label: &str,
    gradient_colors: &'static [&'static str],
) {
    let rows = grid.rows();
    let cols = grid.cols();

    let (low, high) = match grid.present_cells().map(|(_, _, v)| v).minmax() {
        MinMaxResult::MinMax(low, high) => (low, high),
        MinMaxResult::OneElement(only) => (only, only),
        MinMaxResult::NoElements => {
            ui.label_warning("No values to display yet.");
            return;
        }
    };

    let gradient = colorgrad::GradientBuilder::new()
        .html_colors(gradient_colors)
        .build::<colorgrad::CatmullRomGradient>()
        .expect("static gradient colors");

    let normalize = move |value: f64| -> f32 {
        if high > low {
            ((value - low) / (high - low)) as f32
        } else {
            0.5
        }
    };

    let inset = PLOT_CONFIG.heatmap_cell_inset;

    // Owned copies for the hover closure, which outlives this borrow.
    let hover_grid = grid.clone();
    let hover_label = value_label.to_string();

    Plot::new(("plate_heatmap", id_salt))
        .height(PLOT_CONFIG.heatmap_height)
        .data_aspect(1.0)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_boxed_zoom(false)
        .custom_x_axes(vec![
            AxisHints::new_x()
                .label("Column")
                .formatter(move |mark, _range| {
                    let value = mark.value.round();
                    if (mark.value - value).abs() < 0.01 && value >= 1.0 && value <= cols as f64 {
                        format!("{value:.0}")
                    } else {
                        String::new()
                    }
                }),
        ])
        .custom_y_axes(vec![
            AxisHints::new_y()
                .label("Row")
                .placement(HPlacement::Left)
                .formatter(move |mark, _range| {
                    let value = mark.value.round();
                    if (mark.value - value).abs() > 0.01 {
                        return String::new();
                    }
                    let index = rows as f64 - value;
                    if index >= 0.0 && index < rows as f64 {
                        row_label(index as usize)
                    } else {
                        String::new()
                    }
                }),
        ])
        .x_grid_spacer(move |input| integer_marks(input.bounds, cols))
        .y_grid_spacer(move |input| integer_marks(input.bounds, rows))
        .label_formatter(move |_name, point| {
            let col = point.x.round();
            let row = rows as f64 - point.y.round();
            if col < 1.0 || col > cols as f64 || row < 0.0 || row >= rows as f64 {
                return String::new();
            }
            let (row, col) = (row as usize, col as usize - 1);
            match hover_grid.value_at(row, col) {
                Some(value) => {
                    format!("{}{}\n{hover_label}: {value:.3}", row_label(row), col + 1)
                }
                None => format!("{}{}", row_label(row), col + 1),
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds_x(0.4..=cols as f64 + 0.6);
            plot_ui.set_plot_bounds_y(0.4..=rows as f64 + 0.6);

            for row in 0..rows {
                for col in 0..cols {
                    let value = grid.value_at(row, col);
                    let color = match value {
                        Some(v) => to_egui_color(gradient.at(normalize(v))),
                        None => UI_CONFIG.colors.empty_cell,
                    };

                    let x = (col + 1) as f64;
                    let y = rows as f64 - row as f64;
                    let half = 0.5 - inset;
                    let corners = vec![
                        [x - half, y - half],
                        [x + half, y - half],
                        [x + half, y + half],
                        [x - half, y + half],
                    ];

                    plot_ui.polygon(
                        Polygon::new("", PlotPoints::from(corners))
                            .fill_color(color)
                            .stroke(Stroke::new(0.5, UI_CONFIG.colors.side_panel)),
                    );
                }
            }
        });

    ui.horizontal(|ui| {
        ui.metric(value_label, &format!("{low:.3} … {high:.3}"), UI_CONFIG.colors.accent);
        ui.label_subdued("(colored low → high; gray cells have no value)");
    });
}
