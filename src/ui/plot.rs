use eframe::egui::Ui;
use egui_plot::{uniform_grid_spacer, Legend, Line, Plot, PlotPoints};

use crate::chart;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Line chart (central panel, below the table)
// ---------------------------------------------------------------------------

/// One line per category, years on an ordinal x axis.
pub fn line_chart(ui: &mut Ui, state: &AppState) {
    let spec = &state.config.chart;
    let axis = chart::year_axis(&state.series);
    let lines = chart::lines(&state.series);

    Plot::new("gross_chart")
        .height(spec.height)
        .legend(Legend::default())
        .x_axis_label(spec.x_title.as_str())
        .y_axis_label(spec.y_title.as_str())
        // Ticks only on whole positions; each one is a year.
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(move |mark, _range| chart::year_label(&axis, mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (category, points) in lines {
                let line = Line::new(PlotPoints::from(points))
                    .name(&category)
                    .color(state.color_map.color_for(&category))
                    .width(2.0);
                plot_ui.line(line);
            }
        });
}
