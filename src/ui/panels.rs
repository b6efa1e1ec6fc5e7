use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::export;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading(&state.config.title);
    ui.label(&state.config.description);
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Genre multiselect ----
            let n_selected = state.selection.categories.len();
            let n_total = dataset.categories.len();
            ui.strong(format!("Genres  ({n_selected}/{n_total})"));

            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all();
                }
                if ui.small_button("None").clicked() {
                    state.select_none();
                }
            });

            let mut toggled = None;
            for category in &dataset.categories {
                let mut checked = state.selection.categories.contains(category);
                let text = RichText::new(category).color(state.color_map.color_for(category));
                if ui.checkbox(&mut checked, text).changed() {
                    toggled = Some(category.clone());
                }
            }
            if let Some(category) = toggled {
                state.toggle_category(&category);
            }
            ui.separator();

            // ---- Year range ----
            ui.strong("Years");
            if let Some((lo, hi)) = dataset.year_bounds {
                let (mut min, mut max) = state.selection.year_range;
                ui.add(egui::Slider::new(&mut min, lo..=hi).text("from"));
                ui.add(egui::Slider::new(&mut max, lo..=hi).text("to"));
                if min > max {
                    ui.label(RichText::new("Start year is after end year.").weak());
                }
                state.set_year_range(min, max);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload data").clicked() {
                state.reload();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Export table CSV…").clicked() {
                save_dialog(state, "pivot.csv", "CSV", "csv", |state, path| {
                    let file = File::create(path).context("creating CSV file")?;
                    export::write_table_csv(&state.table, BufWriter::new(file))
                });
                ui.close_menu();
            }
            if ui.button("Export chart spec…").clicked() {
                save_dialog(state, "chart.vl.json", "Vega-Lite", "json", |state, path| {
                    let file = File::create(path).context("creating JSON file")?;
                    export::write_chart_spec(&state.config.chart, &state.series, BufWriter::new(file))
                });
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} years × {} genres shown",
                ds.len(),
                state.table.row_count(),
                state.table.column_count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}

fn save_dialog<F>(state: &mut AppState, file_name: &str, label: &str, ext: &str, write: F)
where
    F: FnOnce(&AppState, &Path) -> Result<()>,
{
    let Some(path) = rfd::FileDialog::new()
        .set_file_name(file_name)
        .add_filter(label, &[ext])
        .save_file()
    else {
        return;
    };

    match write(&*state, path.as_path()) {
        Ok(()) => {
            log::info!("Exported to {}", path.display());
            state.status_message = None;
        }
        Err(e) => {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
