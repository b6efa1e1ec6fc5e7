use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct GenreExplorerApp {
    pub state: AppState,
}

impl GenreExplorerApp {
    pub fn new(mut state: AppState) -> Self {
        state.open_initial();
        Self { state }
    }
}

impl eframe::App for GenreExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table above chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a file to explore  (File → Open…)");
                });
                return;
            }

            let table_height = (ui.available_height() - self.state.config.chart.height - 40.0).max(80.0);
            table::pivot_table(ui, &self.state.table, table_height);
            ui.separator();
            plot::line_chart(ui, &self.state);
        });
    }
}
