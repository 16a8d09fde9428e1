use eframe::egui;

use crate::state::AppState;
use crate::ui::{page, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CensusExplorerApp {
    pub state: AppState,
}

impl CensusExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for CensusExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: quantile and axis controls ----
        egui::SidePanel::left("control_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: statistics and plots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            page::exploration_page(ui, &self.state);
        });
    }
}
