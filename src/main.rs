mod analysis;
mod app;
mod color;
mod config;
mod data;
mod report;
mod state;
mod ui;

use app::CensusExplorerApp;
use config::Config;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    // Loads `.env` first so RUST_LOG can live there too.
    let config = Config::from_env();
    env_logger::init();

    let mut state = match config {
        Ok(config) => AppState::new(&config),
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            let mut state = AppState::new(&Config::default());
            state.status_message = Some(format!("Configuration error: {e}"));
            state
        }
    };
    state.reload();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Census Data Exploration",
        options,
        Box::new(|_cc| Ok(Box::new(CensusExplorerApp::new(state)))),
    )
}
