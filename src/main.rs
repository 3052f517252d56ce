mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::RailboardApp;
use eframe::egui;
use state::AppState;

const DEFAULT_DATA_PATH: &str = "data/railway_journeys.csv";

fn main() -> eframe::Result {
    env_logger::init();

    let data_path: PathBuf = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string())
        .into();

    // The dashboard is useless without data: a failed startup load is
    // fatal and reported before any window opens.
    let mut state = AppState::new(data_path);
    state.reload();
    if state.table.is_none() {
        eprintln!(
            "{}",
            state
                .status_message
                .as_deref()
                .unwrap_or("Error: could not load data")
        );
        std::process::exit(1);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Railboard – UK Rail Ticket Sales",
        options,
        Box::new(|_cc| Ok(Box::new(RailboardApp::new(state)))),
    )
}
