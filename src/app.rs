use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, views};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RailboardApp {
    pub state: AppState,
}

impl RailboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for RailboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + tab strip ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
            panels::tab_strip(ui, &mut self.state);
        });

        // ---- Central panel: active view ----
        egui::CentralPanel::default().show(ctx, |ui| {
            views::active_view(ui, &mut self.state);
        });
    }
}
