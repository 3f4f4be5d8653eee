use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TrellisApp {
    pub state: AppState,
}

impl TrellisApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for TrellisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: colour scale ----
        egui::TopBottomPanel::bottom("color_scale").show(ctx, |ui| {
            panels::color_scale_bar(ui, &self.state);
        });

        // ---- Central panel: trellis ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::trellis_plot(ui, &mut self.state);
        });
    }
}
