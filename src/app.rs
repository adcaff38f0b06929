use eframe::egui;

use squeeze_bench::ViewerSettings;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SqueezeBenchApp {
    pub state: AppState,
}

impl SqueezeBenchApp {
    pub fn new(settings: ViewerSettings) -> Self {
        Self {
            state: AppState::new(settings),
        }
    }
}

impl eframe::App for SqueezeBenchApp {
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

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::force_gap_plot(ui, &self.state);
        });
    }
}
