use airport_dashboard::config::Config;
use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AirportDashboardApp {
    pub state: AppState,
}

impl AirportDashboardApp {
    /// Build the app and open the configured dataset, if any.
    pub fn new(config: Config) -> Self {
        let startup_path = config.data.path.clone();
        let mut state = AppState::new(config);
        if let Some(path) = startup_path {
            state.open(&path);
        }
        Self { state }
    }
}

impl eframe::App for AirportDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: map and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::dashboard(ui, &self.state);
        });
    }
}
