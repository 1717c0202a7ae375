mod app;
mod state;
mod ui;

use airport_dashboard::config::Config;
use app::AirportDashboardApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::load_or_default(&Config::default_path());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "New England Airports Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(AirportDashboardApp::new(config)))),
    )
}
