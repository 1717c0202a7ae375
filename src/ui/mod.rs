pub mod panels;
pub mod plot;

use airport_dashboard::color::Rgb;
use eframe::egui::Color32;

pub fn color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.r(), rgb.g(), rgb.b())
}
