use palette::{Hsl, IntoColor, Srgb};
use serde::Serialize;

use crate::data::model::FacilityType;

// ---------------------------------------------------------------------------
// Rgb – renderer-agnostic colour triple
// ---------------------------------------------------------------------------

/// An 8-bit RGB triple; serializes as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const RED: Rgb = Rgb([255, 0, 0]);
    pub const ORANGE: Rgb = Rgb([255, 165, 0]);
    pub const GREEN: Rgb = Rgb([0, 255, 0]);
    pub const PURPLE: Rgb = Rgb([128, 0, 128]);
    pub const CYAN: Rgb = Rgb([0, 255, 255]);
    pub const GRAY: Rgb = Rgb([128, 128, 128]);
    /// Used for facility types without a dedicated colour.
    pub const FALLBACK: Rgb = Rgb([200, 200, 200]);

    pub fn r(self) -> u8 {
        self.0[0]
    }

    pub fn g(self) -> u8 {
        self.0[1]
    }

    pub fn b(self) -> u8 {
        self.0[2]
    }
}

// ---------------------------------------------------------------------------
// Facility type → map colour
// ---------------------------------------------------------------------------

/// Map colour for a facility type. Never fails: unknown types get
/// [`Rgb::FALLBACK`].
pub fn facility_color(facility_type: &FacilityType) -> Rgb {
    match facility_type {
        FacilityType::SmallAirport => Rgb::RED,
        FacilityType::MediumAirport => Rgb::ORANGE,
        FacilityType::LargeAirport => Rgb::GREEN,
        FacilityType::Heliport => Rgb::PURPLE,
        FacilityType::SeaplaneBase => Rgb::CYAN,
        FacilityType::Closed => Rgb::GRAY,
        FacilityType::Other(_) => Rgb::FALLBACK,
    }
}

/// Human name of a facility colour, as shown in the map legend.
pub fn facility_color_name(facility_type: &FacilityType) -> &'static str {
    match facility_type {
        FacilityType::SmallAirport => "Red",
        FacilityType::MediumAirport => "Orange",
        FacilityType::LargeAirport => "Green",
        FacilityType::Heliport => "Purple",
        FacilityType::SeaplaneBase => "Cyan",
        FacilityType::Closed => "Gray",
        FacilityType::Other(_) => "Light Gray",
    }
}

// ---------------------------------------------------------------------------
// Chart palette
// ---------------------------------------------------------------------------

/// Slice colours for categorical charts, in category order.
const CHART_COLORS: [Rgb; 6] = [
    Rgb::RED,
    Rgb::ORANGE,
    Rgb::GREEN,
    Rgb::PURPLE,
    Rgb::CYAN,
    Rgb::GRAY,
];

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Rgb([
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            ])
        })
        .collect()
}

/// `n` chart colours: the six fixed ones first, generated hues after that.
pub fn chart_palette(n: usize) -> Vec<Rgb> {
    let mut colors: Vec<Rgb> = CHART_COLORS.iter().copied().take(n).collect();
    if n > CHART_COLORS.len() {
        colors.extend(generate_palette(n - CHART_COLORS.len()));
    }
    colors
}
