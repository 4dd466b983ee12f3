use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Heatmap gradient
// ---------------------------------------------------------------------------

/// Pale yellow → green → deep blue, sampled at `t` in `[0, 1]`.
pub fn heat_color(t: f32) -> Color32 {
    let stops = [
        Srgb::new(1.0_f32, 1.0, 0.85),
        Srgb::new(0.25, 0.71, 0.77),
        Srgb::new(0.03, 0.11, 0.35),
    ];
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (stops.len() - 1) as f32;
    let lo = (scaled.floor() as usize).min(stops.len() - 2);
    let frac = scaled - lo as f32;

    let a: LinSrgb = stops[lo].into_linear();
    let b: LinSrgb = stops[lo + 1].into_linear();
    to_color32(Srgb::from_linear(a.mix(b, frac)))
}

/// Readable text colour on top of `background`.
pub fn contrast_text(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps distinct values of a categorical column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from a column's distinct values.
    pub fn new(values: &BTreeSet<String>) -> Self {
        let palette = generate_palette(values.len());
        let mapping = values.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct() {
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        let unique: BTreeSet<[u8; 4]> = p.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 5);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_value_gets_default() {
        let values = BTreeSet::from(["AC".to_string(), "Sleeper".to_string()]);
        let map = ColorMap::new(&values);
        assert_ne!(map.color_for("AC"), map.color_for("Sleeper"));
        assert_eq!(map.color_for("Seater"), Color32::GRAY);
    }

    #[test]
    fn heat_gradient_endpoints() {
        let pale = heat_color(0.0);
        assert!(pale.r() > 240 && pale.g() > 240);
        assert_eq!(contrast_text(heat_color(0.0)), Color32::BLACK);
        assert_eq!(contrast_text(heat_color(1.0)), Color32::WHITE);
        assert_eq!(heat_color(f32::NAN), heat_color(0.0));
    }
}
