use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use squeeze_bench::ConfigurationLabel;

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
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: configuration label → Color32
// ---------------------------------------------------------------------------

/// Maps configuration labels to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<ConfigurationLabel, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map over the given labels, in the given order.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a ConfigurationLabel>) -> Self {
        let labels: Vec<&ConfigurationLabel> = labels.into_iter().collect();
        let palette = generate_palette(labels.len());
        let mapping = labels
            .into_iter()
            .cloned()
            .zip(palette)
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given label.
    pub fn color_for(&self, label: &ConfigurationLabel) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        assert_ne!(colors[0], colors[1]);
    }

    #[test]
    fn unknown_label_is_gray() {
        let labels = [ConfigurationLabel::new("3mm 100x100"), ConfigurationLabel::new("3mm 50x50")];
        let cm = ColorMap::new(&labels);
        assert_ne!(cm.color_for(&labels[0]), cm.color_for(&labels[1]));
        assert_eq!(cm.color_for(&ConfigurationLabel::new("9mm")), Color32::GRAY);
    }
}
