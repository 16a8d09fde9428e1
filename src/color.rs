use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::analysis::quantile::QuartileLabel;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// ColorBrewer "Dark2": distinct, print-safe hues for small group counts.
const DARK2: [Color32; 8] = [
    Color32::from_rgb(0x1b, 0x9e, 0x77),
    Color32::from_rgb(0xd9, 0x5f, 0x02),
    Color32::from_rgb(0x75, 0x70, 0xb3),
    Color32::from_rgb(0xe7, 0x29, 0x8a),
    Color32::from_rgb(0x66, 0xa6, 0x1e),
    Color32::from_rgb(0xe6, 0xab, 0x02),
    Color32::from_rgb(0xa6, 0x76, 0x1d),
    Color32::from_rgb(0x66, 0x66, 0x66),
];

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

/// Dark2 when it has enough entries, evenly spaced hues otherwise.
pub fn group_palette(n: usize) -> Vec<Color32> {
    if n <= DARK2.len() {
        DARK2[..n].to_vec()
    } else {
        generate_palette(n)
    }
}

// ---------------------------------------------------------------------------
// Color mapping: quantile label → Color32
// ---------------------------------------------------------------------------

/// Maps labels `1..=k` to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    colors: Vec<Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(k: usize) -> Self {
        ColorMap {
            colors: group_palette(k),
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given label.
    pub fn color_for(&self, label: QuartileLabel) -> Color32 {
        (label as usize)
            .checked_sub(1)
            .and_then(|i| self.colors.get(i))
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Return the legend entries (label → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(QuartileLabel, Color32)> {
        self.colors
            .iter()
            .enumerate()
            .map(|(i, c)| (i as QuartileLabel + 1, *c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_palette_has_distinct_colours() {
        let colors = generate_palette(12);
        assert_eq!(colors.len(), 12);
        for (i, a) in colors.iter().enumerate() {
            assert!(colors[i + 1..].iter().all(|b| a != b));
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn small_groups_use_dark2() {
        assert_eq!(group_palette(4), DARK2[..4].to_vec());
        assert_eq!(group_palette(9).len(), 9);
    }

    #[test]
    fn labels_outside_the_map_are_grey() {
        let map = ColorMap::new(4);
        assert_eq!(map.color_for(1), DARK2[0]);
        assert_eq!(map.color_for(4), DARK2[3]);
        assert_eq!(map.color_for(0), Color32::GRAY);
        assert_eq!(map.color_for(5), Color32::GRAY);
        assert_eq!(map.legend_entries().len(), 4);
        assert_eq!(map.legend_entries()[2].0, 3);
    }
}
