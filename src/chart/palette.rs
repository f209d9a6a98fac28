use std::collections::HashMap;

use egui::Color32;

use crate::laps::Compound;

pub const PALETTE_BLACK: Color32 = Color32::from_rgb(0, 0, 0);
pub const PALETTE_WHITE: Color32 = Color32::from_rgb(255, 255, 255);
pub const PALETTE_GREY: Color32 = Color32::from_rgb(128, 128, 128);

// tyre compound colours used on the broadcast graphics
pub const COMPOUND_SOFT: Color32 = Color32::from_rgb(0xda, 0x29, 0x1c);
pub const COMPOUND_MEDIUM: Color32 = Color32::from_rgb(0xff, 0xd1, 0x2e);
pub const COMPOUND_HARD: Color32 = Color32::from_rgb(0xf0, 0xf0, 0xec);
pub const COMPOUND_INTERMEDIATE: Color32 = Color32::from_rgb(0x43, 0xb0, 0x2a);
pub const COMPOUND_WET: Color32 = Color32::from_rgb(0x00, 0x67, 0xad);
pub const COMPOUND_UNKNOWN: Color32 = Color32::from_rgb(0x00, 0xff, 0xff);
pub const COMPOUND_TEST_UNKNOWN: Color32 = Color32::from_rgb(0x43, 0x46, 0x49);

/// Ten distinguishable categorical colours
pub const TAB10: [Color32; 10] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
    Color32::from_rgb(0xe3, 0x77, 0xc2),
    Color32::from_rgb(0x7f, 0x7f, 0x7f),
    Color32::from_rgb(0xbc, 0xbd, 0x22),
    Color32::from_rgb(0x17, 0xbe, 0xcf),
];

/// Orange, red, blue, green, purple, brown
pub const TRACE_COLORS: [Color32; 6] = [
    Color32::from_rgb(255, 165, 0),
    Color32::from_rgb(255, 0, 0),
    Color32::from_rgb(0, 0, 255),
    Color32::from_rgb(0, 128, 0),
    Color32::from_rgb(128, 0, 128),
    Color32::from_rgb(165, 42, 42),
];

pub fn compound_color(compound: Compound) -> Color32 {
    match compound {
        Compound::Soft => COMPOUND_SOFT,
        Compound::Medium => COMPOUND_MEDIUM,
        Compound::Hard => COMPOUND_HARD,
        Compound::Intermediate => COMPOUND_INTERMEDIATE,
        Compound::Wet => COMPOUND_WET,
        Compound::TestUnknown => COMPOUND_TEST_UNKNOWN,
        Compound::Unknown => COMPOUND_UNKNOWN,
    }
}

/// Colour at `index`, wrapping around the palette
pub fn cycle_color(palette: &[Color32], index: usize) -> Color32 {
    if palette.is_empty() {
        PALETTE_GREY
    } else {
        palette[index % palette.len()]
    }
}

/// Colours keyed by driver, team or compound name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorMap {
    colors: HashMap<String, Color32>,
}

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcast colour of every compound, keyed by compound name
    pub fn compounds() -> Self {
        [
            Compound::Soft,
            Compound::Medium,
            Compound::Hard,
            Compound::Intermediate,
            Compound::Wet,
            Compound::TestUnknown,
            Compound::Unknown,
        ]
        .into_iter()
        .map(|compound| (compound.name(), compound_color(compound)))
        .collect()
    }

    pub fn with(mut self, key: &str, color: Color32) -> Self {
        self.insert(key, color);
        self
    }

    pub fn insert(&mut self, key: &str, color: Color32) {
        self.colors.insert(key.to_string(), color);
    }

    pub fn get(&self, key: &str) -> Option<Color32> {
        self.colors.get(key).copied()
    }

    pub fn get_or(&self, key: &str, fallback: Color32) -> Color32 {
        self.get(key).unwrap_or(fallback)
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl<'k> FromIterator<(&'k str, Color32)> for ColorMap {
    fn from_iter<T: IntoIterator<Item = (&'k str, Color32)>>(iter: T) -> Self {
        Self {
            colors: iter
                .into_iter()
                .map(|(key, color)| (key.to_string(), color))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_map_lookup_and_fallback() {
        let colors = ColorMap::new().with("VER", Color32::BLUE);
        assert_eq!(colors.get("VER"), Some(Color32::BLUE));
        assert_eq!(colors.get_or("HAM", PALETTE_BLACK), PALETTE_BLACK);
    }

    #[test]
    fn test_compound_map_uses_names() {
        let colors = ColorMap::compounds();
        assert_eq!(colors.get("SOFT"), Some(COMPOUND_SOFT));
        assert_eq!(colors.get("WET"), Some(COMPOUND_WET));
    }

    #[test]
    fn test_cycle_color_wraps() {
        assert_eq!(cycle_color(&TAB10, 11), TAB10[1]);
        assert_eq!(cycle_color(&[], 3), PALETTE_GREY);
    }
}
