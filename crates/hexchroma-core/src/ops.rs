//! The four user-facing color operations.
//!
//! All of them are pure functions of a canonical [`HexColor`]; validation
//! happens before anything in here is called.

use crate::codec::{HexColor, RgbColor, decode};
use crate::hsl::{hsl_to_rgb, rgb_to_hsl};

/// Built-in names, keyed by canonical HEX digits.
static NAMED_COLORS: &[(&str, &str)] = &[
    ("FF0000", "Vermelho Puro"),
    ("00FF00", "Verde Limão"),
    ("0000FF", "Azul Puro"),
    ("4682B4", "Azul Aço (Steel Blue)"),
    ("FFD700", "Ouro"),
];

/// Entries offered back to callers when a lookup misses.
pub const SUGGESTED_NAMES: &[&str] = &["FF0000", "4682B4", "FFD700"];

#[must_use]
pub fn to_rgb(hex: HexColor) -> RgbColor {
    decode(hex)
}

/// Per-channel inversion, `255 - c`.
#[must_use]
pub fn invert(rgb: RgbColor) -> RgbColor {
    RgbColor::new(255 - rgb.red, 255 - rgb.green, 255 - rgb.blue)
}

/// The "complementary" color as served by the API: RGB inversion.
///
/// This is not a hue complement: it only agrees with a 180° rotation for
/// fully saturated primaries and secondaries.
#[must_use]
pub fn complementary(hex: HexColor) -> RgbColor {
    invert(decode(hex))
}

/// The base color followed by its +120° and +240° hue rotations.
#[must_use]
pub fn triadic_palette(hex: HexColor) -> [RgbColor; 3] {
    let base = decode(hex);
    let hsl = rgb_to_hsl(base);
    [
        base,
        hsl_to_rgb(hsl.rotate(120)),
        hsl_to_rgb(hsl.rotate(240)),
    ]
}

#[must_use]
pub fn lookup_name(hex: HexColor) -> Option<&'static str> {
    NAMED_COLORS
        .iter()
        .find(|(key, _)| *key == hex.as_str())
        .map(|(_, name)| *name)
}

/// The full name table, in declaration order.
pub fn known_names() -> impl Iterator<Item = (HexColor, &'static str)> {
    NAMED_COLORS
        .iter()
        .filter_map(|(key, name)| HexColor::parse(key).ok().map(|hex| (hex, *name)))
}
