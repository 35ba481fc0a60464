//! RGB ↔ HSL, integer-rounded.
//!
//! Only used to rotate hue for palette generation. Both directions round to
//! whole degrees/percents, so `hsl_to_rgb(rgb_to_hsl(x))` may drift from `x`
//! by a step or two per channel.

use crate::codec::RgbColor;
use serde::Serialize;

/// Hue in whole degrees `[0, 360)`, saturation and lightness in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct HslColor {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl HslColor {
    /// Build a color, wrapping `hue` modulo 360 and capping the percentages at 100.
    #[must_use]
    pub fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Self {
            hue: hue % 360,
            saturation: saturation.min(100),
            lightness: lightness.min(100),
        }
    }

    /// Same saturation and lightness, hue advanced by `degrees` (mod 360).
    #[must_use]
    pub fn rotate(self, degrees: u16) -> Self {
        let hue = (u32::from(self.hue) + u32::from(degrees)) % 360;
        Self {
            hue: hue as u16,
            ..self
        }
    }
}

/// Round half up, matching the behavior callers expect from `x.5` percentages.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

#[must_use]
pub fn rgb_to_hsl(rgb: RgbColor) -> HslColor {
    let r = f64::from(rgb.red) / 255.0;
    let g = f64::from(rgb.green) / 255.0;
    let b = f64::from(rgb.blue) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    let (h, s) = if rgb.red == rgb.green && rgb.green == rgb.blue {
        (0.0, 0.0)
    } else {
        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        // Channel order matters on ties: red wins, then green.
        let sector = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (sector / 6.0, s)
    };

    let hue = round_half_up(h * 360.0) as u16 % 360;
    HslColor {
        hue,
        saturation: round_half_up(s * 100.0).clamp(0.0, 100.0) as u8,
        lightness: round_half_up(l * 100.0).clamp(0.0, 100.0) as u8,
    }
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

fn to_byte(unit: f64) -> u8 {
    round_half_up(unit * 255.0).clamp(0.0, 255.0) as u8
}

#[must_use]
pub fn hsl_to_rgb(hsl: HslColor) -> RgbColor {
    let h = f64::from(hsl.hue % 360) / 360.0;
    let s = f64::from(hsl.saturation.min(100)) / 100.0;
    let l = f64::from(hsl.lightness.min(100)) / 100.0;

    if hsl.saturation == 0 {
        let v = to_byte(l);
        return RgbColor::new(v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    RgbColor::new(
        to_byte(hue_to_channel(p, q, h + 1.0 / 3.0)),
        to_byte(hue_to_channel(p, q, h)),
        to_byte(hue_to_channel(p, q, h - 1.0 / 3.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_to_hsl() {
        assert_eq!(rgb_to_hsl(RgbColor::new(255, 0, 0)), HslColor::new(0, 100, 50));
        assert_eq!(
            rgb_to_hsl(RgbColor::new(0, 255, 0)),
            HslColor::new(120, 100, 50)
        );
        assert_eq!(
            rgb_to_hsl(RgbColor::new(0, 0, 255)),
            HslColor::new(240, 100, 50)
        );
    }

    #[test]
    fn achromatic_has_zero_hue_and_saturation() {
        for v in [0u8, 1, 127, 128, 254, 255] {
            let hsl = rgb_to_hsl(RgbColor::new(v, v, v));
            assert_eq!(hsl.hue, 0);
            assert_eq!(hsl.saturation, 0);
        }
        assert_eq!(rgb_to_hsl(RgbColor::new(255, 255, 255)).lightness, 100);
        assert_eq!(rgb_to_hsl(RgbColor::new(0, 0, 0)).lightness, 0);
    }

    #[test]
    fn known_mixed_color() {
        // #FF5733
        let hsl = rgb_to_hsl(RgbColor::new(255, 87, 51));
        assert_eq!(hsl, HslColor::new(11, 100, 60));
    }

    #[test]
    fn hue_near_full_turn_wraps_to_zero() {
        // Hue of ~359.8 rounds to 360, which must come back as 0.
        let hsl = rgb_to_hsl(RgbColor::new(255, 0, 1));
        assert!(hsl.hue < 360);
        assert_eq!(hsl.hue, 0);
    }

    #[test]
    fn hsl_to_rgb_primaries() {
        assert_eq!(hsl_to_rgb(HslColor::new(0, 100, 50)), RgbColor::new(255, 0, 0));
        assert_eq!(
            hsl_to_rgb(HslColor::new(120, 100, 50)),
            RgbColor::new(0, 255, 0)
        );
        assert_eq!(
            hsl_to_rgb(HslColor::new(240, 100, 50)),
            RgbColor::new(0, 0, 255)
        );
    }

    #[test]
    fn hsl_to_rgb_achromatic() {
        assert_eq!(
            hsl_to_rgb(HslColor::new(200, 0, 50)),
            RgbColor::new(128, 128, 128)
        );
        assert_eq!(hsl_to_rgb(HslColor::new(0, 0, 100)), RgbColor::new(255, 255, 255));
    }

    #[test]
    fn rotate_wraps() {
        let hsl = HslColor::new(300, 40, 60);
        assert_eq!(hsl.rotate(120).hue, 60);
        assert_eq!(hsl.rotate(240).hue, 180);
        assert_eq!(hsl.rotate(120).saturation, 40);
        assert_eq!(hsl.rotate(240).lightness, 60);
    }

    #[test]
    fn new_normalizes_out_of_range() {
        let hsl = HslColor::new(725, 150, 101);
        assert_eq!(hsl, HslColor::new(5, 100, 100));
    }

    #[test]
    fn round_trip_is_close() {
        let samples = [
            RgbColor::new(255, 87, 51),
            RgbColor::new(70, 130, 180),
            RgbColor::new(30, 144, 255),
            RgbColor::new(12, 200, 99),
        ];
        for rgb in samples {
            let back = hsl_to_rgb(rgb_to_hsl(rgb));
            for (a, b) in rgb.to_array().into_iter().zip(back.to_array()) {
                assert!(a.abs_diff(b) <= 4, "{rgb:?} -> {back:?}");
            }
        }
    }
}
