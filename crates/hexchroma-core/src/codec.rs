//! HEX ↔ RGB codec.
//!
//! [`HexColor`] is the canonical six-digit form: uppercase, no `#`. The only
//! way to build one from text is [`HexColor::parse`], which also expands the
//! three-digit shorthand, so [`decode`] is total.

use crate::error::ColorError;
use core::fmt;
use core::str::FromStr;
use serde::{Serialize, Serializer};

/// A canonical six-digit HEX color (`FF5733`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor([u8; 6]);

/// An RGB triple, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct RgbColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RgbColor {
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    #[must_use]
    pub const fn to_array(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self { red, green, blue }
    }
}

/// Formats as `r, g, b`, the wire format of the `rgb` response fields.
impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.red, self.green, self.blue)
    }
}

fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

/// `HexColor` only ever holds validated digits.
fn nibble(b: u8) -> u8 {
    debug_assert!(b.is_ascii_hexdigit(), "non-hex byte {b:#04x} in HexColor");
    char::from(b).to_digit(16).map_or(0, |d| d as u8)
}

const UPPER_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

impl HexColor {
    /// Validate and normalize a raw color parameter.
    ///
    /// Accepts an optional single leading `#` followed by exactly 3 or 6 hex
    /// digits in either case. The 3-digit form is expanded by doubling each
    /// digit (`F00` → `FF0000`).
    pub fn parse(raw: &str) -> Result<Self, ColorError> {
        let digits = raw.strip_prefix('#').unwrap_or(raw);
        if digits.is_empty() {
            return Err(if raw.is_empty() {
                ColorError::MissingParameter
            } else {
                invalid(raw, "no digits after '#'")
            });
        }

        let bytes = digits.as_bytes();
        if !bytes.iter().copied().all(is_hex_digit) {
            return Err(invalid(raw, "non-hex digit"));
        }

        let mut out = [0u8; 6];
        match bytes.len() {
            3 => {
                for (i, b) in bytes.iter().enumerate() {
                    let up = b.to_ascii_uppercase();
                    out[i * 2] = up;
                    out[i * 2 + 1] = up;
                }
            }
            6 => {
                for (slot, b) in out.iter_mut().zip(bytes) {
                    *slot = b.to_ascii_uppercase();
                }
            }
            _ => return Err(invalid(raw, "wrong length")),
        }
        Ok(Self(out))
    }

    /// Expand a 3-digit shorthand into its 6-digit spelling.
    ///
    /// Inputs that are not exactly three characters are returned unchanged.
    #[must_use]
    pub fn expand(shorthand: &str) -> String {
        if shorthand.chars().count() != 3 {
            return shorthand.to_string();
        }
        shorthand.chars().flat_map(|c| [c, c]).collect()
    }

    /// The canonical digits, e.g. `"FF5733"`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Only ASCII hex digits are ever stored.
        core::str::from_utf8(&self.0).unwrap_or("000000")
    }

    /// `#RRGGBB`, the form responses echo back.
    #[must_use]
    pub fn prefixed(&self) -> String {
        format!("#{}", self.as_str())
    }
}

fn invalid(raw: &str, reason: &'static str) -> ColorError {
    ColorError::InvalidFormat {
        value: raw.to_string(),
        reason,
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl From<RgbColor> for HexColor {
    fn from(rgb: RgbColor) -> Self {
        encode(rgb)
    }
}

impl From<HexColor> for RgbColor {
    fn from(hex: HexColor) -> Self {
        decode(hex)
    }
}

/// Split the canonical digits into three base-16 pairs.
#[must_use]
pub fn decode(hex: HexColor) -> RgbColor {
    let d = hex.0;
    let pair = |hi: u8, lo: u8| (nibble(hi) << 4) | nibble(lo);
    RgbColor {
        red: pair(d[0], d[1]),
        green: pair(d[2], d[3]),
        blue: pair(d[4], d[5]),
    }
}

/// Two zero-padded uppercase digits per channel, in R, G, B order.
#[must_use]
pub fn encode(rgb: RgbColor) -> HexColor {
    let mut out = [0u8; 6];
    for (i, channel) in rgb.to_array().into_iter().enumerate() {
        out[i * 2] = UPPER_DIGITS[usize::from(channel >> 4)];
        out[i * 2 + 1] = UPPER_DIGITS[usize::from(channel & 0x0f)];
    }
    HexColor(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> HexColor {
        HexColor::parse(s).unwrap()
    }

    #[test]
    fn decode_six_digits() {
        assert_eq!(decode(hex("FF5733")), RgbColor::new(255, 87, 51));
    }

    #[test]
    fn decode_shorthand() {
        assert_eq!(decode(hex("F00")), RgbColor::new(255, 0, 0));
        assert_eq!(decode(hex("#abc")), decode(hex("AABBCC")));
    }

    #[test]
    fn parse_normalizes_case_and_prefix() {
        assert_eq!(hex("ff5733").as_str(), "FF5733");
        assert_eq!(hex("#Ff5733").as_str(), "FF5733");
        assert_eq!(hex("f00").as_str(), "FF0000");
        assert_eq!(hex("#1e90ff").prefixed(), "#1E90FF");
    }

    #[test]
    fn parse_rejects_wrong_length() {
        for bad in ["12345", "1234", "12", "1234567", "#12345"] {
            let err = HexColor::parse(bad).unwrap_err();
            assert!(
                matches!(err, ColorError::InvalidFormat { reason: "wrong length", .. }),
                "{bad}: {err:?}"
            );
        }
    }

    #[test]
    fn parse_rejects_non_hex() {
        for bad in ["ZZZZZZ", "GGG", "<script>", "' OR 1=1--", "FF 733"] {
            assert!(HexColor::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn parse_rejects_double_prefix_and_non_ascii() {
        assert!(HexColor::parse("##FFF").is_err());
        assert!(HexColor::parse("FFÉ").is_err());
        assert!(HexColor::parse("ＦＦＦ").is_err());
    }

    #[test]
    fn parse_empty_is_missing() {
        assert_eq!(HexColor::parse(""), Err(ColorError::MissingParameter));
        assert!(matches!(
            HexColor::parse("#"),
            Err(ColorError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn encode_pads_and_uppercases() {
        assert_eq!(encode(RgbColor::new(0, 255, 255)).as_str(), "00FFFF");
        assert_eq!(encode(RgbColor::new(1, 2, 3)).as_str(), "010203");
        assert_eq!(encode(RgbColor::new(171, 205, 239)).as_str(), "ABCDEF");
    }

    #[test]
    fn expand_doubles_each_digit() {
        assert_eq!(HexColor::expand("F00"), "FF0000");
        assert_eq!(HexColor::expand("a1c"), "aa11cc");
        assert_eq!(HexColor::expand("FF0000"), "FF0000");
    }

    #[test]
    fn rgb_display_is_comma_separated() {
        assert_eq!(RgbColor::new(255, 87, 51).to_string(), "255, 87, 51");
    }

    #[test]
    fn from_str_matches_parse() {
        let parsed: HexColor = "#0f0".parse().unwrap();
        assert_eq!(parsed, hex("00FF00"));
        assert!("xyz".parse::<HexColor>().is_err());
    }

    #[test]
    fn serializes_as_bare_digits() {
        let json = serde_json::to_string(&hex("#4682b4")).unwrap();
        assert_eq!(json, "\"4682B4\"");
    }

    #[test]
    fn nibble_reads_both_cases() {
        assert_eq!(nibble(b'0'), 0);
        assert_eq!(nibble(b'a'), 10);
        assert_eq!(nibble(b'F'), 15);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "non-hex byte")]
    fn nibble_rejects_unvalidated_bytes() {
        let _ = nibble(b'G');
    }
}
