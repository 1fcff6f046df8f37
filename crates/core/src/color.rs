//! Particle display colors.
//!
//! Group profiles name colors either by a small set of CSS names
//! (`"blue"`, `"green"`, ...) or as `#rrggbb` hex.

use crate::error::EngineError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Named colors accepted in group profiles.
const NAMED: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("white", "#ffffff"),
    ("red", "#ff0000"),
    ("green", "#008000"),
    ("blue", "#0000ff"),
    ("yellow", "#ffff00"),
    ("orange", "#ffa500"),
    ("purple", "#800080"),
    ("cyan", "#00ffff"),
    ("magenta", "#ff00ff"),
    ("gray", "#808080"),
    ("grey", "#808080"),
];

impl Srgb {
    pub const WHITE: Srgb = Srgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    pub fn from_hex(hex: &str) -> Result<Srgb, EngineError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(EngineError::InvalidColor(format!(
                "expected 6 hex digits, got {hex:?}"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| v as f64 / 255.0)
                .map_err(|e| EngineError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb {
            r: channel(0..2, "red")?,
            g: channel(2..4, "green")?,
            b: channel(4..6, "blue")?,
        })
    }

    /// Looks up a named color (case insensitive).
    pub fn from_name(name: &str) -> Option<Srgb> {
        let lower = name.to_ascii_lowercase();
        NAMED
            .iter()
            .find(|(n, _)| *n == lower)
            .and_then(|(_, hex)| Srgb::from_hex(hex).ok())
    }

    /// Parses a color name or hex string.
    pub fn parse(s: &str) -> Result<Srgb, EngineError> {
        match Srgb::from_name(s) {
            Some(c) => Ok(c),
            None if s.starts_with('#') => Srgb::from_hex(s),
            None => Err(EngineError::InvalidColor(format!(
                "{s:?} is neither a known color name nor #rrggbb"
            ))),
        }
    }

    /// Components quantized to 8 bits.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Scales every component by `factor`, clamped to [0, 1].
    pub fn shade(self, factor: f64) -> Srgb {
        Srgb {
            r: (self.r * factor).clamp(0.0, 1.0),
            g: (self.g * factor).clamp(0.0, 1.0),
            b: (self.b * factor).clamp(0.0, 1.0),
        }
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blue_and_green_resolve() {
        assert_eq!(Srgb::parse("blue").unwrap().to_hex(), "#0000ff");
        assert_eq!(Srgb::parse("green").unwrap().to_hex(), "#008000");
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(Srgb::parse("Blue").unwrap(), Srgb::parse("blue").unwrap());
    }

    #[test]
    fn hex_parses_with_and_without_hash() {
        let a = Srgb::from_hex("#ff8000").unwrap();
        let b = Srgb::from_hex("FF8000").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_rgb8(), [255, 128, 0]);
    }

    #[test]
    fn parse_accepts_hex() {
        assert_eq!(Srgb::parse("#123456").unwrap().to_hex(), "#123456");
    }

    #[test]
    fn parse_rejects_unknown_name() {
        let err = Srgb::parse("chartreuse-ish").unwrap_err();
        assert!(matches!(err, EngineError::InvalidColor(_)));
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(Srgb::from_hex("#12345").is_err());
        assert!(Srgb::from_hex("#zzzzzz").is_err());
        assert!(Srgb::from_hex("#ééé").is_err());
    }

    #[test]
    fn shade_darkens_and_clamps() {
        let c = Srgb::parse("white").unwrap().shade(0.5);
        assert_eq!(c.to_rgb8(), [128, 128, 128]);
        let bright = Srgb::parse("gray").unwrap().shade(10.0);
        assert_eq!(bright.to_rgb8(), [255, 255, 255]);
    }

    #[test]
    fn serde_round_trip_through_hex() {
        let c = Srgb::parse("orange").unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#ffa500\"");
        let back: Srgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn deserialize_accepts_names() {
        let c: Srgb = serde_json::from_str("\"blue\"").unwrap();
        assert_eq!(c.to_hex(), "#0000ff");
    }
}
