use std::fmt;
use std::str::FromStr;

use bevy::color::{ColorToPacked, Hsva, Srgba};
use bevy::prelude::Color;
use serde::{Deserialize, Serialize};

use super::error::ConfiguratorError;

/// An opaque sRGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const WHITE: HexColor = HexColor::rgb(0xff, 0xff, 0xff);
    pub const BLACK: HexColor = HexColor::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_color(self) -> Color {
        Color::srgb_u8(self.r, self.g, self.b)
    }

    pub fn to_srgba(self) -> Srgba {
        Srgba::rgb_u8(self.r, self.g, self.b)
    }

    /// Quantizes to 8 bits per channel; alpha is dropped.
    pub fn from_srgba(c: Srgba) -> Self {
        let [r, g, b, _] = c.to_u8_array();
        Self { r, g, b }
    }

    pub fn to_hsva(self) -> Hsva {
        Hsva::from(self.to_srgba())
    }

    pub fn from_hsva(c: Hsva) -> Self {
        Self::from_srgba(Srgba::from(c))
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = ConfiguratorError;

    /// Accepts `#rgb` and `#rrggbb`, with or without the leading `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfiguratorError::InvalidColor(s.to_string());
        let digits = s.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |hex: &str| u8::from_str_radix(hex, 16).map_err(|_| invalid());
        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..=i]).map(|v| v * 0x11);
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for HexColor {
    type Error = ConfiguratorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_short_and_long_forms() {
        for s in ["#fff", "FFFFFF", "#FfFfFf", " #ffffff "] {
            assert_eq!(s.parse::<HexColor>().unwrap(), HexColor::WHITE, "{s}");
        }
        assert_eq!("#f00".parse::<HexColor>().unwrap(), HexColor::rgb(255, 0, 0));
        assert_eq!("#1a2b3c".parse::<HexColor>().unwrap(), HexColor::rgb(0x1a, 0x2b, 0x3c));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for s in ["#ggg", "#12345", "", "#", "#1234567", "rgb(0,0,0)", "#ééé"] {
            assert!(s.parse::<HexColor>().is_err(), "{s}");
        }
    }

    #[test]
    fn test_display_is_lower_case_long_form() {
        assert_eq!(HexColor::rgb(0xAB, 0x0C, 0xFF).to_string(), "#ab0cff");
        assert_eq!(HexColor::WHITE.to_string(), "#ffffff");
    }

    #[test]
    fn test_primary_colors_survive_hsv() {
        for c in [
            HexColor::rgb(255, 0, 0),
            HexColor::rgb(0, 255, 0),
            HexColor::rgb(0, 0, 255),
            HexColor::WHITE,
            HexColor::BLACK,
        ] {
            assert_eq!(HexColor::from_hsva(c.to_hsva()), c);
        }
    }

    #[test]
    fn test_ron_uses_hex_strings() {
        let text = ron::to_string(&HexColor::rgb(255, 0, 0)).unwrap();
        assert_eq!(text, "\"#ff0000\"");
        let back: HexColor = ron::from_str("\"#00ff00\"").unwrap();
        assert_eq!(back, HexColor::rgb(0, 255, 0));
    }
}
