//! RGB to luminance conversion.
//!
//! Two weightings are supported and one is chosen per configuration:
//! - NTSC / ITU-R BT.601: Y = 0.299*R + 0.587*G + 0.114*B
//! - ITU-R BT.709:        Y = 0.2126*R + 0.7152*G + 0.0722*B
//!
//! Both use integer math with the coefficients scaled so they sum to an
//! exact power of ten, and round to the nearest integer.

use std::fmt;

use super::Rgb;

/// Luminance weighting used to pick a glyph from the ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LuminanceFormula {
    /// BT.601 weights (0.299, 0.587, 0.114)
    #[default]
    Ntsc,
    /// BT.709 weights (0.2126, 0.7152, 0.0722)
    Rec709,
}

impl LuminanceFormula {
    /// Luminance of an RGB triple, in [0, 255].
    #[inline]
    pub fn luminance(self, r: u8, g: u8, b: u8) -> u8 {
        let (r, g, b) = (r as u32, g as u32, b as u32);
        let y = match self {
            // 299 + 587 + 114 = 1000
            LuminanceFormula::Ntsc => (299 * r + 587 * g + 114 * b + 500) / 1000,
            // 2126 + 7152 + 722 = 10000
            LuminanceFormula::Rec709 => (2126 * r + 7152 * g + 722 * b + 5000) / 10000,
        };
        y as u8
    }

    /// Luminance of a sampled cell colour.
    #[inline]
    pub fn of(self, rgb: Rgb) -> u8 {
        self.luminance(rgb.r, rgb.g, rgb.b)
    }

    pub fn name(&self) -> &'static str {
        match self {
            LuminanceFormula::Ntsc => "ntsc",
            LuminanceFormula::Rec709 => "rec709",
        }
    }

    /// Parse a formula name as written in config files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ntsc" | "bt601" | "rec601" => Some(LuminanceFormula::Ntsc),
            "rec709" | "bt709" => Some(LuminanceFormula::Rec709),
            _ => None,
        }
    }
}

impl fmt::Display for LuminanceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Convert a slice of cell colours to luminance values.
pub fn to_luminance(pixels: &[Rgb], formula: LuminanceFormula) -> Vec<u8> {
    pixels.iter().map(|&p| formula.of(p)).collect()
}
