//! Image to ASCII-art conversion.
//!
//! This module provides the complete sampling pipeline:
//!
//! 1. **Sampling** - stretch and nearest-neighbor resample to a fixed-width grid
//! 2. **Luminance** - RGB to brightness using BT.601 (NTSC) or BT.709 weights
//! 3. **Character mapping** - brightness to a glyph of the configured ramp
//! 4. **Grid building** - row-major (glyph, colour) cells with HTML, text
//!    and ANSI serializations
//!
//! Every step is pure: identical image and options always give an identical grid.
//!
//! # Character Sets
//!
//! Presets are available via [`CharSet`]:
//! - `Standard` - 11-level ASCII ramp `" .:-=+*#%@&"`
//! - `Blocks` - Unicode block characters
//! - `Dense` - 70-level ASCII ramp

mod charset;
mod converter;
mod error;
mod grid;
mod luminance;
mod mapping;
pub mod markup;
mod sample;

pub use charset::{CharSet, Ramp, BLOCKS_CHARSET, DENSE_CHARSET, STANDARD_CHARSET};
pub use converter::{Converter, LatestGrid, Ticket};
pub use error::AsciiError;
pub use grid::{build, GlyphCell, GlyphGrid};
pub use luminance::{to_luminance, LuminanceFormula};
pub use mapping::{char_index, map_pixel_to_char, map_to_chars};
pub use markup::escape_html;
pub use sample::{sample, sampled_dimensions, validate_params, Rgb, SampledGrid, MAX_GRID_CELLS};

use crate::source::PixelSource;

/// Default output width in characters.
pub const DEFAULT_TARGET_WIDTH: u32 = 200;

/// Default horizontal stretch (widen 5%).
pub const DEFAULT_STRETCH: f64 = 1.05;

/// Options for one conversion. Never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiOptions {
    /// Output width in characters
    pub target_width: u32,
    /// Horizontal stretch applied before downsampling (1.0 disables)
    pub stretch: f64,
    /// Glyph ramp, darkest first
    pub ramp: Ramp,
    /// Keep each pixel's colour
    pub colorize: bool,
    /// Weighting used to pick glyphs
    pub luminance: LuminanceFormula,
}

impl Default for AsciiOptions {
    fn default() -> Self {
        Self {
            target_width: DEFAULT_TARGET_WIDTH,
            stretch: DEFAULT_STRETCH,
            ramp: Ramp::default(),
            colorize: true,
            luminance: LuminanceFormula::default(),
        }
    }
}

impl AsciiOptions {
    /// Reject invalid options before any pixel work.
    pub fn validate(&self) -> Result<(), AsciiError> {
        validate_params(self.target_width, self.stretch)
    }
}

/// Run the full pipeline: sample, map luminance, build the glyph grid.
///
/// Call again whenever the image or options change; nothing is cached here
/// (see [`Converter`] for memoization).
pub fn convert<S: PixelSource + ?Sized>(
    image: &S,
    options: &AsciiOptions,
) -> Result<GlyphGrid, AsciiError> {
    options.validate()?;
    let sampled = sample(image, options.target_width, options.stretch)?;
    Ok(build(
        &sampled,
        &options.ramp,
        options.colorize,
        options.luminance,
    ))
}
