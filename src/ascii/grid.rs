//! Glyph grid assembly.

use super::mapping::map_pixel_to_char;
use super::{LuminanceFormula, Ramp, Rgb, SampledGrid};

/// One (character, colour) pair of the output.
///
/// `color` is `None` when the grid was built without colour; renderers
/// then use their fixed foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphCell {
    pub ch: char,
    pub color: Option<Rgb>,
}

impl GlyphCell {
    /// Cell colour, or `foreground` for monochrome cells.
    pub fn color_or(&self, foreground: Rgb) -> Rgb {
        self.color.unwrap_or(foreground)
    }
}

/// Row-major `width x height` grid of glyph cells.
///
/// Rows are exactly `width` cells long; every downstream renderer breaks
/// lines every `width` cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlyphGrid {
    width: u32,
    height: u32,
    cells: Vec<GlyphCell>,
}

impl GlyphGrid {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells(&self) -> &[GlyphCell] {
        &self.cells
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&GlyphCell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y as usize * self.width as usize + x as usize)
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[GlyphCell]> {
        self.cells.chunks_exact(self.width.max(1) as usize)
    }

    /// Whether cells carry their own colours.
    pub fn is_colorized(&self) -> bool {
        self.cells.iter().any(|c| c.color.is_some())
    }

    /// Plain text, one line per row, each terminated by `\n`.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height as usize);
        for row in self.rows() {
            out.extend(row.iter().map(|c| c.ch));
            out.push('\n');
        }
        out
    }

    /// Markup fragment, see [`super::markup::grid_to_html`].
    pub fn to_html(&self) -> String {
        super::markup::grid_to_html(self)
    }

    /// 24-bit ANSI colour text, see [`super::markup::grid_to_ansi`].
    pub fn to_ansi(&self, foreground: Rgb) -> String {
        super::markup::grid_to_ansi(self, foreground)
    }
}

/// Build a glyph grid from sampled pixels.
///
/// Each cell's glyph comes from `formula` applied to the pixel and mapped
/// onto `ramp`. With `colorize` the cell keeps the pixel's own RGB;
/// otherwise it has no colour of its own.
pub fn build(
    sampled: &SampledGrid,
    ramp: &Ramp,
    colorize: bool,
    formula: LuminanceFormula,
) -> GlyphGrid {
    let cells = sampled
        .pixels
        .iter()
        .map(|&px| GlyphCell {
            ch: map_pixel_to_char(px, ramp, formula),
            color: if colorize { Some(px) } else { None },
        })
        .collect();

    GlyphGrid {
        width: sampled.width,
        height: sampled.height,
        cells,
    }
}
