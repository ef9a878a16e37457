//! Nearest-neighbor resampling of a bitmap into the glyph grid resolution.
//!
//! Sampling happens in two conceptual stages:
//!
//! 1. **Stretch** - the image is widened by `stretch` (height unchanged) to
//!    compensate for monospace cells being taller than they are wide.
//! 2. **Downsample** - the stretched image is resampled to exactly
//!    `target_width` columns, with rows chosen to keep the stretched aspect
//!    ratio.
//!
//! Both stages pick pixels by nearest neighbor. Smoothing would blur the
//! luminance edges the character ramp depends on at low resolution.

use super::AsciiError;
use crate::source::PixelSource;

/// Largest grid `sample` will allocate, in cells (a 4096-column grid with
/// 16384 rows).
pub const MAX_GRID_CELLS: u64 = 4096 * 16384;

/// RGB colour of one sampled cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex form, e.g. `#ff0010`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rgb` or `#rrggbb` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Rgb::new(digit(0)?, digit(1)?, digit(2)?))
            }
            6 => {
                let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Rgb::new(pair(0)?, pair(2)?, pair(4)?))
            }
            _ => None,
        }
    }
}

/// A fixed-width, low-resolution grid of RGB samples, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledGrid {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgb>,
}

impl SampledGrid {
    /// Sample at grid position (x, y).
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgb]> {
        self.pixels.chunks_exact(self.width.max(1) as usize)
    }
}

/// Check sampling parameters before any pixel work.
pub fn validate_params(target_width: u32, stretch: f64) -> Result<(), AsciiError> {
    if target_width < 1 {
        return Err(AsciiError::InvalidConfig(
            "target width must be at least 1".to_string(),
        ));
    }
    if !stretch.is_finite() || stretch <= 0.0 {
        return Err(AsciiError::InvalidConfig(format!(
            "stretch factor must be a positive number, got {}",
            stretch
        )));
    }
    Ok(())
}

/// Width of the image after the horizontal stretch stage.
fn stretched_width(img_width: u32, stretch: f64) -> u32 {
    ((img_width as f64 * stretch).round() as u32).max(1)
}

/// Calculate the sampled grid size for an image.
///
/// Width is always `target_width`. Height is
/// `round(img_height * target_width / round(img_width * stretch))`, at least 1.
/// Grids larger than [`MAX_GRID_CELLS`] are rejected as `InvalidConfig`.
///
/// # Example
/// ```ignore
/// // 1000x500 widened 5% to 1050x500, then reduced to 200 columns
/// let (w, h) = sampled_dimensions(1000, 500, 200, 1.05)?;
/// assert_eq!((w, h), (200, 95));
/// ```
pub fn sampled_dimensions(
    img_width: u32,
    img_height: u32,
    target_width: u32,
    stretch: f64,
) -> Result<(u32, u32), AsciiError> {
    validate_params(target_width, stretch)?;
    if img_width == 0 || img_height == 0 {
        return Err(AsciiError::InvalidImage(format!(
            "image has zero dimension ({}x{})",
            img_width, img_height
        )));
    }

    let sw = stretched_width(img_width, stretch);
    let rows = (img_height as f64 * target_width as f64 / sw as f64)
        .round()
        .max(1.0);
    let cells = rows * target_width as f64;
    if rows > u32::MAX as f64 || cells > MAX_GRID_CELLS as f64 {
        return Err(AsciiError::InvalidConfig(format!(
            "{}x{} image at width {} needs {} rows, over the {} cell limit",
            img_width, img_height, target_width, rows, MAX_GRID_CELLS
        )));
    }
    let height = rows as u32;
    Ok((target_width, height))
}

/// Resample an image into a `target_width`-column grid.
///
/// Each output cell takes the pixel under its centre, traced back through
/// the stretched coordinate space to the source image. Alpha is ignored.
///
/// # Errors
/// - `InvalidConfig` if `target_width < 1` or `stretch` is not a positive number
/// - `InvalidImage` if the image has a zero dimension
pub fn sample<S: PixelSource + ?Sized>(
    image: &S,
    target_width: u32,
    stretch: f64,
) -> Result<SampledGrid, AsciiError> {
    let (img_width, img_height) = image.dimensions();
    let (width, height) = sampled_dimensions(img_width, img_height, target_width, stretch)?;
    let sw = stretched_width(img_width, stretch);

    // Source column for each output column, via the stretched image
    let columns: Vec<u32> = (0..width)
        .map(|x| {
            let xs = nearest(x, width, sw);
            nearest(xs, sw, img_width)
        })
        .collect();

    let cells = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| AsciiError::InvalidConfig(format!("{}x{} grid is too large", width, height)))?;
    let mut pixels = Vec::with_capacity(cells);
    for y in 0..height {
        let sy = nearest(y, height, img_height);
        for &sx in &columns {
            let [r, g, b, _a] = image.pixel(sx, sy);
            pixels.push(Rgb { r, g, b });
        }
    }

    log::debug!(
        "Sampled {}x{} image (stretch {}) to {}x{} grid",
        img_width,
        img_height,
        stretch,
        width,
        height
    );

    Ok(SampledGrid {
        width,
        height,
        pixels,
    })
}

/// Nearest source index for `dst` when mapping `dst_len` cells onto `src_len`.
#[inline]
fn nearest(dst: u32, dst_len: u32, src_len: u32) -> u32 {
    let pos = ((dst as f64 + 0.5) * src_len as f64 / dst_len as f64).floor() as u32;
    pos.min(src_len - 1)
}
