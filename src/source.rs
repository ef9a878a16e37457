//! Decoded bitmaps that feed the sampling pipeline.
//!
//! The pipeline only needs dimensions and per-pixel RGBA access, expressed
//! by [`PixelSource`]. [`Image`] is the owned bitmap produced by decoding a
//! file or an in-memory buffer; `image::RgbaImage` implements the trait too.

use std::fmt;
use std::path::Path;

use crate::ascii::AsciiError;

/// Read-only pixel access for anything the sampler can consume.
pub trait PixelSource {
    /// Width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// RGBA value of the pixel at (x, y). Callers stay within `dimensions()`.
    fn pixel(&self, x: u32, y: u32) -> [u8; 4];
}

/// A decoded RGBA image. Immutable once loaded.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Image {
    /// Bytes per pixel (RGBA).
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Wrap raw RGBA bytes, row-major.
    ///
    /// Fails with `InvalidImage` when either dimension is 0 or the buffer
    /// length does not match `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, AsciiError> {
        if width == 0 || height == 0 {
            return Err(AsciiError::InvalidImage(format!(
                "image has zero dimension ({}x{})",
                width, height
            )));
        }
        let expected = width as usize * height as usize * Self::BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(AsciiError::InvalidImage(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Decode an encoded image (PNG, JPEG, GIF, BMP, WebP) from memory.
    pub fn decode(bytes: &[u8]) -> Result<Self, AsciiError> {
        let decoded = image::load_from_memory(bytes)?;
        Self::from_dynamic(decoded)
    }

    /// Decode an image file from disk.
    pub fn open(path: &Path) -> Result<Self, AsciiError> {
        let bytes = std::fs::read(path)?;
        let img = Self::decode(&bytes)?;
        log::debug!(
            "Decoded {} ({}x{})",
            path.display(),
            img.width,
            img.height
        );
        Ok(img)
    }

    fn from_dynamic(decoded: image::DynamicImage) -> Result<Self, AsciiError> {
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(width, height, rgba.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl PixelSource for Image {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * Self::BYTES_PER_PIXEL;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }
}

impl PixelSource for image::RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        image::RgbaImage::dimensions(self)
    }

    fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.get_pixel(x, y).0
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}
