//! PNG capture of exported ASCII documents.
//!
//! A [`Renderer`] turns exported markup into PNG bytes. The HTTP front end
//! lives in [`server`]; the headless Chrome implementation in `chrome`
//! (cargo feature `chrome`).

#[cfg(feature = "chrome")]
pub mod chrome;
pub mod server;

#[cfg(feature = "chrome")]
pub use chrome::{ChromeOptions, ChromeRenderer};
pub use server::{extract_markup, ScreenshotService, ServiceResponse};

/// Largest capture size per dimension. Chromium refuses surfaces much
/// beyond 16384px.
pub const MAX_CAPTURE_DIMENSION: u32 = 15000;

/// Device pixels per CSS pixel in the capture.
pub const DEFAULT_DEVICE_SCALE_FACTOR: f64 = 2.0;

/// A single-shot capture of the rendered `<pre>` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// PNG-encoded image
    pub png: Vec<u8>,
    /// Captured width in CSS pixels (after clamping)
    pub width: u32,
    /// Captured height in CSS pixels (after clamping)
    pub height: u32,
}

/// Renders exported markup to an image.
///
/// Implementations make a single attempt per call and release every
/// resource they acquired before returning, on success or failure.
pub trait Renderer {
    fn render(&self, markup: &str) -> Result<Capture, RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&self, markup: &str) -> Result<Capture, RenderError> {
        (**self).render(markup)
    }
}

/// Errors that can occur while capturing markup.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Missing html")]
    MissingMarkup,

    #[error("Missing <pre> block")]
    MissingContentBlock,

    /// The browser could not be started
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Render timed out after {0}ms")]
    Timeout(u64),

    #[error("Render failed: {0}")]
    Failure(String),
}

impl RenderError {
    /// Whether the request itself was at fault (client error).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RenderError::MissingMarkup | RenderError::MissingContentBlock
        )
    }
}

/// Clamp measured dimensions to `[1, max]`.
pub fn clamp_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    (width.clamp(1, max.max(1)), height.clamp(1, max.max(1)))
}

/// Whether the markup contains a `<pre>` block to capture.
pub fn has_content_block(markup: &str) -> bool {
    markup.to_ascii_lowercase().contains("<pre")
}
