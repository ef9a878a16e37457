//! Headless Chrome renderer (uses the `headless_chrome` crate).
//!
//! Each render launches a fresh browser, writes the markup into a blank
//! page, measures the rendered `<pre>`, sizes the window to exactly that
//! box and takes one clipped screenshot. The `Browser` value owns the
//! process and kills it when dropped, so every return path releases it.

use std::path::PathBuf;
use std::time::Duration;

use headless_chrome::protocol::cdp::Page;
use headless_chrome::types::Bounds;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde::Deserialize;

use super::{
    clamp_dimensions, has_content_block, Capture, RenderError, Renderer,
    DEFAULT_DEVICE_SCALE_FACTOR, MAX_CAPTURE_DIMENSION,
};

/// Environment variable naming the Chrome executable.
pub const CHROME_PATH_ENV: &str = "ASCII_SNAP_CHROME";

/// Initial window size before the content is measured.
const INITIAL_WINDOW: (u32, u32) = (1200, 800);

/// Keywords that mark a browser error as a timeout.
const TIMEOUT_KEYWORDS: &[&str] = &["timed out", "timeout"];

/// Script returning the `<pre>` border box in page coordinates as JSON, or
/// null without one.
const MEASURE_SCRIPT: &str = r#"(function() {
    const pre = document.querySelector('pre');
    if (!pre) return null;
    pre.scrollIntoView({ block: 'start', inline: 'start' });
    const rect = pre.getBoundingClientRect();
    return JSON.stringify({
        left: rect.left + window.scrollX,
        top: rect.top + window.scrollY,
        right: rect.right + window.scrollX,
        bottom: rect.bottom + window.scrollY
    });
})()"#;

/// Launch and capture settings.
#[derive(Debug, Clone)]
pub struct ChromeOptions {
    /// Chrome executable; `None` lets `headless_chrome` locate one
    pub executable: Option<PathBuf>,
    /// Per-dimension capture limit in CSS pixels
    pub max_dimension: u32,
    pub device_scale_factor: f64,
    /// Pause after resizing so fonts and layout settle
    pub settle: Duration,
    /// Timeout for each browser operation
    pub timeout: Duration,
}

impl Default for ChromeOptions {
    fn default() -> Self {
        Self {
            executable: std::env::var_os(CHROME_PATH_ENV).map(PathBuf::from),
            max_dimension: MAX_CAPTURE_DIMENSION,
            device_scale_factor: DEFAULT_DEVICE_SCALE_FACTOR,
            settle: Duration::from_millis(50),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Border box of the `<pre>`, borders included, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
struct Measured {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

/// Whole-pixel capture rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClipBox {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl Measured {
    /// Snap outward to whole pixels so fractional edges stay inside the clip.
    fn clip_box(&self) -> ClipBox {
        let x = self.left.floor().max(0.0);
        let y = self.top.floor().max(0.0);
        let w = (self.right.ceil() - x).max(0.0);
        let h = (self.bottom.ceil() - y).max(0.0);
        ClipBox {
            x: x.min(u32::MAX as f64) as u32,
            y: y.min(u32::MAX as f64) as u32,
            w: w.min(u32::MAX as f64) as u32,
            h: h.min(u32::MAX as f64) as u32,
        }
    }
}

/// Renders markup with a headless Chrome process per call.
#[derive(Debug, Clone, Default)]
pub struct ChromeRenderer {
    options: ChromeOptions,
}

impl ChromeRenderer {
    pub fn new(options: ChromeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ChromeOptions {
        &self.options
    }

    fn launch(&self) -> Result<Browser, RenderError> {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .path(self.options.executable.clone())
            .window_size(Some(INITIAL_WINDOW))
            .idle_browser_timeout(self.options.timeout)
            .build()
            .map_err(|e| RenderError::Launch(format!("invalid launch options: {}", e)))?;

        Browser::new(launch_options).map_err(|e| RenderError::Launch(e.to_string()))
    }

    fn failure(&self, context: &str, err: impl std::fmt::Display) -> RenderError {
        let message = err.to_string();
        let lower = message.to_lowercase();
        if TIMEOUT_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return RenderError::Timeout(self.options.timeout.as_millis() as u64);
        }
        RenderError::Failure(format!("{}: {}", context, message))
    }

    fn load_markup(&self, tab: &Tab, markup: &str) -> Result<(), RenderError> {
        tab.navigate_to("about:blank")
            .and_then(|t| t.wait_until_navigated())
            .map_err(|e| self.failure("navigation failed", e))?;

        // A JSON string is a valid JS string literal
        let literal = serde_json::to_string(markup)
            .map_err(|e| RenderError::Failure(format!("failed to encode markup: {}", e)))?;
        let script = format!(
            "document.open(); document.write({}); document.close(); true",
            literal
        );
        tab.evaluate(&script, false)
            .map_err(|e| self.failure("failed to set content", e))?;
        Ok(())
    }

    fn measure(&self, tab: &Tab) -> Result<Measured, RenderError> {
        let result = tab
            .evaluate(MEASURE_SCRIPT, false)
            .map_err(|e| self.failure("measurement failed", e))?;

        let json = match result.value {
            Some(serde_json::Value::String(s)) => s,
            _ => return Err(RenderError::MissingContentBlock),
        };
        serde_json::from_str(&json)
            .map_err(|e| RenderError::Failure(format!("unexpected measurement {}: {}", json, e)))
    }
}

impl Renderer for ChromeRenderer {
    fn render(&self, markup: &str) -> Result<Capture, RenderError> {
        if markup.is_empty() {
            return Err(RenderError::MissingMarkup);
        }
        if !has_content_block(markup) {
            return Err(RenderError::MissingContentBlock);
        }

        let browser = self.launch()?;
        let tab = browser
            .new_tab()
            .map_err(|e| RenderError::Launch(format!("failed to open tab: {}", e)))?;
        tab.set_default_timeout(self.options.timeout);

        self.load_markup(&tab, markup)?;
        let measured = self.measure(&tab)?.clip_box();
        let (width, height) = clamp_dimensions(measured.w, measured.h, self.options.max_dimension);
        if (width, height) != (measured.w, measured.h) {
            log::warn!(
                "Clamped capture from {}x{} to {}x{}",
                measured.w,
                measured.h,
                width,
                height
            );
        }

        // Window covers the block exactly, so one capture needs no stitching
        tab.set_bounds(Bounds::Normal {
            left: Some(0),
            top: Some(0),
            width: Some(measured.x as f64 + width as f64),
            height: Some(measured.y as f64 + height as f64),
        })
        .map_err(|e| self.failure("failed to resize window", e))?;
        std::thread::sleep(self.options.settle);

        let clip = Page::Viewport {
            x: measured.x as f64,
            y: measured.y as f64,
            width: width as f64,
            height: height as f64,
            scale: self.options.device_scale_factor,
        };
        let png = tab
            .capture_screenshot(
                Page::CaptureScreenshotFormatOption::Png,
                None,
                Some(clip),
                true,
            )
            .map_err(|e| self.failure("screenshot failed", e))?;

        log::info!(
            "Captured {}x{} block ({} bytes)",
            width,
            height,
            png.len()
        );
        Ok(Capture { png, width, height })
    }
}
