//! Recompute-on-demand conversion with memoization and stale-result handling.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use sha2::{Digest, Sha256};

use super::{convert, AsciiError, AsciiOptions, GlyphGrid};
use crate::source::Image;

/// Converts images, reusing the previous grid when image and options are unchanged.
#[derive(Debug, Default)]
pub struct Converter {
    last: Option<(String, Arc<GlyphGrid>)>,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert `image` with `options`, or return the memoized grid if the
    /// content and options hash matches the previous call.
    pub fn convert(
        &mut self,
        image: &Image,
        options: &AsciiOptions,
    ) -> Result<Arc<GlyphGrid>, AsciiError> {
        options.validate()?;
        let key = Self::cache_key(image, options);

        if let Some((last_key, grid)) = &self.last {
            if *last_key == key {
                log::debug!("Reusing cached grid {}", key);
                return Ok(Arc::clone(grid));
            }
        }

        let grid = Arc::new(convert(image, options)?);
        self.last = Some((key, Arc::clone(&grid)));
        Ok(grid)
    }

    /// Drop the memoized grid.
    pub fn clear(&mut self) {
        self.last = None;
    }

    /// Deterministic hash of image content and options.
    /// Returns a 32-character hex string (first 16 bytes of SHA256).
    pub fn cache_key(image: &Image, options: &AsciiOptions) -> String {
        let mut hasher = Sha256::new();
        hasher.update(image.width().to_le_bytes());
        hasher.update(image.height().to_le_bytes());
        hasher.update(image.as_bytes());
        hasher.update(options.target_width.to_le_bytes());
        hasher.update(options.stretch.to_bits().to_le_bytes());
        hasher.update(options.ramp.as_string().as_bytes());
        // Separator so the ramp can't run into the flags
        hasher.update([0u8]);
        hasher.update([options.colorize as u8]);
        hasher.update(options.luminance.name().as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..16])
    }
}

/// Ticket for one recomputation, issued by [`LatestGrid::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// The "currently displayed" grid, updated last-write-wins.
///
/// Every recomputation takes a ticket before starting. A result is only
/// published if no newer ticket was issued in the meantime; stale results
/// are discarded.
#[derive(Debug, Default)]
pub struct LatestGrid {
    generation: AtomicU64,
    slot: Mutex<Option<Arc<GlyphGrid>>>,
}

impl LatestGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a recomputation. Invalidates all earlier tickets.
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the newest one.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Store `grid` if `ticket` is still current. Returns whether it was stored.
    pub fn publish(&self, ticket: Ticket, grid: Arc<GlyphGrid>) -> bool {
        let Ok(mut slot) = self.slot.lock() else {
            return false;
        };
        // Checked under the lock so a newer publish can't be overwritten
        if !self.is_current(ticket) {
            log::debug!("Discarding stale grid (ticket {})", ticket.0);
            return false;
        }
        *slot = Some(grid);
        true
    }

    /// The most recently published grid.
    pub fn current(&self) -> Option<Arc<GlyphGrid>> {
        self.slot.lock().ok()?.clone()
    }
}
