//! Standalone HTML document export.
//!
//! Wraps the glyph fragment in a fixed-width `<pre>` with a monospace font
//! stack and a 60% line-height, which closes the gaps monospace fonts
//! otherwise leave between rows.

use std::path::Path;

use crate::ascii::{escape_html, GlyphGrid, Rgb};

/// Default font size of the exported document, in CSS pixels.
pub const DEFAULT_FONT_PX: u32 = 14;

/// Default document title.
pub const DEFAULT_TITLE: &str = "ASCII Html Output";

/// Monospace font stack used by the `<pre>` block.
pub const FONT_STACK: &str = "ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, \"Liberation Mono\", \"Courier New\", monospace";

/// File name used when the input has no usable stem.
pub const FALLBACK_STEM: &str = "ascii-art";

/// Styling of the exported document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub font_px: u32,
    pub background: Rgb,
    pub foreground: Rgb,
    pub title: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            font_px: DEFAULT_FONT_PX,
            background: Rgb::BLACK,
            foreground: Rgb::WHITE,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Build a complete HTML document around a grid.
pub fn standalone_html(grid: &GlyphGrid, options: &ExportOptions) -> String {
    wrap_fragment(&grid.to_html(), options)
}

/// Wrap an already-serialized glyph fragment in the export document.
pub fn wrap_fragment(fragment: &str, options: &ExportOptions) -> String {
    let bg = options.background.to_hex();
    let fg = options.foreground.to_hex();
    format!(
        "<!doctype html>\n\
<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
<body style='background-color:{bg}; margin:0; padding:16px; color:{fg};'>\n\
<pre style='display:inline-block; border-width:4px 6px; border-color:{bg}; border-style:solid; background-color:{bg}; font-size:{font}px; font-family: {fonts}; font-weight:bold; line-height:60%'>\n\
{fragment}\n\
</pre></body></html>",
        title = escape_html(&options.title),
        bg = bg,
        fg = fg,
        font = options.font_px,
        fonts = FONT_STACK,
        fragment = fragment,
    )
}

/// Output file name for an exported document: the input's stem plus `.html`.
pub fn export_file_name(input: Option<&Path>) -> String {
    let stem = input
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_STEM);
    format!("{}.html", stem)
}
