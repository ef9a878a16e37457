//! Serialization of glyph grids to markup and terminal text.

use std::borrow::Cow;
use std::fmt::Write;

use super::{GlyphGrid, Rgb};

/// Row separator emitted after every row of the HTML fragment.
pub const HTML_ROW_SEPARATOR: &str = "<br>";

/// Escape the characters that are structural in HTML text content.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        escape_char(c, &mut out);
    }
    Cow::Owned(out)
}

fn escape_char(c: char, out: &mut String) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        _ => out.push(c),
    }
}

/// Render a grid as an HTML fragment.
///
/// Each cell becomes a bold `<span>`, carrying `color:#rrggbb` when the cell
/// has its own colour. Every row ends with an explicit `<br>`; the fragment
/// never relies on wrapping.
pub fn grid_to_html(grid: &GlyphGrid) -> String {
    // ~50 bytes per coloured span
    let mut out = String::with_capacity(grid.cells().len() * 50 + grid.height() as usize * 4);
    for row in grid.rows() {
        for cell in row {
            match cell.color {
                Some(rgb) => {
                    let _ = write!(out, "<span style=\"color:{}; font-weight:bold;\">", rgb.to_hex());
                }
                None => out.push_str("<span style=\"font-weight:bold;\">"),
            }
            escape_char(cell.ch, &mut out);
            out.push_str("</span>");
        }
        out.push_str(HTML_ROW_SEPARATOR);
    }
    out
}

/// Render a grid as 24-bit ANSI colour text for terminal preview.
///
/// Uncoloured cells use `foreground`. Colour escapes are only emitted when
/// the colour changes, and every line ends with a reset and `\n`.
pub fn grid_to_ansi(grid: &GlyphGrid, foreground: Rgb) -> String {
    let mut out = String::with_capacity(grid.cells().len() * 4);
    for row in grid.rows() {
        let mut current: Option<Rgb> = None;
        for cell in row {
            let rgb = cell.color_or(foreground);
            if current != Some(rgb) {
                let _ = write!(out, "\x1b[38;2;{};{};{}m", rgb.r, rgb.g, rgb.b);
                current = Some(rgb);
            }
            out.push(cell.ch);
        }
        out.push_str("\x1b[0m\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::{build, LuminanceFormula, Ramp, SampledGrid};

    fn grid(width: u32, height: u32, pixels: Vec<Rgb>, ramp: &str, colorize: bool) -> GlyphGrid {
        let sampled = SampledGrid {
            width,
            height,
            pixels,
        };
        build(
            &sampled,
            &Ramp::new(ramp).unwrap(),
            colorize,
            LuminanceFormula::Ntsc,
        )
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<&>"), "&lt;&amp;&gt;");
        assert_eq!(escape_html("plain"), "plain");
        assert!(matches!(escape_html("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_html_colorized_span() {
        let g = grid(1, 1, vec![Rgb::new(255, 0, 16)], "#", true);
        assert_eq!(
            g.to_html(),
            "<span style=\"color:#ff0010; font-weight:bold;\">#</span><br>"
        );
    }

    #[test]
    fn test_html_monochrome_span() {
        let g = grid(1, 1, vec![Rgb::WHITE], "#", false);
        assert_eq!(g.to_html(), "<span style=\"font-weight:bold;\">#</span><br>");
    }

    #[test]
    fn test_html_escapes_glyphs() {
        // dark -> '<', light -> '&'
        let g = grid(2, 1, vec![Rgb::BLACK, Rgb::WHITE], "<&", false);
        let html = g.to_html();
        assert!(html.contains(">&lt;</span>"));
        assert!(html.contains(">&amp;</span>"));
        assert!(!html.contains("><</span>"));
    }

    #[test]
    fn test_html_row_separators() {
        let g = grid(3, 4, vec![Rgb::BLACK; 12], " .#", true);
        let html = g.to_html();
        assert_eq!(html.matches(HTML_ROW_SEPARATOR).count(), 4);
        for row in html.split(HTML_ROW_SEPARATOR).filter(|r| !r.is_empty()) {
            assert_eq!(row.matches("<span").count(), 3);
        }
    }

    #[test]
    fn test_ansi_uses_foreground_for_mono() {
        let g = grid(2, 1, vec![Rgb::BLACK, Rgb::BLACK], "ab", false);
        let ansi = g.to_ansi(Rgb::new(1, 2, 3));
        assert_eq!(ansi, "\x1b[38;2;1;2;3maa\x1b[0m\n");
    }

    #[test]
    fn test_ansi_switches_color_per_run() {
        let g = grid(
            3,
            1,
            vec![Rgb::new(10, 0, 0), Rgb::new(10, 0, 0), Rgb::new(0, 0, 10)],
            "x",
            true,
        );
        let ansi = g.to_ansi(Rgb::WHITE);
        assert_eq!(
            ansi,
            "\x1b[38;2;10;0;0mxx\x1b[38;2;0;0;10mx\x1b[0m\n"
        );
    }
}
