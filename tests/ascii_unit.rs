//! Unit tests for the conversion pipeline.
//!
//! These tests cover:
//! - Sampled grid dimensions
//! - Luminance to glyph index bounds
//! - Solid-colour, monochrome and empty-ramp scenarios
//! - Row and idempotence invariants of the serialized output

use ascii_snap::ascii::*;
use ascii_snap::source::Image;

fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Image {
    let data = [rgb[0], rgb[1], rgb[2], 255].repeat((width * height) as usize);
    Image::from_rgba(width, height, data).unwrap()
}

/// Deterministic noise so tests see varied pixels without a RNG.
fn noise(width: u32, height: u32) -> Image {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let v = x.wrapping_mul(73).wrapping_add(y.wrapping_mul(151)) ^ (x * y);
            data.extend_from_slice(&[v as u8, (v >> 3) as u8, (v >> 5) as u8, 255]);
        }
    }
    Image::from_rgba(width, height, data).unwrap()
}

fn options(target_width: u32) -> AsciiOptions {
    AsciiOptions {
        target_width,
        ..AsciiOptions::default()
    }
}

// ==================== Dimension Tests ====================

#[test]
fn test_sampled_height_with_stretch() {
    // round(500 * 200 / round(1000 * 1.05)) = round(95.23) = 95
    assert_eq!(sampled_dimensions(1000, 500, 200, 1.05).unwrap(), (200, 95));
    let grid = convert(&solid(1000, 500, [10, 10, 10]), &options(200)).unwrap();
    assert_eq!((grid.width(), grid.height()), (200, 95));
}

#[test]
fn test_width_always_matches_target() {
    for (w, h) in [(1, 1), (3, 1000), (1000, 3), (640, 480), (17, 31)] {
        for target in [1, 7, 40, 200, 320] {
            let (gw, gh) = sampled_dimensions(w, h, target, DEFAULT_STRETCH).unwrap();
            assert_eq!(gw, target);
            assert!(gh >= 1, "{}x{} at {} gave zero rows", w, h, target);
        }
    }
}

#[test]
fn test_stretch_disabled() {
    assert_eq!(sampled_dimensions(640, 480, 80, 1.0).unwrap(), (80, 60));
}

#[test]
fn test_invalid_target_width() {
    let result = convert(&solid(4, 4, [0, 0, 0]), &options(0));
    assert!(matches!(result, Err(AsciiError::InvalidConfig(_))));
}

#[test]
fn test_invalid_stretch() {
    for stretch in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let opts = AsciiOptions {
            stretch,
            ..options(10)
        };
        assert!(matches!(
            convert(&solid(4, 4, [0, 0, 0]), &opts),
            Err(AsciiError::InvalidConfig(_))
        ));
    }
}

// ==================== Index Mapping Tests ====================

#[test]
fn test_index_bounds_for_all_luminance_values() {
    for n in 1..=70 {
        for l in 0..=255u8 {
            let idx = char_index(l, n);
            assert!(idx < n, "L={} n={} gave {}", l, n, idx);
        }
        assert_eq!(char_index(0, n), 0);
        assert_eq!(char_index(255, n), n - 1);
    }
}

#[test]
fn test_primaries_ntsc_and_rec709() {
    assert_eq!(LuminanceFormula::Ntsc.luminance(255, 0, 0), 76);
    assert_eq!(LuminanceFormula::Ntsc.luminance(0, 255, 0), 150);
    assert_eq!(LuminanceFormula::Ntsc.luminance(0, 0, 255), 29);
    assert_eq!(LuminanceFormula::Rec709.luminance(255, 0, 0), 54);
    assert_eq!(LuminanceFormula::Rec709.luminance(0, 255, 0), 182);
    assert_eq!(LuminanceFormula::Rec709.luminance(0, 0, 255), 18);
}

// ==================== Scenario Tests ====================

#[test]
fn test_solid_black_maps_to_darkest() {
    let grid = convert(&solid(100, 100, [0, 0, 0]), &options(10)).unwrap();
    assert_eq!(grid.width(), 10);
    assert!(grid.cells().iter().all(|c| c.ch == ' '));
}

#[test]
fn test_solid_white_maps_to_lightest() {
    let grid = convert(&solid(100, 100, [255, 255, 255]), &options(10)).unwrap();
    assert!(grid.cells().iter().all(|c| c.ch == '&'));
}

#[test]
fn test_colorize_keeps_pixel_colour() {
    let grid = convert(&solid(20, 20, [12, 200, 99]), &options(5)).unwrap();
    assert!(grid
        .cells()
        .iter()
        .all(|c| c.color == Some(Rgb::new(12, 200, 99))));
}

#[test]
fn test_monochrome_uses_fixed_foreground() {
    let opts = AsciiOptions {
        colorize: false,
        ..options(16)
    };
    let grid = convert(&noise(64, 48), &opts).unwrap();
    assert!(!grid.is_colorized());
    for cell in grid.cells() {
        assert_eq!(cell.color, None);
        assert_eq!(cell.color_or(Rgb::WHITE), Rgb::WHITE);
    }
    assert!(!grid.to_html().contains("color:#"));
}

#[test]
fn test_empty_ramp_renders_spaces() {
    let opts = AsciiOptions {
        ramp: Ramp::new("").unwrap(),
        ..options(12)
    };
    let grid = convert(&noise(50, 50), &opts).unwrap();
    assert!(grid.cells().iter().all(|c| c.ch == ' '));
    assert!(grid.to_text().chars().all(|c| c == ' ' || c == '\n'));
}

#[test]
fn test_strict_ramp_rejects_empty() {
    assert!(matches!(Ramp::try_new(""), Err(AsciiError::InvalidConfig(_))));
}

// ==================== Invariant Tests ====================

#[test]
fn test_idempotent_conversion() {
    let img = noise(123, 77);
    let opts = options(40);
    let a = convert(&img, &opts).unwrap();
    let b = convert(&img, &opts).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.to_html(), b.to_html());
    assert_eq!(a.to_text(), b.to_text());
}

#[test]
fn test_row_separators_and_widths() {
    let grid = convert(&noise(300, 200), &options(37)).unwrap();

    let html = grid.to_html();
    assert_eq!(html.matches("<br>").count(), grid.height() as usize);
    for row in html.split("<br>").filter(|r| !r.is_empty()) {
        assert_eq!(row.matches("<span").count(), 37);
    }

    let text = grid.to_text();
    assert_eq!(text.lines().count(), grid.height() as usize);
    for line in text.lines() {
        assert_eq!(line.chars().count(), 37);
    }
}

#[test]
fn test_glyphs_come_from_ramp() {
    let ramp = CharSet::Dense.ramp();
    let opts = AsciiOptions {
        ramp: ramp.clone(),
        ..options(50)
    };
    let grid = convert(&noise(200, 100), &opts).unwrap();
    assert!(grid.cells().iter().all(|c| ramp.contains(c.ch)));
}

#[test]
fn test_html_escapes_structural_glyphs() {
    let opts = AsciiOptions {
        ramp: Ramp::new("<&>").unwrap(),
        ..options(3)
    };
    let html = convert(&noise(30, 30), &opts).unwrap().to_html();
    assert!(!html.contains("><</span>"));
    assert!(!html.contains(">></span>"));
    assert!(!html.contains(">&</span>"));
}
