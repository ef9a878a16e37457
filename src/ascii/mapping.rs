//! Brightness to character mapping.

use super::{LuminanceFormula, Ramp, Rgb};

/// Ramp index for a luminance value.
///
/// `index = floor(luminance * levels / 256)`, clamped to `levels - 1`.
/// Dividing by 256 keeps the top bucket exclusive: 255 always lands on
/// the last glyph and never past it.
#[inline]
pub fn char_index(luminance: u8, levels: usize) -> usize {
    if levels == 0 {
        return 0;
    }
    ((luminance as usize * levels) / 256).min(levels - 1)
}

/// Map one pixel to a glyph from the ramp.
#[inline]
pub fn map_pixel_to_char(rgb: Rgb, ramp: &Ramp, formula: LuminanceFormula) -> char {
    ramp.chars()[char_index(formula.of(rgb), ramp.len())]
}

/// Map brightness values to characters.
///
/// Lower brightness maps to earlier (darker) characters.
///
/// # Example
/// ```ignore
/// let ramp = Ramp::new(" .:-=+*#%@&")?;
/// let chars = map_to_chars(&[0, 128, 255], &ramp);
/// // chars == [' ', '+', '&']
/// ```
pub fn map_to_chars(brightness: &[u8], ramp: &Ramp) -> Vec<char> {
    let levels = ramp.len();
    brightness
        .iter()
        .map(|&b| ramp.chars()[char_index(b, levels)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_bounds_for_all_levels() {
        for levels in 1..=80 {
            assert_eq!(char_index(0, levels), 0);
            assert_eq!(char_index(255, levels), levels - 1);
            for l in 0..=255u8 {
                assert!(char_index(l, levels) < levels);
            }
        }
    }

    #[test]
    fn test_index_is_monotonic() {
        let levels = 11;
        let mut prev = 0;
        for l in 0..=255u8 {
            let idx = char_index(l, levels);
            assert!(idx >= prev);
            prev = idx;
        }
    }

    #[test]
    fn test_index_buckets_divide_by_256() {
        // 10 levels: bucket boundaries at multiples of 25.6
        assert_eq!(char_index(25, 10), 0);
        assert_eq!(char_index(26, 10), 1);
        assert_eq!(char_index(230, 10), 8);
        assert_eq!(char_index(231, 10), 9);
    }

    #[test]
    fn test_map_to_chars_standard() {
        let ramp = Ramp::default();
        let chars = map_to_chars(&[0, 128, 255], &ramp);
        assert_eq!(chars, vec![' ', '+', '&']);
    }

    #[test]
    fn test_map_pixel_to_char_extremes() {
        let ramp = Ramp::default();
        let f = LuminanceFormula::Ntsc;
        assert_eq!(map_pixel_to_char(Rgb::new(0, 0, 0), &ramp, f), ' ');
        assert_eq!(map_pixel_to_char(Rgb::new(255, 255, 255), &ramp, f), '&');
    }

    #[test]
    fn test_single_level_ramp() {
        let ramp = Ramp::new("#").unwrap();
        assert_eq!(map_to_chars(&[0, 100, 255], &ramp), vec!['#', '#', '#']);
    }
}
