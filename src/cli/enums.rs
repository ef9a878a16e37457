//! CLI enum types for ramp preset, luminance formula, and output format.

use clap::ValueEnum;

use ascii_snap::ascii;

/// Preset character ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CharacterSet {
    #[default]
    Standard,
    Blocks,
    Dense,
}

impl From<CharacterSet> for ascii::CharSet {
    fn from(c: CharacterSet) -> Self {
        match c {
            CharacterSet::Standard => ascii::CharSet::Standard,
            CharacterSet::Blocks => ascii::CharSet::Blocks,
            CharacterSet::Dense => ascii::CharSet::Dense,
        }
    }
}

/// Luminance weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Luminance {
    #[default]
    Ntsc,
    Rec709,
}

impl From<Luminance> for ascii::LuminanceFormula {
    fn from(l: Luminance) -> Self {
        match l {
            Luminance::Ntsc => ascii::LuminanceFormula::Ntsc,
            Luminance::Rec709 => ascii::LuminanceFormula::Rec709,
        }
    }
}

/// What `render` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain glyphs, one line per row
    Text,
    /// Glyphs with 24-bit ANSI colour escapes
    Ansi,
    /// Standalone HTML document
    Html,
    /// Bare span fragment without the document wrapper
    Fragment,
}

impl OutputFormat {
    /// Format used when none is given: a document when writing a file,
    /// terminal output otherwise.
    pub fn resolve(explicit: Option<OutputFormat>, to_file: bool, colorize: bool) -> OutputFormat {
        match explicit {
            Some(format) => format,
            None if to_file => OutputFormat::Html,
            None if colorize => OutputFormat::Ansi,
            None => OutputFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charset_to_ascii_charset() {
        assert_eq!(
            ascii::CharSet::from(CharacterSet::Standard),
            ascii::CharSet::Standard
        );
        assert_eq!(
            ascii::CharSet::from(CharacterSet::Blocks),
            ascii::CharSet::Blocks
        );
        assert_eq!(
            ascii::CharSet::from(CharacterSet::Dense),
            ascii::CharSet::Dense
        );
    }

    #[test]
    fn test_luminance_to_formula() {
        assert_eq!(
            ascii::LuminanceFormula::from(Luminance::Ntsc),
            ascii::LuminanceFormula::Ntsc
        );
        assert_eq!(
            ascii::LuminanceFormula::from(Luminance::Rec709),
            ascii::LuminanceFormula::Rec709
        );
    }

    #[test]
    fn test_output_format_resolution() {
        assert_eq!(OutputFormat::resolve(None, true, true), OutputFormat::Html);
        assert_eq!(OutputFormat::resolve(None, false, true), OutputFormat::Ansi);
        assert_eq!(OutputFormat::resolve(None, false, false), OutputFormat::Text);
        assert_eq!(
            OutputFormat::resolve(Some(OutputFormat::Fragment), true, true),
            OutputFormat::Fragment
        );
    }
}
