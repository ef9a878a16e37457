//! Character ramps for ASCII rendering.

use super::AsciiError;

/// Standard ASCII density ramp (11 levels).
/// Characters ordered from darkest (space) to brightest (&).
pub const STANDARD_CHARSET: &str = " .:-=+*#%@&";

/// Block character ramp (5 levels).
/// Uses Unicode block characters for higher perceived resolution.
pub const BLOCKS_CHARSET: &str = " ░▒▓█";

/// Dense ASCII ramp (70 levels) for large output widths.
pub const DENSE_CHARSET: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Named ramp presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    /// Standard ASCII density ramp
    #[default]
    Standard,
    /// Unicode block ramp
    Blocks,
    /// Long ramp with fine brightness steps
    Dense,
}

impl CharSet {
    /// Get the characters of this preset, darkest first.
    pub fn chars(&self) -> &'static str {
        match self {
            CharSet::Standard => STANDARD_CHARSET,
            CharSet::Blocks => BLOCKS_CHARSET,
            CharSet::Dense => DENSE_CHARSET,
        }
    }

    /// Get a human-readable name for the preset.
    pub fn name(&self) -> &'static str {
        match self {
            CharSet::Standard => "standard",
            CharSet::Blocks => "blocks",
            CharSet::Dense => "dense",
        }
    }

    /// Look a preset up by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "standard" => Some(CharSet::Standard),
            "blocks" => Some(CharSet::Blocks),
            "dense" => Some(CharSet::Dense),
            _ => None,
        }
    }

    pub fn ramp(&self) -> Ramp {
        Ramp {
            chars: self.chars().chars().collect(),
        }
    }
}

/// An ordered character ramp, darkest glyph first.
///
/// Always holds at least one character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ramp {
    chars: Vec<char>,
}

impl Ramp {
    /// Build a ramp from a user-supplied string.
    ///
    /// An empty string yields a single-space ramp. Control characters are
    /// rejected since they would break the one-line-per-row layout.
    pub fn new(charset: &str) -> Result<Self, AsciiError> {
        if charset.is_empty() {
            return Ok(Self { chars: vec![' '] });
        }
        Self::try_new(charset)
    }

    /// Strict variant of [`Ramp::new`]: an empty string is an error.
    pub fn try_new(charset: &str) -> Result<Self, AsciiError> {
        if charset.is_empty() {
            return Err(AsciiError::InvalidConfig("charset is empty".to_string()));
        }
        if let Some(c) = charset.chars().find(|c| c.is_control()) {
            return Err(AsciiError::InvalidConfig(format!(
                "charset contains control character {:?}",
                c
            )));
        }
        Ok(Self {
            chars: charset.chars().collect(),
        })
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Number of brightness levels.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the ramp holds no glyphs.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn darkest(&self) -> char {
        self.chars[0]
    }

    pub fn lightest(&self) -> char {
        self.chars[self.chars.len() - 1]
    }

    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }
}

impl Default for Ramp {
    fn default() -> Self {
        CharSet::Standard.ramp()
    }
}
