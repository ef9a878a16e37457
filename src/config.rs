//! Configuration file handling for ascii-snap.
//!
//! Loads configuration from `<config dir>/ascii-snap/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::ascii::{AsciiError, AsciiOptions, CharSet, LuminanceFormula, Ramp, Rgb};
use crate::export::ExportOptions;

/// Default bind address for `ascii-snap serve`.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Configuration file structure for ascii-snap.
/// Every section and key is optional; missing values fall back to the built-in defaults.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub ascii: AsciiConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub screenshot: ScreenshotConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct AsciiConfig {
    /// Output width in characters
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub stretch: Option<f64>,
    /// Preset name: standard, blocks, dense
    #[serde(default)]
    pub preset: Option<String>,
    /// Literal ramp, darkest first; overrides `preset`
    #[serde(default)]
    pub charset: Option<String>,
    #[serde(default)]
    pub colorize: Option<bool>,
    /// ntsc or rec709
    #[serde(default)]
    pub luminance: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ExportConfig {
    #[serde(default)]
    pub font_px: Option<u32>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub foreground: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ScreenshotConfig {
    /// Address `serve` listens on
    #[serde(default)]
    pub bind: Option<String>,
    /// Endpoint used by the `screenshot` command
    #[serde(default)]
    pub service_url: Option<String>,
    /// Chrome executable
    #[serde(default)]
    pub chrome: Option<PathBuf>,
    #[serde(default)]
    pub max_dimension: Option<u32>,
    #[serde(default)]
    pub device_scale_factor: Option<f64>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config = Self::parse(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from a path the user named explicitly.
    /// Unlike [`Config::load`], a missing file is an error.
    pub fn load_explicit(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::IoError {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            });
        }
        Self::load(Some(path))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

impl AsciiConfig {
    /// Resolve into conversion options, filling gaps with defaults.
    pub fn to_options(&self) -> Result<AsciiOptions, AsciiError> {
        let defaults = AsciiOptions::default();

        let ramp = match (&self.charset, &self.preset) {
            (Some(chars), _) => Ramp::new(chars)?,
            (None, Some(name)) => CharSet::from_name(name)
                .ok_or_else(|| AsciiError::InvalidConfig(format!("unknown preset '{}'", name)))?
                .ramp(),
            (None, None) => defaults.ramp,
        };

        let luminance = match &self.luminance {
            Some(name) => LuminanceFormula::from_name(name).ok_or_else(|| {
                AsciiError::InvalidConfig(format!("unknown luminance formula '{}'", name))
            })?,
            None => defaults.luminance,
        };

        let options = AsciiOptions {
            target_width: self.width.unwrap_or(defaults.target_width),
            stretch: self.stretch.unwrap_or(defaults.stretch),
            ramp,
            colorize: self.colorize.unwrap_or(defaults.colorize),
            luminance,
        };
        options.validate()?;
        Ok(options)
    }
}

impl ExportConfig {
    /// Resolve into export options, filling gaps with defaults.
    pub fn to_options(&self) -> Result<ExportOptions, AsciiError> {
        let defaults = ExportOptions::default();
        Ok(ExportOptions {
            font_px: self.font_px.unwrap_or(defaults.font_px),
            background: parse_color(self.background.as_deref(), defaults.background)?,
            foreground: parse_color(self.foreground.as_deref(), defaults.foreground)?,
            title: self.title.clone().unwrap_or(defaults.title),
        })
    }
}

fn parse_color(value: Option<&str>, default: Rgb) -> Result<Rgb, AsciiError> {
    match value {
        Some(hex) => Rgb::from_hex(hex)
            .ok_or_else(|| AsciiError::InvalidConfig(format!("invalid colour '{}'", hex))),
        None => Ok(default),
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("ascii-snap").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/ascii-snap/config.toml")
        })
}

/// Contents written by `ascii-snap config init`.
pub const DEFAULT_CONFIG: &str = r##"# ascii-snap configuration

[ascii]
# Output width in characters (1-4096)
width = 200
# Horizontal stretch before downsampling (1.0 disables)
stretch = 1.05
# Preset ramp: standard, blocks, dense
preset = "standard"
# Literal ramp, darkest first (overrides preset)
# charset = " .:-=+*#%@&"
# Keep each pixel's colour
colorize = true
# Brightness weighting: ntsc, rec709
luminance = "ntsc"

[export]
font_px = 14
background = "#000000"
foreground = "#ffffff"
title = "ASCII Html Output"

[screenshot]
# Address for `ascii-snap serve`
bind = "127.0.0.1:3000"
# Endpoint for `ascii-snap screenshot`
service_url = "http://127.0.0.1:3000/api/html-to-image"
# Chrome executable (default: auto-detect)
# chrome = "/usr/bin/chromium"
max_dimension = 15000
device_scale_factor = 2.0
timeout_secs = 30
"##;
