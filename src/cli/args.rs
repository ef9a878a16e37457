//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ascii_snap::ascii::{AsciiError, AsciiOptions, CharSet, LuminanceFormula};
use ascii_snap::config::{AsciiConfig, ExportConfig};
use ascii_snap::export::ExportOptions;

use super::enums::{CharacterSet, Luminance, OutputFormat};

/// Parse and validate the horizontal stretch (0.1-10.0)
fn parse_stretch(s: &str) -> Result<f64, String> {
    let stretch: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(0.1..=10.0).contains(&stretch) {
        return Err(format!("Stretch must be between 0.1 and 10.0, got {}", stretch));
    }
    Ok(stretch)
}

/// Parse and validate the device scale factor (0.5-4.0)
fn parse_scale(s: &str) -> Result<f64, String> {
    let scale: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(0.5..=4.0).contains(&scale) {
        return Err(format!("Scale must be between 0.5 and 4.0, got {}", scale));
    }
    Ok(scale)
}

/// Convert images to colour ASCII art and capture it as PNG
#[derive(Parser, Debug)]
#[command(name = "ascii-snap")]
#[command(version, about = "Colour ASCII art from images, as text, HTML or PNG", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: log::LevelFilter,
}

/// Conversion settings shared by `render` and `screenshot`.
/// Unset flags fall back to the config file, then to built-in defaults.
#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Input image (PNG, JPEG, GIF, BMP, WebP)
    pub input: PathBuf,

    /// Output width in characters
    #[arg(long, short, value_parser = clap::value_parser!(u32).range(1..=4096))]
    pub width: Option<u32>,

    /// Horizontal stretch before downsampling (1.0 disables)
    #[arg(long, value_parser = parse_stretch)]
    pub stretch: Option<f64>,

    /// Preset character ramp
    #[arg(long)]
    pub preset: Option<CharacterSet>,

    /// Literal character ramp, darkest first
    #[arg(long, conflicts_with = "preset")]
    pub charset: Option<String>,

    /// Drop pixel colours
    #[arg(long)]
    pub no_color: bool,

    /// Luminance weighting
    #[arg(long)]
    pub luminance: Option<Luminance>,

    /// Font size of the exported document in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(4..=128))]
    pub font_px: Option<u32>,
}

impl ConvertArgs {
    /// Conversion options with flags layered over the `[ascii]` config section.
    /// `--preset` also overrides a literal `charset` from the file.
    pub fn ascii_options(&self, config: &AsciiConfig) -> Result<AsciiOptions, AsciiError> {
        let charset = match (&self.charset, self.preset) {
            (Some(chars), _) => Some(chars.clone()),
            (None, Some(_)) => None,
            (None, None) => config.charset.clone(),
        };
        let merged = AsciiConfig {
            width: self.width.or(config.width),
            stretch: self.stretch.or(config.stretch),
            preset: self
                .preset
                .map(|p| CharSet::from(p).name().to_string())
                .or_else(|| config.preset.clone()),
            charset,
            colorize: if self.no_color { Some(false) } else { config.colorize },
            luminance: self
                .luminance
                .map(|l| LuminanceFormula::from(l).name().to_string())
                .or_else(|| config.luminance.clone()),
        };
        merged.to_options()
    }

    /// Export options with `--font-px` layered over the `[export]` config section.
    pub fn export_options(&self, config: &ExportConfig) -> Result<ExportOptions, AsciiError> {
        let mut options = config.to_options()?;
        if let Some(font_px) = self.font_px {
            options.font_px = font_px;
        }
        Ok(options)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert an image and print or save the result
    Render {
        #[command(flatten)]
        convert: ConvertArgs,

        /// Output format (default: html with --output, ansi otherwise)
        #[arg(long, short)]
        format: Option<OutputFormat>,

        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Convert an image and capture the exported document as PNG
    Screenshot {
        #[command(flatten)]
        convert: ConvertArgs,

        /// PNG path (default: <input stem>.png)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Screenshot service endpoint
        #[arg(long, conflicts_with = "local")]
        service: Option<String>,

        /// Render with an in-process Chrome instead of the service
        #[arg(long)]
        local: bool,
    },
    /// Run the HTML-to-PNG screenshot service
    Serve {
        /// Address to listen on
        #[arg(long, short)]
        bind: Option<String>,

        /// Chrome executable
        #[arg(long)]
        chrome: Option<PathBuf>,

        /// Per-dimension capture limit in CSS pixels
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=15000))]
        max_dimension: Option<u32>,

        /// Device scale factor of the capture
        #[arg(long, value_parser = parse_scale)]
        scale: Option<f64>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
