//! ascii-snap library crate.
//!
//! Image to colour ASCII-art conversion ([`ascii`]), standalone HTML export
//! ([`export`]) and PNG capture of the exported document ([`screenshot`],
//! [`client`]).

pub mod ascii;
pub mod client;
pub mod config;
pub mod export;
pub mod screenshot;
pub mod source;

pub use ascii::{convert, AsciiError, AsciiOptions, GlyphGrid};
pub use source::{Image, PixelSource};
