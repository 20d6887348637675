//! Error types
//!
//! Configuration errors are fatal at construction, per-font errors are
//! collected into the build report, and `AtlasError` stops the whole build.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid or unreadable build configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("\"fonts\" is required and must list at least one font")]
    MissingFonts,

    #[error("key \"{key}\" is missing in font entry {index}")]
    MissingFontKey { index: usize, key: &'static str },

    #[error("\"fieldType\" only accepts sdf, msdf, mtsdf, psdf (got \"{0}\")")]
    InvalidFieldType(String),

    #[error("invalid font weight \"{value}\" in font entry {index}; valid values are {valid}")]
    InvalidFontWeight {
        index: usize,
        value: String,
        valid: String,
    },

    #[error("unsupported font format: {path} (expected .ttf, .otf, .woff, .woff2)")]
    UnsupportedFontFormat { path: PathBuf },

    #[error("invalid texture size {width}x{height}")]
    InvalidTextureSize { width: u32, height: u32 },

    #[error("texture size {width}x{height} exceeds the limit of {max_pixels} pixels")]
    TextureTooLarge {
        width: u32,
        height: u32,
        max_pixels: u64,
    },

    #[error("\"{key}\" must be greater than zero")]
    NonPositive { key: &'static str },

    #[error("\"{key}\" must be a finite number between {min} and {max} (got {value})")]
    OutOfRange {
        key: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("\"charset\" must contain at least one character")]
    EmptyCharset,

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// Font file could not be loaded
#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse font {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// Distance-field generation failure
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Font(#[from] FontError),

    #[error("charset is empty")]
    EmptyCharset,

    #[error("distance field failed: {reason}")]
    Field { reason: String },

    #[error("generator produced no texture")]
    NoTexture,

    #[error("packing needed {textures} textures of {width}x{height}")]
    Overflow {
        textures: usize,
        width: u32,
        height: u32,
    },

    #[error("failed to read packing state {path}: {source}")]
    StateRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse packing state {path}: {source}")]
    StateParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("packing state {path} is incompatible: {reason}")]
    IncompatibleState { path: PathBuf, reason: String },

    #[error(transparent)]
    Texture(#[from] TextureError),
}

/// Image decode / encode / write failure
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to read texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode PNG: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure that drops one font from the atlas
#[derive(Debug, Error)]
pub enum FontProcessingError {
    #[error(transparent)]
    Font(#[from] FontError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("failed to write packing state {path}: {source}")]
    StateWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure that stops the whole build
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("texture size {width}x{height} is not enough for a single atlas ({textures} textures needed while packing \"{font}\"); increase \"textureSize\"")]
    PackingOverflow {
        font: String,
        textures: usize,
        width: u32,
        height: u32,
    },

    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
