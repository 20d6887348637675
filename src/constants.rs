//! Global constants for genatlas
//!
//! Consolidates build defaults, validation tables and file naming
//! to eliminate magic numbers throughout the codebase.

// ============================================================================
// Build Defaults
// ============================================================================

/// Output file base name when `fileName` is not given
pub const DEFAULT_FILE_NAME: &str = "atlas";

/// Output directory when `outputDir` is not given
pub const DEFAULT_OUTPUT_DIR: &str = "./";

/// Rasterization size in pixels
pub const DEFAULT_FONT_SIZE: f32 = 42.0;

/// Distance range in pixels (full width of the encoded field)
pub const DEFAULT_DISTANCE_RANGE: u32 = 4;

/// Spacing between glyph cells in pixels
pub const DEFAULT_TEXTURE_PADDING: u32 = 1;

/// Space between glyph cells and texture edge in pixels
pub const DEFAULT_BORDER: u32 = 0;

/// Texture side reserved per configured font when `textureSize` is not given
pub const TEXTURE_SIDE_PER_FONT: u32 = 450;

/// Alpha below this (0.0-1.0) counts as empty when cropping the final atlas
pub const DEFAULT_CROP_TOLERANCE: f32 = 0.0002;

// ============================================================================
// Validation Tables
// ============================================================================

/// Accepted font file extensions (compared case-insensitively)
pub const VALID_FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "woff", "woff2"];

/// Largest texture area in pixels (16384 x 16384)
pub const MAX_TEXTURE_PIXELS: u64 = 16384 * 16384;

/// Largest rasterization size in pixels
pub const MAX_FONT_SIZE: f32 = 1024.0;

/// Largest distance range in pixels
pub const MAX_DISTANCE_RANGE: u32 = 256;

// ============================================================================
// File Naming
// ============================================================================

/// Extension of the continuation settings snapshot
pub const SETTINGS_EXTENSION: &str = "cfg";

/// Extension of texture images
pub const TEXTURE_EXTENSION: &str = "png";

/// Suffix of artifacts written before they replace the previous font's
pub const STAGING_SUFFIX: &str = "tmp";

/// Extension of the manifest
pub const MANIFEST_EXTENSION: &str = "json";

/// Config file searched in the working directory
pub const LOCAL_CONFIG_FILE: &str = "genatlas.toml";

/// Environment variable overriding the config path
pub const CONFIG_ENV_VAR: &str = "GENATLAS_CONFIG";

// ============================================================================
// BMFont Layout Constants
// ============================================================================

/// All four channels carry glyph data
pub const CHANNEL_ALL: u32 = 15;

/// Horizontal stretch in percent
pub const STRETCH_H: u32 = 100;
