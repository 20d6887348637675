//! genatlas - multi-font distance-field atlas builder
//!
//! Packs the glyphs of several fonts into one shared texture and writes a
//! manifest mapping `name_weight` to each font's layout data.

pub mod atlas;
pub mod config;
pub mod constants;
pub mod error;
pub mod font;
pub mod hook;
pub mod texture;
pub mod utils;

pub use atlas::{AtlasManifest, AtlasPipeline, BuildReport, BuildState};
pub use config::{AtlasConfig, BuildConfig, FieldType, FontEntry};
pub use error::{AtlasError, ConfigError};
pub use hook::{BuildHook, HOOK_NAME};
