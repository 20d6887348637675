//! Font descriptors, charsets and layout data
//!
//! Handles:
//! - Font entries (name, weight, source file)
//! - Charset resolution (override or glyph table)
//! - BMFont-style per-font layout data

pub mod charset;
pub mod descriptor;
pub mod layout;

pub use charset::{charset_from_str, Charset, CharsetResolver, FontParser, FontdueParser};
pub use descriptor::{FontDescriptor, FontWeight};
pub use layout::{CommonInfo, DistanceFieldInfo, FontInfo, FontLayoutData, GlyphEntry, KerningPair};
