//! Atlas build pipeline
//!
//! Handles:
//! - Shelf packing with a resumable cursor
//! - Distance-field generation behind `FieldGenerator`
//! - Coverage and outline distance fields per glyph cell
//! - Incremental packing of all fonts into one texture
//! - Crop and layout rewrite, manifest merge, run-once gate

pub mod field;
pub mod finalize;
pub mod gate;
pub mod generator;
pub mod manifest;
pub mod packer;
pub mod pipeline;
pub mod sdf;
pub mod shelf;

pub use field::{glyph_cell, needs_outline, CellGeometry};
pub use finalize::{apply_crop, crop_rect, finalize, FinalTexture};
pub use gate::{BuildGate, BuildState};
pub use generator::{
    generate_page, FieldGenerator, GenerateRequest, GeneratedFont, PackedPage, PackingSettings,
    PackingState, Texture,
};
pub use manifest::AtlasManifest;
pub use packer::{remove_artifacts, IncrementalPacker, PackArtifacts, PackResult, PackedFont, SkippedFont};
pub use pipeline::{AtlasPipeline, BuildReport};
pub use sdf::SdfGenerator;
pub use shelf::{Placement, ShelfCursor, ShelfPacker};
