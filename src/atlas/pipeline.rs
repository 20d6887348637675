//! Build pipeline
//!
//! ```text
//! fonts ─→ charset ─→ generator (×N, resumed) ─→ raw texture + layouts
//!                                                    ↓
//!                      {file}.{type}.png  ←─  crop + rewrite layouts
//!                      {file}.{type}.json ←─  merged manifest
//! ```
//!
//! The pipeline runs at most once; a run that fails fatally leaves the
//! gate at NotStarted so the next run starts over.

use crate::atlas::finalize::finalize;
use crate::atlas::gate::{BuildGate, BuildState};
use crate::atlas::generator::FieldGenerator;
use crate::atlas::manifest::AtlasManifest;
use crate::atlas::packer::{remove_artifacts, IncrementalPacker, PackResult, SkippedFont};
use crate::atlas::sdf::SdfGenerator;
use crate::config::{AtlasConfig, BuildConfig, ResolvedBuild};
use crate::error::{AtlasError, ConfigError};
use crate::font::{FontDescriptor, FontLayoutData, FontParser, FontdueParser};
use crate::utils::write_durable;
use log::{error, info, warn};
use std::io;
use std::path::{Path, PathBuf};

/// Outcome of a completed build
#[derive(Debug, Default)]
pub struct BuildReport {
    pub manifest: AtlasManifest,
    /// Fonts dropped from the atlas, in packing order
    pub skipped: Vec<SkippedFont>,
    /// Final texture, None when nothing was packed; the uncropped texture
    /// when cropping failed
    pub texture_path: Option<PathBuf>,
    pub texture_size: Option<(u32, u32)>,
    /// None when the manifest write failed
    pub manifest_path: Option<PathBuf>,
}

pub struct AtlasPipeline {
    fonts: Vec<FontDescriptor>,
    config: AtlasConfig,
    generator: Box<dyn FieldGenerator>,
    parser: Box<dyn FontParser>,
    gate: BuildGate,
    report: Option<BuildReport>,
}

impl AtlasPipeline {
    /// Validate the configuration; no file is touched
    pub fn new(config: &BuildConfig) -> Result<Self, ConfigError> {
        let build = config.resolve()?;
        Ok(Self::with_services(
            build,
            Box::new(SdfGenerator),
            Box::new(FontdueParser),
        ))
    }

    /// Build with custom generator and font parser
    pub fn with_services(
        build: ResolvedBuild,
        generator: Box<dyn FieldGenerator>,
        parser: Box<dyn FontParser>,
    ) -> Self {
        Self {
            fonts: build.fonts,
            config: build.atlas,
            generator,
            parser,
            gate: BuildGate::new(),
            report: None,
        }
    }

    pub fn state(&self) -> BuildState {
        self.gate.state()
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    pub fn fonts(&self) -> &[FontDescriptor] {
        &self.fonts
    }

    /// Report of the completed build, if any
    pub fn report(&self) -> Option<&BuildReport> {
        self.report.as_ref()
    }

    /// Run the build once
    ///
    /// Later calls return the first report without doing any work.
    pub fn run(&mut self) -> Result<&BuildReport, AtlasError> {
        if self.gate.begin() {
            match self.build() {
                Ok(report) => {
                    self.report = Some(report);
                    self.gate.complete();
                }
                Err(e) => {
                    self.gate.abort();
                    return Err(e);
                }
            }
        } else {
            info!("Atlas already built, nothing to do");
        }
        Ok(self.report.get_or_insert_with(BuildReport::default))
    }

    fn build(&self) -> Result<BuildReport, AtlasError> {
        let output_dir = &self.config.output_dir;
        std::fs::create_dir_all(output_dir).map_err(|source| AtlasError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;

        info!(
            "Building {} atlas from {} font(s), texture {}x{}",
            self.config.field_type,
            self.fonts.len(),
            self.config.texture_size.0,
            self.config.texture_size.1
        );

        let packer = IncrementalPacker::new(
            self.generator.as_ref(),
            self.parser.as_ref(),
            &self.config,
        );
        let PackResult {
            mut packed,
            skipped,
            artifacts,
            written,
        } = packer.pack_all(&self.fonts)?;

        let mut report = BuildReport {
            skipped,
            ..BuildReport::default()
        };

        let mut kept_raw: Option<&Path> = None;
        match &artifacts {
            Some(artifacts) => {
                let output = self.config.texture_path();
                let layouts = packed.iter_mut().map(|p| &mut p.layout);
                match finalize(
                    &artifacts.texture_path,
                    &output,
                    layouts,
                    self.config.crop_tolerance,
                ) {
                    Ok(texture) => {
                        info!("Atlas texture: {}", output.display());
                        report.texture_size = Some((texture.width, texture.height));
                        report.texture_path = Some(output);
                    }
                    Err(e) => {
                        error!("Failed to finalize atlas texture: {}", e);
                        let raw = &artifacts.texture_path;
                        keep_raw_texture(raw, packed.iter_mut().map(|p| &mut p.layout));
                        warn!("Keeping uncropped texture {} for the manifest", raw.display());
                        report.texture_size = Some(self.config.texture_size);
                        report.texture_path = Some(raw.clone());
                        kept_raw = Some(raw);
                    }
                }
            }
            None => warn!("No font could be packed, atlas texture not written"),
        }

        report.manifest = AtlasManifest::merge(packed);
        let manifest_path = self.config.manifest_path();
        match write_manifest(&report.manifest, &manifest_path) {
            Ok(()) => {
                info!(
                    "Atlas manifest: {} ({} font(s))",
                    manifest_path.display(),
                    report.manifest.len()
                );
                report.manifest_path = Some(manifest_path);
            }
            Err(e) => error!("Failed to write {}: {}", manifest_path.display(), e),
        }

        let stale: Vec<PathBuf> = written
            .into_iter()
            .filter(|p| Some(p.as_path()) != kept_raw)
            .collect();
        remove_artifacts(&stale);

        if !report.skipped.is_empty() {
            warn!(
                "{} font(s) skipped: {}",
                report.skipped.len(),
                report
                    .skipped
                    .iter()
                    .map(|s| s.key.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        Ok(report)
    }
}

/// Point every layout at the uncropped texture, in raw coordinates
fn keep_raw_texture<'a>(raw: &Path, layouts: impl IntoIterator<Item = &'a mut FontLayoutData>) {
    let page = raw.file_name().map(|n| n.to_string_lossy().into_owned());
    for layout in layouts {
        if let Some(page) = &page {
            layout.pages = vec![page.clone()];
        }
    }
}

fn write_manifest(manifest: &AtlasManifest, path: &Path) -> io::Result<()> {
    let data = manifest.to_json()?;
    write_durable(path, &data)
}
