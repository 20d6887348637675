//! Build configuration
//!
//! Loads TOML (or JSON) build configuration files and validates them into
//! the resolved `AtlasConfig` plus the list of fonts to pack.
//! Validation never touches the filesystem.

use crate::constants::*;
use crate::error::ConfigError;
use crate::font::{charset_from_str, Charset, FontDescriptor, FontWeight};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Distance-field encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Sdf,
    Msdf,
    Mtsdf,
    Psdf,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sdf => "sdf",
            Self::Msdf => "msdf",
            Self::Mtsdf => "mtsdf",
            Self::Psdf => "psdf",
        }
    }
}

impl Default for FieldType {
    fn default() -> Self {
        Self::Sdf
    }
}

impl FromStr for FieldType {
    type Err = ConfigError;

    /// Exact lowercase match
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sdf" => Ok(Self::Sdf),
            "msdf" => Ok(Self::Msdf),
            "mtsdf" => Ok(Self::Mtsdf),
            "psdf" => Ok(Self::Psdf),
            other => Err(ConfigError::InvalidFieldType(other.to_string())),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the `fonts` list, as written by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontEntry {
    pub font_name: Option<String>,
    pub font_weight: Option<String>,
    pub url: Option<PathBuf>,
}

impl FontEntry {
    pub fn new(name: &str, weight: &str, url: impl Into<PathBuf>) -> Self {
        Self {
            font_name: Some(name.to_string()),
            font_weight: Some(weight.to_string()),
            url: Some(url.into()),
        }
    }
}

/// Build configuration input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildConfig {
    /// Fonts to pack, in packing order (required)
    pub fonts: Option<Vec<FontEntry>>,
    /// "sdf" (default), "msdf", "mtsdf" or "psdf"
    pub field_type: Option<String>,
    /// Output directory (default: working directory)
    pub output_dir: Option<PathBuf>,
    /// Texture width/height (default: 450 x font count, square)
    pub texture_size: Option<[u32; 2]>,
    /// Output base name (default: "atlas")
    pub file_name: Option<String>,
    /// Shared charset override; every font gets exactly these characters
    pub charset: Option<String>,
    /// Rasterization size in pixels (default: 42)
    pub font_size: Option<f32>,
    /// Space between glyphs and texture edge (default: 0)
    pub border: Option<u32>,
    /// Distance range in pixels (default: 4)
    pub distance_range: Option<u32>,
    /// Spacing between glyphs (default: 1)
    pub texture_padding: Option<u32>,
    /// Decimal places kept in glyph metrics (default: full precision)
    pub round_decimal: Option<u32>,
    /// Right-to-left flag recorded in the layout info (default: false)
    pub rtl: Option<bool>,
    /// Alpha tolerance for the final crop (default: 0.0002)
    pub crop_tolerance: Option<f32>,
}

/// Resolved build parameters
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasConfig {
    pub field_type: FieldType,
    pub file_name: String,
    pub output_dir: PathBuf,
    /// (width, height)
    pub texture_size: (u32, u32),
    pub font_size: f32,
    pub border: u32,
    pub distance_range: u32,
    pub texture_padding: u32,
    pub round_decimal: Option<u32>,
    pub rtl: bool,
    pub charset: Option<Charset>,
    pub crop_tolerance: f32,
}

impl AtlasConfig {
    /// `{outputDir}/{fileName}.{fieldType}.png`
    pub fn texture_path(&self) -> PathBuf {
        self.output_dir.join(format!(
            "{}.{}.{}",
            self.file_name, self.field_type, TEXTURE_EXTENSION
        ))
    }

    /// `{outputDir}/{fileName}.{fieldType}.json`
    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(format!(
            "{}.{}.{}",
            self.file_name, self.field_type, MANIFEST_EXTENSION
        ))
    }

    /// Intermediate artifact next to the outputs
    pub fn artifact_path(&self, stem: &str, extension: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", stem, extension))
    }
}

/// Validated configuration: fonts in packing order plus build parameters
#[derive(Debug, Clone)]
pub struct ResolvedBuild {
    pub fonts: Vec<FontDescriptor>,
    pub atlas: AtlasConfig,
}

impl BuildConfig {
    /// Validate and fill defaults
    pub fn resolve(&self) -> Result<ResolvedBuild, ConfigError> {
        let entries = match &self.fonts {
            Some(fonts) if !fonts.is_empty() => fonts,
            _ => return Err(ConfigError::MissingFonts),
        };

        // Required keys first, so a missing url is reported before a bad weight
        for (index, entry) in entries.iter().enumerate() {
            if entry.font_name.is_none() {
                return Err(ConfigError::MissingFontKey { index, key: "fontName" });
            }
            if entry.font_weight.is_none() {
                return Err(ConfigError::MissingFontKey { index, key: "fontWeight" });
            }
            if entry.url.is_none() {
                return Err(ConfigError::MissingFontKey { index, key: "url" });
            }
        }

        let field_type = match self.field_type.as_deref() {
            Some(s) => s.parse::<FieldType>()?,
            None => FieldType::default(),
        };

        let mut fonts = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let (Some(name), Some(weight), Some(url)) =
                (&entry.font_name, &entry.font_weight, &entry.url)
            else {
                continue;
            };
            let weight = weight
                .parse::<FontWeight>()
                .map_err(|_| ConfigError::InvalidFontWeight {
                    index,
                    value: weight.clone(),
                    valid: FontWeight::valid_names(),
                })?;
            fonts.push(FontDescriptor {
                name: name.clone(),
                weight,
                source_path: url.clone(),
            });
        }

        for font in &fonts {
            if !has_valid_font_extension(&font.source_path) {
                return Err(ConfigError::UnsupportedFontFormat {
                    path: font.source_path.clone(),
                });
            }
        }

        let side = TEXTURE_SIDE_PER_FONT.saturating_mul(fonts.len() as u32);
        let [width, height] = self.texture_size.unwrap_or([side, side]);
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidTextureSize { width, height });
        }
        let too_large = (width as u64)
            .checked_mul(height as u64)
            .map_or(true, |pixels| pixels > MAX_TEXTURE_PIXELS);
        if too_large {
            return Err(ConfigError::TextureTooLarge {
                width,
                height,
                max_pixels: MAX_TEXTURE_PIXELS,
            });
        }

        let font_size = self.font_size.unwrap_or(DEFAULT_FONT_SIZE);
        if font_size.is_nan() || font_size <= 0.0 {
            return Err(ConfigError::NonPositive { key: "fontSize" });
        }
        if font_size > MAX_FONT_SIZE {
            return Err(ConfigError::OutOfRange {
                key: "fontSize",
                value: font_size as f64,
                min: 0.0,
                max: MAX_FONT_SIZE as f64,
            });
        }

        let distance_range = self.distance_range.unwrap_or(DEFAULT_DISTANCE_RANGE);
        if distance_range == 0 {
            return Err(ConfigError::NonPositive { key: "distanceRange" });
        }
        if distance_range > MAX_DISTANCE_RANGE {
            return Err(ConfigError::OutOfRange {
                key: "distanceRange",
                value: distance_range as f64,
                min: 1.0,
                max: MAX_DISTANCE_RANGE as f64,
            });
        }

        let crop_tolerance = self.crop_tolerance.unwrap_or(DEFAULT_CROP_TOLERANCE);
        if !(0.0..=1.0).contains(&crop_tolerance) {
            return Err(ConfigError::OutOfRange {
                key: "cropTolerance",
                value: crop_tolerance as f64,
                min: 0.0,
                max: 1.0,
            });
        }

        let charset = self.charset.as_deref().map(charset_from_str);
        if charset.as_ref().is_some_and(|c| c.is_empty()) {
            return Err(ConfigError::EmptyCharset);
        }

        let atlas = AtlasConfig {
            field_type,
            file_name: self
                .file_name
                .clone()
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
            output_dir: self
                .output_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            texture_size: (width, height),
            font_size,
            border: self.border.unwrap_or(DEFAULT_BORDER),
            distance_range,
            texture_padding: self.texture_padding.unwrap_or(DEFAULT_TEXTURE_PADDING),
            round_decimal: self.round_decimal,
            rtl: self.rtl.unwrap_or(false),
            charset,
            crop_tolerance,
        };

        debug!(
            "Resolved config: {} fonts, {} {}x{}, size {}",
            fonts.len(),
            atlas.field_type,
            width,
            height,
            atlas.font_size
        );

        Ok(ResolvedBuild { fonts, atlas })
    }

    /// Get the path that would be used for loading config
    ///
    /// Priority:
    /// 1. GENATLAS_CONFIG environment variable
    /// 2. ./genatlas.toml
    /// 3. ~/.config/genatlas/config.toml
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(path);
            if p.exists() {
                return Some(p);
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("genatlas").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }
        }

        None
    }

    /// Load settings from specified path (JSON by extension, TOML otherwise)
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let parsed = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        };
        let config = parsed.map_err(|reason| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        })?;

        info!("Loaded config: {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    pub fn from_json_str(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    /// Commented template written by `--init-config`
    pub fn template() -> String {
        format!(
            r#"# genatlas build configuration
# Fonts are packed in the order listed; all of them share one texture.

# fieldType = "sdf"         # sdf | msdf | mtsdf | psdf
# outputDir = "./"
# fileName = "{file}"
# textureSize = [900, 900]  # default: {side} x font count
# charset = "ABC"           # shared charset (default: every glyph in each font)
# fontSize = {size}
# border = {border}
# distanceRange = {range}
# texturePadding = {padding}
# roundDecimal = 2
# rtl = false
# cropTolerance = {tolerance}

[[fonts]]
fontName = "Roboto"
fontWeight = "regular"
url = "./fonts/Roboto-Regular.ttf"

[[fonts]]
fontName = "Roboto"
fontWeight = "bold"
url = "./fonts/Roboto-Bold.ttf"
"#,
            file = DEFAULT_FILE_NAME,
            side = TEXTURE_SIDE_PER_FONT,
            size = DEFAULT_FONT_SIZE,
            border = DEFAULT_BORDER,
            range = DEFAULT_DISTANCE_RANGE,
            padding = DEFAULT_TEXTURE_PADDING,
            tolerance = DEFAULT_CROP_TOLERANCE,
        )
    }
}

/// `.ttf`, `.otf`, `.woff` or `.woff2` (any case)
fn has_valid_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            VALID_FONT_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}
