//! Built-in generator against real font files
//!
//! Needs a TrueType font from the system. Without one each test prints a
//! note and returns, unless GENATLAS_REQUIRE_FONTS is set.

use genatlas::atlas::{FieldGenerator, GenerateRequest, GeneratedFont, SdfGenerator};
use genatlas::font::{charset_from_str, GlyphEntry};
use genatlas::{AtlasPipeline, BuildConfig, FontEntry};
use std::path::{Path, PathBuf};

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
];

/// First usable system font
///
/// Panics instead of skipping when GENATLAS_REQUIRE_FONTS is set.
fn system_font(test: &str) -> Option<PathBuf> {
    let found = std::env::var_os("GENATLAS_TEST_FONT")
        .map(PathBuf::from)
        .into_iter()
        .chain(FONT_CANDIDATES.iter().map(PathBuf::from))
        .find(|p| p.exists());
    if found.is_none() {
        if std::env::var_os("GENATLAS_REQUIRE_FONTS").is_some() {
            panic!("{}: no system font found", test);
        }
        eprintln!("{}: skipped, no system font found", test);
    }
    found
}

fn build_config(dir: &Path, fonts: Vec<FontEntry>, field_type: &str) -> BuildConfig {
    BuildConfig {
        fonts: Some(fonts),
        output_dir: Some(dir.to_path_buf()),
        texture_size: Some([256, 256]),
        field_type: Some(field_type.to_string()),
        charset: Some("AHOW".to_string()),
        ..BuildConfig::default()
    }
}

/// Generate one font from scratch
fn generate(font: &Path, field_type: &str, chars: &str) -> GeneratedFont {
    let dir = tempfile::tempdir().unwrap();
    let resolved = build_config(
        dir.path(),
        vec![FontEntry::new("Sans", "regular", font)],
        field_type,
    )
    .resolve()
    .unwrap();
    let charset = charset_from_str(chars);
    let request = GenerateRequest {
        font: &resolved.fonts[0],
        charset: &charset,
        config: &resolved.atlas,
        reuse: None,
    };
    SdfGenerator.generate(&request).unwrap()
}

fn overlaps(a: &GlyphEntry, b: &GlyphEntry) -> bool {
    a.page == b.page
        && a.x < b.x + b.width
        && b.x < a.x + a.width
        && a.y < b.y + b.height
        && b.y < a.y + a.height
}

#[test]
fn test_two_fonts_share_texture_without_overlap() {
    let Some(font) = system_font("test_two_fonts_share_texture_without_overlap") else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let fonts = vec![
        FontEntry::new("Sans", "regular", &font),
        FontEntry::new("Sans", "bold", &font),
    ];
    let mut pipeline = AtlasPipeline::new(&build_config(dir.path(), fonts, "sdf")).unwrap();
    let report = pipeline.run().unwrap();

    assert!(report.skipped.is_empty(), "{:?}", report.skipped);
    let regular = report.manifest.get("sans_regular").unwrap();
    let bold = report.manifest.get("sans_bold").unwrap();
    assert_eq!(regular.chars.len(), 4);
    assert_eq!(bold.chars.len(), 4);

    for a in &regular.chars {
        assert!(a.is_packed());
        for b in &bold.chars {
            assert!(!overlaps(a, b), "{} overlaps {}", a.character, b.character);
        }
    }

    // Both layouts describe the one cropped texture
    let texture = genatlas::texture::read_texture(report.texture_path.as_ref().unwrap()).unwrap();
    for layout in [regular, bold] {
        assert_eq!(layout.pages, vec!["atlas.sdf.png".to_string()]);
        assert_eq!(
            (layout.common.scale_w, layout.common.scale_h),
            texture.dimensions()
        );
        for glyph in &layout.chars {
            assert!(glyph.x + glyph.width <= texture.width());
            assert!(glyph.y + glyph.height <= texture.height());
        }
    }
}

#[test]
fn test_msdf_channels_differ() {
    let Some(font) = system_font("test_msdf_channels_differ") else {
        return;
    };
    let generated = generate(&font, "msdf", "AW");
    let page = &generated.textures[0].image;

    let colored = page
        .pixels()
        .filter(|p| p.0[0] != p.0[1] || p.0[1] != p.0[2])
        .count();
    assert!(colored > 0, "msdf texture has identical channels");
}

#[test]
fn test_psdf_and_mtsdf_relate_to_sdf() {
    let Some(font) = system_font("test_psdf_and_mtsdf_relate_to_sdf") else {
        return;
    };
    let sdf = generate(&font, "sdf", "AW");
    let psdf = generate(&font, "psdf", "AW");
    let mtsdf = generate(&font, "mtsdf", "AW");
    let (sdf, psdf, mtsdf) = (
        &sdf.textures[0].image,
        &psdf.textures[0].image,
        &mtsdf.textures[0].image,
    );

    // Same cells, different distance source
    assert_ne!(sdf.as_raw(), psdf.as_raw());
    // The true distance rides in mtsdf's alpha channel
    assert!(sdf
        .pixels()
        .zip(mtsdf.pixels())
        .all(|(s, m)| s.0[3] == m.0[3]));
}

#[test]
fn test_generate_overflows_small_texture() {
    let Some(font) = system_font("test_generate_overflows_small_texture") else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let mut config = build_config(
        dir.path(),
        vec![FontEntry::new("Sans", "regular", &font)],
        "sdf",
    );
    config.texture_size = Some([64, 64]);
    let resolved = config.resolve().unwrap();
    let charset = charset_from_str("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
    let request = GenerateRequest {
        font: &resolved.fonts[0],
        charset: &charset,
        config: &resolved.atlas,
        reuse: None,
    };

    let generated = SdfGenerator.generate(&request).unwrap();
    assert!(generated.textures.len() > 1);
}
