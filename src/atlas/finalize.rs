//! Atlas finalization
//!
//! Runs once after the last font is packed: crops the shared texture to its
//! content, writes it to the output path, and rewrites every font's layout
//! to the cropped coordinate space.

use crate::error::TextureError;
use crate::font::FontLayoutData;
use crate::texture::{content_bounds, crop, read_texture, write_texture, CropRect};
use log::{debug, info};
use std::path::Path;

/// Final texture geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalTexture {
    pub width: u32,
    pub height: u32,
    /// Region of the raw texture that was kept
    pub crop: CropRect,
}

/// Crop `raw_texture` into `output` and rewrite `layouts`
///
/// The kept region covers all visible pixels and every packed glyph cell,
/// so glyph coordinates only shift by the crop origin.
pub fn finalize<'a>(
    raw_texture: &Path,
    output: &Path,
    layouts: impl IntoIterator<Item = &'a mut FontLayoutData>,
    tolerance: f32,
) -> Result<FinalTexture, TextureError> {
    let img = read_texture(raw_texture)?;
    let mut layouts: Vec<&mut FontLayoutData> = layouts.into_iter().collect();

    let rect = crop_rect(&img, layouts.iter().map(|l| &**l), tolerance);
    let cropped = crop(&img, rect);
    write_texture(output, &cropped)?;

    info!(
        "Atlas cropped {}x{} -> {}x{} (offset {}, {})",
        img.width(),
        img.height(),
        rect.width,
        rect.height,
        rect.x,
        rect.y
    );

    let page_name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    for layout in layouts.iter_mut() {
        apply_crop(layout, rect, page_name.as_deref());
    }

    Ok(FinalTexture {
        width: rect.width,
        height: rect.height,
        crop: rect,
    })
}

/// Region to keep: visible content united with every packed glyph cell
pub fn crop_rect<'a>(
    img: &image::RgbaImage,
    layouts: impl IntoIterator<Item = &'a FontLayoutData>,
    tolerance: f32,
) -> CropRect {
    let Some(mut rect) = content_bounds(img, tolerance) else {
        debug!("Texture is fully transparent, keeping full size");
        return CropRect::full(img);
    };

    for layout in layouts {
        for glyph in layout.chars.iter().filter(|g| g.is_packed() && g.page == 0) {
            rect = rect.union(CropRect {
                x: glyph.x,
                y: glyph.y,
                width: glyph.width,
                height: glyph.height,
            });
        }
    }

    rect.clamp_to(img.width(), img.height())
}

/// Move a layout into the cropped coordinate space
pub fn apply_crop(layout: &mut FontLayoutData, rect: CropRect, page_name: Option<&str>) {
    layout.common.scale_w = rect.width;
    layout.common.scale_h = rect.height;
    for glyph in layout.chars.iter_mut().filter(|g| g.is_packed()) {
        glyph.x = glyph.x.saturating_sub(rect.x);
        glyph.y = glyph.y.saturating_sub(rect.y);
    }
    if let Some(name) = page_name {
        layout.pages = vec![name.to_string()];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldType;
    use crate::font::{CommonInfo, DistanceFieldInfo, FontInfo, GlyphEntry};
    use image::{Rgba, RgbaImage};

    fn layout_with(glyphs: &[(u32, u32, u32, u32)]) -> FontLayoutData {
        FontLayoutData {
            pages: vec!["atlas.png".to_string()],
            chars: glyphs
                .iter()
                .enumerate()
                .map(|(i, &(x, y, width, height))| GlyphEntry {
                    id: 65 + i as u32,
                    index: i as u16 + 1,
                    character: char::from_u32(65 + i as u32).unwrap().to_string(),
                    width,
                    height,
                    xoffset: 0.0,
                    yoffset: 0.0,
                    xadvance: width as f32,
                    chnl: 15,
                    x,
                    y,
                    page: 0,
                })
                .collect(),
            info: FontInfo {
                face: "Test".to_string(),
                size: 42.0,
                bold: 0,
                italic: 0,
                charset: vec![],
                unicode: 1,
                stretch_h: 100,
                smooth: 1,
                aa: 1,
                padding: [2; 4],
                spacing: [1; 2],
                rtl: false,
            },
            common: CommonInfo {
                line_height: 48.0,
                base: 38.0,
                scale_w: 64,
                scale_h: 64,
                pages: 1,
                packed: 0,
                alpha_chnl: 0,
                red_chnl: 0,
                green_chnl: 0,
                blue_chnl: 0,
            },
            distance_field: DistanceFieldInfo {
                field_type: FieldType::Sdf,
                distance_range: 4,
            },
            kernings: vec![],
        }
    }

    fn fill(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32) {
        for py in y..y + h {
            for px in x..x + w {
                img.put_pixel(px, py, Rgba([200, 200, 200, 200]));
            }
        }
    }

    #[test]
    fn test_crop_rect_includes_glyph_cells() {
        let mut img = RgbaImage::new(64, 64);
        // Visible ink sits inside a larger, partly transparent cell
        fill(&mut img, 12, 12, 4, 4);
        let layout = layout_with(&[(10, 10, 10, 10)]);
        let rect = crop_rect(&img, [&layout], 0.0002);
        assert_eq!(rect, CropRect { x: 10, y: 10, width: 10, height: 10 });
    }

    #[test]
    fn test_finalize_rewrites_all_layouts() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("atlas.png");
        let out = dir.path().join("atlas.sdf.png");

        let mut img = RgbaImage::new(64, 64);
        fill(&mut img, 0, 0, 10, 10);
        fill(&mut img, 11, 0, 8, 12);
        crate::texture::write_texture(&raw, &img).unwrap();

        let mut a = layout_with(&[(0, 0, 10, 10)]);
        let mut b = layout_with(&[(11, 0, 8, 12)]);
        let result = finalize(&raw, &out, [&mut a, &mut b], 0.0002).unwrap();

        assert_eq!((result.width, result.height), (19, 12));
        for layout in [&a, &b] {
            assert_eq!(layout.common.scale_w, 19);
            assert_eq!(layout.common.scale_h, 12);
            assert_eq!(layout.pages, vec!["atlas.sdf.png".to_string()]);
        }
        assert_eq!(b.chars[0].x, 11);
        let written = crate::texture::read_texture(&out).unwrap();
        assert_eq!(written.dimensions(), (19, 12));
    }

    #[test]
    fn test_finalize_is_idempotent_on_minimal_texture() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw.png");
        let out = dir.path().join("final.png");

        let mut img = RgbaImage::new(16, 9);
        fill(&mut img, 0, 0, 16, 9);
        crate::texture::write_texture(&raw, &img).unwrap();

        let mut layout = layout_with(&[(0, 0, 16, 9)]);
        let first = finalize(&raw, &out, [&mut layout], 0.0002).unwrap();
        let second = finalize(&out, &out, [&mut layout], 0.0002).unwrap();
        assert_eq!((first.width, first.height), (16, 9));
        assert_eq!(first, second);
    }

    #[test]
    fn test_apply_crop_shifts_glyphs() {
        let mut layout = layout_with(&[(5, 7, 3, 3), (0, 0, 0, 0)]);
        apply_crop(&mut layout, CropRect { x: 5, y: 7, width: 3, height: 3 }, None);
        assert_eq!((layout.chars[0].x, layout.chars[0].y), (0, 0));
        assert_eq!(layout.common.scale_w, 3);
        assert_eq!(layout.pages, vec!["atlas.png".to_string()]);
    }
}
