//! Glyph distance fields
//!
//! Single-channel distance comes from the rasterized coverage bitmap;
//! multi-channel fields come from the glyph outline. Both share one cell
//! grid: the coverage bitmap with `pad` pixels added on every side.

use crate::config::FieldType;
use crate::error::GenerateError;
use fdsm::bezier::scanline::FillRule;
use fdsm::generate::generate_msdf;
use fdsm::render::correct_sign_msdf;
use fdsm::shape::Shape;
use fdsm::transform::Transform;
use image::{imageops, Rgba, RgbImage, RgbaImage};
use nalgebra::{Affine2, Matrix3};
use sdf_glyph_renderer::BitmapGlyph;
use ttf_parser::{Face, GlyphId};

/// Sine of the largest angle still treated as a corner when coloring edges
const CORNER_ANGLE_THRESHOLD: f64 = 0.03;

/// Fixed so repeated builds produce identical textures
const EDGE_COLORING_SEED: u64 = 0;

/// Placement of a glyph on its cell, from the rasterizer's metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    /// Bitmap size without padding
    pub bitmap_width: usize,
    pub bitmap_height: usize,
    pub pad: u32,
    /// Bitmap origin in pixels, y up
    pub xmin: i32,
    pub ymin: i32,
    /// Pixels per font unit
    pub scale: f64,
}

impl CellGeometry {
    pub fn width(&self) -> u32 {
        self.bitmap_width as u32 + 2 * self.pad
    }

    pub fn height(&self) -> u32 {
        self.bitmap_height as u32 + 2 * self.pad
    }
}

/// Field types that need the glyph outline
pub fn needs_outline(field_type: FieldType) -> bool {
    !matches!(field_type, FieldType::Sdf)
}

/// Render one glyph cell for `field_type`
///
/// `face` must be present for field types that need the outline.
pub fn glyph_cell(
    field_type: FieldType,
    face: Option<&Face<'_>>,
    glyph: u16,
    coverage: &[u8],
    cell: &CellGeometry,
    range: u32,
) -> Result<RgbaImage, GenerateError> {
    let sdf = coverage_field(
        coverage,
        cell.bitmap_width,
        cell.bitmap_height,
        cell.pad,
        range,
    )?;
    let (w, h) = (cell.width(), cell.height());

    let msdf = match (needs_outline(field_type), face) {
        (false, _) => None,
        (true, Some(face)) => Some(outline_msdf(face, glyph, cell, range)),
        (true, None) => {
            return Err(GenerateError::Field {
                reason: format!("{} needs glyph outlines", field_type),
            })
        }
    };

    let cell_image = RgbaImage::from_fn(w, h, |x, y| {
        let s = sdf[(y * w + x) as usize];
        let [r, g, b] = msdf.as_ref().map(|m| m.get_pixel(x, y).0).unwrap_or([s; 3]);
        Rgba(match field_type {
            FieldType::Sdf => [s, s, s, s],
            FieldType::Psdf => {
                let p = median(r, g, b);
                [p, p, p, p]
            }
            FieldType::Msdf => [r, g, b, 255],
            FieldType::Mtsdf => [r, g, b, s],
        })
    });
    Ok(cell_image)
}

/// Euclidean distance from coverage, padded by `pad`, 128 at the edge
pub fn coverage_field(
    coverage: &[u8],
    width: usize,
    height: usize,
    pad: u32,
    range: u32,
) -> Result<Vec<u8>, GenerateError> {
    let buffer = pad as usize;
    let glyph = BitmapGlyph::from_unbuffered(coverage, width, height, buffer).map_err(|e| {
        GenerateError::Field {
            reason: format!("{:?}", e),
        }
    })?;

    let distances = glyph.render_sdf(buffer.max(1));
    let expected = (width + 2 * buffer) * (height + 2 * buffer);
    if distances.len() != expected {
        return Err(GenerateError::Field {
            reason: format!("expected {} distances, got {}", expected, distances.len()),
        });
    }

    // Positive outside
    Ok(distances
        .iter()
        .map(|&d| encode_distance(-d, range))
        .collect())
}

/// Multi-channel field of the outline on the cell grid, top row first
pub fn outline_msdf(face: &Face<'_>, glyph: u16, cell: &CellGeometry, range: u32) -> RgbImage {
    let mut shape = fdsm_ttf_parser::load_shape_from_face(face, GlyphId(glyph));

    // Font units -> cell pixels, y up
    let s = cell.scale;
    let tx = cell.pad as f64 - cell.xmin as f64;
    let ty = cell.pad as f64 - cell.ymin as f64;
    let transform = Affine2::from_matrix_unchecked(Matrix3::new(
        s, 0.0, tx, //
        0.0, s, ty, //
        0.0, 0.0, 1.0,
    ));
    shape.transform(&transform);

    let colored = Shape::edge_coloring_simple(shape, CORNER_ANGLE_THRESHOLD, EDGE_COLORING_SEED);
    let prepared = colored.prepare();

    let mut msdf = RgbImage::new(cell.width(), cell.height());
    generate_msdf(&prepared, range as f64, &mut msdf);
    correct_sign_msdf(&mut msdf, &prepared, FillRule::Nonzero);

    // Rows come out bottom-up
    imageops::flip_vertical_in_place(&mut msdf);
    msdf
}

/// Signed distance in pixels (positive inside) to 0..255
pub fn encode_distance(distance: f64, range: u32) -> u8 {
    let value = (0.5 + distance / range.max(1) as f64).clamp(0.0, 1.0);
    (value * 255.0).round() as u8
}

fn median(a: u8, b: u8, c: u8) -> u8 {
    a.min(b).max(a.max(b).min(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x4 ink square in the middle of a 6x6 bitmap
    fn square() -> Vec<u8> {
        let mut bmp = vec![0u8; 36];
        for y in 1..5 {
            for x in 1..5 {
                bmp[y * 6 + x] = 255;
            }
        }
        bmp
    }

    #[test]
    fn test_coverage_field_sign() {
        let field = coverage_field(&square(), 6, 6, 2, 4).unwrap();
        let w = 10;
        assert_eq!(field.len(), w * w);
        assert!(field[0] < 64, "corner {}", field[0]);
        assert!(field[5 * w + 5] > 192, "center {}", field[5 * w + 5]);
        // Ink starts at column 3
        assert!(field[5 * w + 2] < 128);
        assert!(field[5 * w + 3] >= 128);
    }

    #[test]
    fn test_encode_distance() {
        assert_eq!(encode_distance(0.0, 4), 128);
        assert_eq!(encode_distance(2.0, 4), 255);
        assert_eq!(encode_distance(-2.0, 4), 0);
        assert_eq!(encode_distance(-10.0, 4), 0);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(1, 2, 3), 2);
        assert_eq!(median(9, 0, 4), 4);
        assert_eq!(median(7, 7, 0), 7);
    }

    #[test]
    fn test_sdf_cell_without_outline() {
        let cell = CellGeometry {
            bitmap_width: 6,
            bitmap_height: 6,
            pad: 2,
            xmin: 0,
            ymin: 0,
            scale: 1.0,
        };
        let img = glyph_cell(FieldType::Sdf, None, 1, &square(), &cell, 4).unwrap();
        assert_eq!(img.dimensions(), (10, 10));
        let p = img.get_pixel(5, 5).0;
        assert!(p[0] == p[1] && p[1] == p[2] && p[2] == p[3]);
    }

    #[test]
    fn test_outline_types_need_face() {
        let cell = CellGeometry {
            bitmap_width: 6,
            bitmap_height: 6,
            pad: 2,
            xmin: 0,
            ymin: 0,
            scale: 1.0,
        };
        for ft in [FieldType::Msdf, FieldType::Mtsdf, FieldType::Psdf] {
            assert!(matches!(
                glyph_cell(ft, None, 1, &square(), &cell, 4),
                Err(GenerateError::Field { .. })
            ));
        }
    }
}
