//! Texture image service
//!
//! Decode, content bounds with alpha tolerance, crop, and PNG encode.

use crate::error::TextureError;
use crate::utils::write_durable;
use image::RgbaImage;
use log::trace;
use std::path::Path;

/// Axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn full(img: &RgbaImage) -> Self {
        Self {
            x: 0,
            y: 0,
            width: img.width(),
            height: img.height(),
        }
    }

    /// Smallest rectangle containing both
    pub fn union(self, other: CropRect) -> CropRect {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = (self.x + self.width).max(other.x + other.width);
        let y1 = (self.y + self.height).max(other.y + other.height);
        CropRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    /// Clip to an image of `width`x`height`
    pub fn clamp_to(self, width: u32, height: u32) -> CropRect {
        let x = self.x.min(width);
        let y = self.y.min(height);
        CropRect {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }
}

/// Decode an image file to RGBA8
pub fn read_texture(path: &Path) -> Result<RgbaImage, TextureError> {
    use image::ImageReader;

    let decode_err = |source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?;
    let img = reader.decode().map_err(decode_err)?;

    trace!("Decoded {} ({}x{})", path.display(), img.width(), img.height());
    Ok(img.to_rgba8())
}

/// Bounding box of pixels whose alpha exceeds `tolerance` (0.0-1.0)
///
/// Returns None for a fully transparent image.
pub fn content_bounds(img: &RgbaImage, tolerance: f32) -> Option<CropRect> {
    let threshold = tolerance.clamp(0.0, 1.0) * 255.0;
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;

    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel.0[3] as f32 > threshold {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if min_x == u32::MAX {
        return None;
    }

    Some(CropRect {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

/// Copy out a sub-rectangle
pub fn crop(img: &RgbaImage, rect: CropRect) -> RgbaImage {
    if rect == CropRect::full(img) {
        return img.clone();
    }
    image::imageops::crop_imm(img, rect.x, rect.y, rect.width, rect.height).to_image()
}

/// Encode as 8-bit RGBA PNG
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, TextureError> {
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, img.width(), img.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(img.as_raw())?;
    }
    Ok(buf)
}

/// Encode and write a PNG, returning once it is on disk
pub fn write_texture(path: &Path, img: &RgbaImage) -> Result<(), TextureError> {
    let data = encode_png(img)?;
    write_durable(path, &data).map_err(|source| TextureError::Write {
        path: path.to_path_buf(),
        source,
    })
}
