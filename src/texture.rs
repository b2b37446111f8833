//! Photo-frame textures.
//!
//! A frame asks for its image with [`TextureImage::load_or_fallback`]. If the
//! file is missing or undecodable the frame gets a generated placeholder and a
//! warning is logged; a bad image never stops the scene.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::TextureError;

/// Decoded RGBA8 pixels ready for upload.
#[derive(Clone, Debug)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub label: String,
    /// True if this is the generated placeholder rather than the requested image.
    pub is_fallback: bool,
}

impl TextureImage {
    /// Wrap raw RGBA data.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>, label: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels,
            label: label.into(),
            is_fallback: false,
        }
    }

    /// Decode an image file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self::from_rgba(
            width,
            height,
            img.into_raw(),
            path.display().to_string(),
        ))
    }

    /// Decode an image held in memory.
    pub fn from_bytes(bytes: &[u8], label: &str) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self::from_rgba(width, height, img.into_raw(), label))
    }

    /// Decode `path`, substituting the placeholder on any failure.
    pub fn load_or_fallback(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(texture) => {
                debug!(path = %path.display(), width = texture.width, height = texture.height, "texture loaded");
                texture
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "texture failed to load, using fallback");
                Self::fallback(64)
            }
        }
    }

    /// Generated placeholder: a soft two-tone checkerboard with hash noise, so
    /// a missing photo still reads as a picture rather than a hole.
    pub fn fallback(size: u32) -> Self {
        const CELL: u32 = 8;
        const LIGHT: [u8; 3] = [196, 181, 253];
        const DARK: [u8; 3] = [99, 102, 241];

        let size = size.max(1);
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let base = if (x / CELL + y / CELL) % 2 == 0 {
                    LIGHT
                } else {
                    DARK
                };
                let variation = (hash(x, y, 0x5eed) % 16) as i32 - 8;
                for channel in base {
                    pixels.push((channel as i32 + variation).clamp(0, 255) as u8);
                }
                pixels.push(255);
            }
        }

        Self {
            width: size,
            height: size,
            pixels,
            label: "fallback".to_string(),
            is_fallback: true,
        }
    }
}

fn hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_add(x.wrapping_mul(374761393));
    h = h.wrapping_add(y.wrapping_mul(668265263));
    h ^= h >> 13;
    h = h.wrapping_mul(1274126177);
    h ^= h >> 16;
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_fallback() {
        let texture = TextureImage::load_or_fallback("no/such/photo.png");
        assert!(texture.is_fallback);
        assert_eq!(texture.pixels.len(), (64 * 64 * 4) as usize);
    }

    #[test]
    fn corrupt_bytes_are_an_error() {
        let err = TextureImage::from_bytes(b"not an image", "bad").unwrap_err();
        assert!(matches!(err, TextureError::Image(_)));
    }

    #[test]
    fn encoded_image_round_trips_dimensions() {
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let mut png = std::io::Cursor::new(Vec::new());
        img.write_to(&mut png, image::ImageFormat::Png).unwrap();

        let texture = TextureImage::from_bytes(png.get_ref(), "tiny").unwrap();
        assert_eq!((texture.width, texture.height), (3, 2));
        assert_eq!(&texture.pixels[..4], &[10, 20, 30, 255]);
        assert!(!texture.is_fallback);
    }

    #[test]
    fn fallback_is_opaque() {
        let texture = TextureImage::fallback(16);
        assert!(texture.pixels.chunks(4).all(|px| px[3] == 255));
    }
}
