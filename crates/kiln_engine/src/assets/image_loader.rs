//! Image loading utilities for texture data
//!
//! Decodes PNG and JPEG images into tightly packed 8-bit texels, keeping
//! one, two, three or four channels as stored and converting anything else
//! to RGBA.

use std::path::Path;

use image::{ColorType, DynamicImage};

use crate::assets::AssetError;
use crate::render::texture::{ImageFormat, Texture2D};

/// Decoded image ready for texture upload
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Row-major texels, top row first unless flipped
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of colour channels
    pub channels: u8,
}

impl ImageData {
    /// Load an image from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path_ref = path.as_ref();
        log::debug!("Loading image from: {:?}", path_ref);

        let img = image::open(path_ref)
            .map_err(|e| AssetError::LoadFailed(format!("Failed to load image {}: {}", path_ref.display(), e)))?;
        let image = Self::from_dynamic(img);

        log::info!("Loaded image {}x{} from {:?}", image.width, image.height, path_ref);
        Ok(image)
    }

    /// Load image from memory (useful for embedded resources)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| AssetError::LoadFailed(format!("Failed to load image from bytes: {}", e)))?;
        let image = Self::from_dynamic(img);

        log::debug!("Loaded image {}x{} from memory", image.width, image.height);
        Ok(image)
    }

    /// Create a solid RGBA image (useful for testing and defaults)
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = (width * height) as usize;
        Self {
            data: color.repeat(pixel_count),
            width,
            height,
            channels: 4,
        }
    }

    /// Mirror rows so the first row is the bottom of the image
    pub fn flip_vertically(&mut self) {
        let row = self.width as usize * self.channels as usize;
        if row == 0 {
            return;
        }
        let flipped: Vec<u8> = self.data.chunks_exact(row).rev().flatten().copied().collect();
        self.data = flipped;
    }

    /// Texture format matching the channel count
    pub fn format(&self, srgb: bool) -> Option<ImageFormat> {
        ImageFormat::from_channel_count(self.channels as usize, srgb)
    }

    /// Build a texture from the decoded texels
    pub fn into_texture(self, name: impl Into<String>, srgb: bool) -> Result<Texture2D, AssetError> {
        let format = self
            .format(srgb)
            .ok_or_else(|| AssetError::UnsupportedFormat(format!("{} channel image", self.channels)))?;
        let mut texture = Texture2D::new(self.width, self.height, format).with_name(name);
        texture.set_data(&self.data)?;
        Ok(texture)
    }

    /// Get the size of the image data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Check if image dimensions are power of two (useful for mipmaps)
    pub fn is_power_of_two(&self) -> bool {
        self.width.is_power_of_two() && self.height.is_power_of_two()
    }

    fn from_dynamic(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        let (channels, data) = match img.color() {
            ColorType::L8 => (1, img.into_luma8().into_raw()),
            ColorType::La8 => (2, img.into_luma_alpha8().into_raw()),
            ColorType::Rgb8 => (3, img.into_rgb8().into_raw()),
            _ => (4, img.into_rgba8().into_raw()),
        };
        Self {
            data,
            width,
            height,
            channels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_image() {
        let img = ImageData::solid_color(4, 4, [255, 0, 0, 255]);
        assert_eq!(img.channels, 4);
        assert_eq!(img.size_bytes(), 4 * 4 * 4);
        assert_eq!(&img.data[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_power_of_two() {
        assert!(ImageData::solid_color(256, 256, [0, 0, 0, 255]).is_power_of_two());
        assert!(!ImageData::solid_color(100, 100, [0, 0, 0, 255]).is_power_of_two());
    }

    #[test]
    fn test_from_bytes_keeps_rgb_channels() {
        let mut png = Vec::new();
        image::RgbImage::from_pixel(2, 1, image::Rgb([10, 20, 30]))
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let img = ImageData::from_bytes(&png).unwrap();
        assert_eq!(img.channels, 3);
        assert_eq!(img.format(true), Some(ImageFormat::SRGB8));

        let texture = img.into_texture("swatch", false).unwrap();
        assert_eq!(texture.format(), ImageFormat::RGB8);
        assert_eq!(texture.data().as_bytes(), &[10, 20, 30, 10, 20, 30]);
    }

    #[test]
    fn test_flip_vertically_swaps_rows() {
        let mut img = ImageData {
            data: vec![1, 2],
            width: 1,
            height: 2,
            channels: 1,
        };
        img.flip_vertically();
        assert_eq!(img.data, vec![2, 1]);
    }

    #[test]
    fn test_invalid_bytes_fail() {
        assert!(matches!(ImageData::from_bytes(&[0, 1, 2]), Err(AssetError::LoadFailed(_))));
    }
}
