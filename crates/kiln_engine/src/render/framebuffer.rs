//! Offscreen render targets
//!
//! A framebuffer owns one texture per colour attachment plus an optional
//! depth/stencil texture, all sized to the framebuffer.

use super::texture::{ImageFormat, Texture2D};
use crate::foundation::math::Vec4;

/// Largest width or height a framebuffer accepts
pub const MAX_FRAMEBUFFER_SIZE: u32 = 8192;

/// Framebuffer errors
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FramebufferError {
    /// Zero or oversized dimensions
    #[error("Invalid framebuffer size {width}x{height} (max 8192)")]
    InvalidSize {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

/// Render target with colour and depth attachments
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    attachments: Vec<ImageFormat>,
    color_textures: Vec<Texture2D>,
    depth_texture: Option<Texture2D>,
}

impl Framebuffer {
    /// Create a framebuffer; `DEPTH24STENCIL8` entries become the depth attachment
    pub fn new(width: u32, height: u32, attachments: &[ImageFormat]) -> Result<Self, FramebufferError> {
        validate_size(width, height)?;
        let mut framebuffer = Self {
            width,
            height,
            attachments: attachments.to_vec(),
            color_textures: Vec::new(),
            depth_texture: None,
        };
        framebuffer.invalidate();
        log::debug!(
            "Created {}x{} framebuffer with {} colour attachment(s)",
            width,
            height,
            framebuffer.color_textures.len()
        );
        Ok(framebuffer)
    }

    /// Rebuild every attachment at a new size
    ///
    /// Invalid sizes are logged and leave the framebuffer unchanged.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), FramebufferError> {
        if let Err(e) = validate_size(width, height) {
            log::warn!("Attempted to resize framebuffer to {}, {}", width, height);
            return Err(e);
        }
        if width == self.width && height == self.height {
            return Ok(());
        }
        self.width = width;
        self.height = height;
        self.invalidate();
        Ok(())
    }

    /// Fill every colour attachment with a colour and reset depth to 1
    pub fn clear(&mut self, color: Vec4) {
        for texture in &mut self.color_textures {
            texture.clear(color);
        }
        if let Some(depth) = &mut self.depth_texture {
            depth.clear(Vec4::new(1.0, 0.0, 0.0, 0.0));
        }
    }

    /// Colour attachment by index
    pub fn color_attachment(&self, index: usize) -> Option<&Texture2D> {
        self.color_textures.get(index)
    }

    /// Depth/stencil attachment
    pub fn depth_attachment(&self) -> Option<&Texture2D> {
        self.depth_texture.as_ref()
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Attachment formats in declaration order
    pub fn attachments(&self) -> &[ImageFormat] {
        &self.attachments
    }

    fn invalidate(&mut self) {
        self.color_textures.clear();
        self.depth_texture = None;
        for (index, format) in self.attachments.iter().enumerate() {
            let texture =
                Texture2D::new(self.width, self.height, *format).with_name(format!("Framebuffer attachment {}", index));
            if format.is_depth() {
                self.depth_texture = Some(texture);
            } else {
                self.color_textures.push(texture);
            }
        }
    }
}

fn validate_size(width: u32, height: u32) -> Result<(), FramebufferError> {
    if width == 0 || height == 0 || width > MAX_FRAMEBUFFER_SIZE || height > MAX_FRAMEBUFFER_SIZE {
        return Err(FramebufferError::InvalidSize { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Framebuffer {
        Framebuffer::new(64, 32, &[ImageFormat::RGBA8, ImageFormat::DEPTH24STENCIL8, ImageFormat::RGB32F]).unwrap()
    }

    #[test]
    fn test_depth_attachment_is_split_out() {
        let framebuffer = viewport();
        assert_eq!(framebuffer.color_attachment(0).unwrap().format(), ImageFormat::RGBA8);
        assert_eq!(framebuffer.color_attachment(1).unwrap().format(), ImageFormat::RGB32F);
        assert!(framebuffer.color_attachment(2).is_none());
        assert_eq!(framebuffer.depth_attachment().unwrap().format(), ImageFormat::DEPTH24STENCIL8);
        assert_eq!(framebuffer.attachments().len(), 3);
    }

    #[test]
    fn test_resize_rebuilds_attachments() {
        let mut framebuffer = viewport();
        framebuffer.resize(128, 128).unwrap();
        assert_eq!(framebuffer.width(), 128);
        assert_eq!(framebuffer.color_attachment(0).unwrap().width(), 128);
        assert_eq!(framebuffer.depth_attachment().unwrap().height(), 128);
    }

    #[test]
    fn test_invalid_resize_is_ignored() {
        let mut framebuffer = viewport();
        assert_eq!(
            framebuffer.resize(0, 10),
            Err(FramebufferError::InvalidSize { width: 0, height: 10 })
        );
        assert!(framebuffer.resize(MAX_FRAMEBUFFER_SIZE + 1, 10).is_err());
        assert_eq!((framebuffer.width(), framebuffer.height()), (64, 32));
        assert!(framebuffer.resize(MAX_FRAMEBUFFER_SIZE, 1).is_ok());
    }

    #[test]
    fn test_clear_fills_colour() {
        let mut framebuffer = Framebuffer::new(1, 1, &[ImageFormat::RGBA8]).unwrap();
        framebuffer.clear(Vec4::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(framebuffer.color_attachment(0).unwrap().data().as_bytes(), &[0, 0, 255, 255]);
    }
}
