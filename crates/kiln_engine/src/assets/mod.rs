//! Asset management system
//!
//! Image decoding and the name-keyed registry that scenes and particle
//! systems resolve shared meshes, textures and materials through.

pub mod image_loader;
pub mod registry;

pub use image_loader::ImageData;
pub use registry::{ResourceRegistry, DEFAULT_MATERIAL, DEFAULT_QUAD_MESH};

use thiserror::Error;

use crate::render::texture::TextureError;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// Unsupported asset format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Texture could not be created
    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
