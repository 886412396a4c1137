//! Material system for rendering

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::texture::Texture2D;
use crate::foundation::math::{Vec3, Vec4};

/// Scalar material inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Base colour (RGBA)
    pub color: Vec4,

    /// Metallic factor (0.0 = dielectric, 1.0 = metallic)
    pub metallic: f32,

    /// Roughness factor (0.0 = mirror, 1.0 = completely rough)
    pub roughness: f32,

    /// Ambient occlusion factor
    pub ao: f32,

    /// Emitted radiance
    pub emissive: Vec3,
}

impl Default for MaterialProperties {
    fn default() -> Self {
        Self {
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            metallic: 0.0,
            roughness: 1.0,
            ao: 1.0,
            emissive: Vec3::zeros(),
        }
    }
}

/// Optional texture maps
#[derive(Debug, Clone, Default)]
pub struct MaterialTextures {
    /// Base colour map
    pub albedo: Option<Arc<Texture2D>>,
    /// Tangent-space normal map
    pub normal: Option<Arc<Texture2D>>,
    /// Metallic map
    pub metallic: Option<Arc<Texture2D>>,
    /// Roughness map
    pub roughness: Option<Arc<Texture2D>>,
    /// Ambient occlusion map
    pub ao: Option<Arc<Texture2D>>,
    /// Emissive map
    pub emissive: Option<Arc<Texture2D>>,
}

/// Material properties for 3D rendering
#[derive(Debug, Clone)]
pub struct Material {
    /// Display name
    pub name: String,
    /// Scalar inputs
    pub properties: MaterialProperties,
    /// Texture inputs
    pub textures: MaterialTextures,
}

impl Material {
    /// Create a new material with default properties
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: MaterialProperties::default(),
            textures: MaterialTextures::default(),
        }
    }

    /// Set the base colour
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.properties.color = color;
        self
    }

    /// Set the metallic factor
    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.properties.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    /// Set the roughness factor
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.properties.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Set the albedo map
    pub fn with_albedo_texture(mut self, texture: Option<Arc<Texture2D>>) -> Self {
        self.textures.albedo = texture;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("Default Material")
    }
}
