//! Resource registry
//!
//! Name-keyed store for shared CPU-side resources. Every resource is held
//! behind an `Arc`, so cloning the registry or handing out a resource never
//! copies texel or vertex data. Textures loaded from disk are keyed by the
//! path they were requested with and their colour space.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::assets::AssetError;
use crate::core::config::AssetConfig;
use crate::render::material::Material;
use crate::render::mesh::{Mesh, PrimitiveMesh, PrimitiveType};
use crate::render::texture::{Cubemap, Texture2D};

/// Name of the quad every particle system draws with
pub const DEFAULT_QUAD_MESH: &str = "DefaultQuadMesh";

/// Name of the material new primitives receive
pub const DEFAULT_MATERIAL: &str = "Default Material";

/// Shared meshes, textures, cubemaps and materials by name
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    meshes: HashMap<String, Arc<Mesh>>,
    textures: HashMap<String, Arc<Texture2D>>,
    cubemaps: HashMap<String, Arc<Cubemap>>,
    materials: HashMap<String, Arc<Material>>,
}

impl ResourceRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the default quad mesh and default material
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let mut quad = PrimitiveMesh::quad();
        quad.name = DEFAULT_QUAD_MESH.to_string();
        registry.insert_mesh(DEFAULT_QUAD_MESH, Arc::new(quad));
        registry.insert_material(DEFAULT_MATERIAL, Arc::new(Material::new(DEFAULT_MATERIAL)));
        registry
    }

    /// Register a mesh, replacing any previous one with the same name
    pub fn insert_mesh(&mut self, name: impl Into<String>, mesh: Arc<Mesh>) {
        let name = name.into();
        if self.meshes.insert(name.clone(), mesh).is_some() {
            log::debug!("Replaced mesh '{}'", name);
        }
    }

    /// Register a texture, replacing any previous one with the same name
    pub fn insert_texture(&mut self, name: impl Into<String>, texture: Arc<Texture2D>) {
        let name = name.into();
        if self.textures.insert(name.clone(), texture).is_some() {
            log::debug!("Replaced texture '{}'", name);
        }
    }

    /// Register a cubemap, replacing any previous one with the same name
    pub fn insert_cubemap(&mut self, name: impl Into<String>, cubemap: Arc<Cubemap>) {
        let name = name.into();
        if self.cubemaps.insert(name.clone(), cubemap).is_some() {
            log::debug!("Replaced cubemap '{}'", name);
        }
    }

    /// Register a material, replacing any previous one with the same name
    pub fn insert_material(&mut self, name: impl Into<String>, material: Arc<Material>) {
        let name = name.into();
        if self.materials.insert(name.clone(), material).is_some() {
            log::debug!("Replaced material '{}'", name);
        }
    }

    /// Mesh by name
    pub fn get_mesh(&self, name: &str) -> Option<Arc<Mesh>> {
        self.meshes.get(name).cloned()
    }

    /// Texture by name
    pub fn get_texture(&self, name: &str) -> Option<Arc<Texture2D>> {
        self.textures.get(name).cloned()
    }

    /// Cubemap by name
    pub fn get_cubemap(&self, name: &str) -> Option<Arc<Cubemap>> {
        self.cubemaps.get(name).cloned()
    }

    /// Material by name
    pub fn get_material(&self, name: &str) -> Option<Arc<Material>> {
        self.materials.get(name).cloned()
    }

    /// Registered default material, or a fresh one when missing
    pub fn default_material(&self) -> Arc<Material> {
        self.get_material(DEFAULT_MATERIAL)
            .unwrap_or_else(|| Arc::new(Material::new(DEFAULT_MATERIAL)))
    }

    /// Shared mesh for a primitive, generated and registered on first use
    ///
    /// Registered under the primitive's display name. Returns `None` for
    /// [`PrimitiveType::None`].
    pub fn primitive_mesh(&mut self, kind: PrimitiveType) -> Option<Arc<Mesh>> {
        let name = kind.to_string();
        if let Some(mesh) = self.get_mesh(&name) {
            return Some(mesh);
        }
        let mesh = Arc::new(PrimitiveMesh::create(kind)?);
        log::debug!("Generated primitive mesh '{}'", name);
        self.insert_mesh(name, Arc::clone(&mesh));
        Some(mesh)
    }

    /// Load a texture from disk once and share it afterwards
    ///
    /// Relative paths resolve against `config.assets_dir` first, then the
    /// working directory. The same file requested as sRGB and as linear is
    /// loaded twice.
    pub fn load_texture(
        &mut self,
        path: impl AsRef<Path>,
        srgb: bool,
        config: &AssetConfig,
    ) -> Result<Arc<Texture2D>, AssetError> {
        let path = path.as_ref();
        let key = texture_key(path, srgb);
        if let Some(texture) = self.get_texture(&key) {
            return Ok(texture);
        }

        let in_assets = Path::new(&config.assets_dir).join(path);
        let resolved = if path.is_absolute() || (!in_assets.exists() && path.exists()) {
            path.to_path_buf()
        } else {
            in_assets
        };
        if !resolved.exists() {
            return Err(AssetError::NotFound(resolved.display().to_string()));
        }

        let texture = Arc::new(Texture2D::from_file(&resolved, srgb, config.flip_on_load)?);
        self.insert_texture(key, Arc::clone(&texture));
        Ok(texture)
    }

    /// Number of registered resources of every kind
    pub fn len(&self) -> usize {
        self.meshes.len() + self.textures.len() + self.cubemaps.len() + self.materials.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registry name of a file-backed texture
fn texture_key(path: &Path, srgb: bool) -> String {
    let path = path.to_string_lossy();
    if srgb {
        format!("{} (sRGB)", path)
    } else {
        path.into_owned()
    }
}
