//! Scene files
//!
//! Scenes are stored as RON documents: one nested [`EntityDocument`] per
//! entity, children inline. Shared resources are stored by reference, so
//! meshes are written as their primitive kind and textures as the path they
//! were loaded from. Runtime state such as live particles is not saved.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::scene_graph::Scene;
use crate::assets::{ResourceRegistry, DEFAULT_MATERIAL};
use crate::core::config::AssetConfig;
use crate::ecs::components::{
    CameraComponent, LightComponent, MaterialComponent, MeshComponent, ParticleSystemComponent, ScriptComponent,
    TransformComponent,
};
use crate::ecs::Entity;
use crate::render::material::{Material, MaterialProperties, MaterialTextures};
use crate::render::mesh::PrimitiveType;
use crate::render::texture::Texture2D;

/// Scene file errors
#[derive(Error, Debug)]
pub enum SerializationError {
    /// Reading or writing the file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding failed
    #[error("RON encode error: {0}")]
    Ron(#[from] ron::Error),

    /// The file is not a valid scene document
    #[error("RON parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Serialized scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Scene name
    pub name: String,
    /// Root entities in order
    pub entities: Vec<EntityDocument>,
}

/// Serialized entity and its subtree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityDocument {
    /// Tag text
    pub name: String,
    /// Local transform
    pub transform: TransformComponent,
    /// Scene camera
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraComponent>,
    /// Light settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light: Option<LightComponent>,
    /// Mesh reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh: Option<MeshDocument>,
    /// Material with its texture paths
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<MaterialDocument>,
    /// Attached script
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<ScriptComponent>,
    /// Emitter settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub particle_system: Option<ParticleDocument>,
    /// Child entities in sibling order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EntityDocument>,
}

/// Mesh stored by primitive kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshDocument {
    /// Generator the mesh is rebuilt from
    pub primitive: PrimitiveType,
    /// Bounding box overlay toggle
    pub draw_aabb: bool,
}

/// Material with texture references
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDocument {
    /// Material name
    pub name: String,
    /// Scalar and colour parameters
    pub properties: MaterialProperties,
    /// Map files
    pub textures: TexturePaths,
}

/// Source path of each material map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TexturePaths {
    /// Albedo map, loaded as sRGB
    pub albedo: Option<PathBuf>,
    /// Normal map
    pub normal: Option<PathBuf>,
    /// Metallic map
    pub metallic: Option<PathBuf>,
    /// Roughness map
    pub roughness: Option<PathBuf>,
    /// Ambient occlusion map
    pub ao: Option<PathBuf>,
    /// Emissive map, loaded as sRGB
    pub emissive: Option<PathBuf>,
}

impl TexturePaths {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Particle emitter settings with its texture reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleDocument {
    /// Emitter settings, live particles excluded
    pub emitter: ParticleSystemComponent,
    /// Particle texture file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<PathBuf>,
}

impl PartialEq for ParticleDocument {
    fn eq(&self, other: &Self) -> bool {
        self.texture == other.texture
            && ron::to_string(&self.emitter).ok() == ron::to_string(&other.emitter).ok()
    }
}

fn texture_path(texture: &Option<Arc<Texture2D>>) -> Option<PathBuf> {
    texture.as_ref().and_then(|t| t.path()).map(Path::to_path_buf)
}

impl SceneDocument {
    /// Capture the scene tree
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            name: scene.name().to_string(),
            entities: scene
                .roots()
                .into_iter()
                .map(|root| EntityDocument::capture(scene, root))
                .collect(),
        }
    }

    /// Encode as pretty-printed RON
    pub fn to_ron(&self) -> Result<String, SerializationError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())?)
    }

    /// Decode from RON text
    pub fn from_ron(text: &str) -> Result<Self, SerializationError> {
        Ok(ron::from_str(text)?)
    }

    /// Write to a file
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), SerializationError> {
        let path = path.as_ref();
        fs::write(path, self.to_ron()?)?;
        log::info!("Saved scene '{}' to {}", self.name, path.display());
        Ok(())
    }

    /// Read from a file
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, SerializationError> {
        let path = path.as_ref();
        let document = Self::from_ron(&fs::read_to_string(path)?)?;
        log::info!("Loaded scene '{}' from {}", document.name, path.display());
        Ok(document)
    }

    /// Build a live scene, resolving resources through `registry`
    ///
    /// Missing textures are logged and left unset.
    pub fn instantiate(&self, registry: ResourceRegistry, assets: &AssetConfig) -> Scene {
        let mut scene = Scene::with_registry(self.name.clone(), registry);
        for entity in &self.entities {
            entity.spawn(&mut scene, None, assets);
        }
        scene
    }

    /// Number of entities in the document
    pub fn entity_count(&self) -> usize {
        self.entities.iter().map(EntityDocument::subtree_len).sum()
    }
}

impl EntityDocument {
    fn capture(scene: &Scene, entity: Entity) -> Self {
        let world = scene.world();
        Self {
            name: scene.name_of(entity).unwrap_or_default().to_string(),
            transform: world
                .get_component::<TransformComponent>(entity)
                .cloned()
                .unwrap_or_default(),
            camera: world.get_component::<CameraComponent>(entity).cloned(),
            light: world.get_component::<LightComponent>(entity).cloned(),
            mesh: world.get_component::<MeshComponent>(entity).map(|mesh| MeshDocument {
                primitive: mesh.primitive,
                draw_aabb: mesh.draw_aabb,
            }),
            material: world
                .get_component::<MaterialComponent>(entity)
                .map(|material| MaterialDocument::capture(&material.material)),
            script: world.get_component::<ScriptComponent>(entity).cloned(),
            particle_system: world
                .get_component::<ParticleSystemComponent>(entity)
                .map(|emitter| ParticleDocument {
                    emitter: emitter.clone(),
                    texture: emitter.texture().and_then(|t| t.path()).map(Path::to_path_buf),
                }),
            children: scene
                .children(entity)
                .into_iter()
                .map(|child| Self::capture(scene, child))
                .collect(),
        }
    }

    fn spawn(&self, scene: &mut Scene, parent: Option<Entity>, assets: &AssetConfig) -> Entity {
        let entity = scene.create_entity(&self.name);
        if let Some(parent) = parent {
            if let Err(err) = scene.reparent(entity, Some(parent)) {
                log::warn!("Could not restore parent of '{}': {}", self.name, err);
            }
        }

        scene.world_mut().add_component(entity, self.transform.clone());
        if let Some(camera) = &self.camera {
            scene.world_mut().add_component(entity, camera.clone());
        }
        if let Some(light) = &self.light {
            scene.world_mut().add_component(entity, light.clone());
        }
        if let Some(mesh) = &self.mesh {
            let mut component = match scene.registry_mut().primitive_mesh(mesh.primitive) {
                Some(shared) => MeshComponent::new(mesh.primitive, shared),
                None => MeshComponent::from_primitive(mesh.primitive),
            };
            component.draw_aabb = mesh.draw_aabb;
            scene.world_mut().add_component(entity, component);
        }
        if let Some(material) = &self.material {
            let material = material.resolve(scene.registry_mut(), assets);
            scene.world_mut().add_component(entity, MaterialComponent::new(material));
        }
        if let Some(script) = &self.script {
            scene.world_mut().add_component(entity, script.clone());
        }
        if let Some(particles) = &self.particle_system {
            let mut emitter = particles.emitter.clone();
            emitter.resolve_mesh(scene.registry());
            let texture = particles
                .texture
                .as_ref()
                .and_then(|path| load_or_warn(scene.registry_mut(), path, true, assets));
            emitter.set_particle_texture(texture);
            scene.world_mut().add_component(entity, emitter);
        }

        for child in &self.children {
            child.spawn(scene, Some(entity), assets);
        }
        entity
    }

    fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }
}

impl MaterialDocument {
    fn capture(material: &Material) -> Self {
        let textures = &material.textures;
        Self {
            name: material.name.clone(),
            properties: material.properties.clone(),
            textures: TexturePaths {
                albedo: texture_path(&textures.albedo),
                normal: texture_path(&textures.normal),
                metallic: texture_path(&textures.metallic),
                roughness: texture_path(&textures.roughness),
                ao: texture_path(&textures.ao),
                emissive: texture_path(&textures.emissive),
            },
        }
    }

    fn resolve(&self, registry: &mut ResourceRegistry, assets: &AssetConfig) -> Arc<Material> {
        if self.name == DEFAULT_MATERIAL && self.textures.is_empty() {
            let shared = registry.default_material();
            if shared.properties == self.properties {
                return shared;
            }
        }

        let paths = &self.textures;
        let mut load = |path: &Option<PathBuf>, srgb: bool| {
            path.as_ref().and_then(|p| load_or_warn(registry, p, srgb, assets))
        };
        let textures = MaterialTextures {
            albedo: load(&paths.albedo, true),
            normal: load(&paths.normal, false),
            metallic: load(&paths.metallic, false),
            roughness: load(&paths.roughness, false),
            ao: load(&paths.ao, false),
            emissive: load(&paths.emissive, true),
        };
        Arc::new(Material {
            name: self.name.clone(),
            properties: self.properties.clone(),
            textures,
        })
    }
}

fn load_or_warn(
    registry: &mut ResourceRegistry,
    path: &Path,
    srgb: bool,
    assets: &AssetConfig,
) -> Option<Arc<Texture2D>> {
    match registry.load_texture(path, srgb, assets) {
        Ok(texture) => Some(texture),
        Err(err) => {
            log::warn!("Texture {} could not be loaded: {}", path.display(), err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{LightType, TagComponent};
    use crate::foundation::math::Vec3;
    use crate::scene::EntityTemplate;

    fn sample_scene() -> (Scene, Entity, Entity) {
        let mut scene = Scene::new("Sample");
        let root = scene.create_from_template(EntityTemplate::Primitive);
        let light = scene.create_from_template(EntityTemplate::Light);
        scene.reparent(light, Some(root)).unwrap();
        scene.create_from_template(EntityTemplate::Camera);
        scene.world_mut().get_component_mut::<TransformComponent>(light).unwrap().position = Vec3::new(0.0, 2.0, 0.0);
        (scene, root, light)
    }

    #[test]
    fn test_document_nests_children() {
        let (scene, _, _) = sample_scene();
        let document = SceneDocument::from_scene(&scene);
        assert_eq!(document.name, "Sample");
        assert_eq!(document.entities.len(), 2);
        assert_eq!(document.entity_count(), 3);

        let primitive = &document.entities[0];
        assert_eq!(primitive.mesh.as_ref().unwrap().primitive, PrimitiveType::Cube);
        assert_eq!(primitive.children[0].light.as_ref().unwrap().light_type, LightType::Point);
        assert!(document.entities[1].camera.is_some());
    }

    #[test]
    fn test_save_and_load_restores_tree() {
        let (scene, _, _) = sample_scene();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.ron");
        scene.save_ron(&path).unwrap();

        let loaded = Scene::load_ron(&path, &AssetConfig::default()).unwrap();
        assert_eq!(loaded.name(), "Sample");
        assert_eq!(loaded.entity_count(), 3);

        let walk = loaded.walk_depth_first();
        let names: Vec<_> = walk.iter().map(|(e, _)| loaded.name_of(*e).unwrap()).collect();
        assert_eq!(names, vec!["Primitive", "Light", "Camera"]);
        assert_eq!(walk[1].1, 1);

        let light = walk[1].0;
        let transform = loaded.world().get_component::<TransformComponent>(light).unwrap();
        assert_eq!(transform.position, Vec3::new(0.0, 2.0, 0.0));
        assert!(loaded.world().has_component::<TagComponent>(light));

        let material = loaded.world().get_component::<MaterialComponent>(walk[0].0).unwrap();
        assert!(Arc::ptr_eq(&material.material, &loaded.registry().default_material()));
        assert_eq!(loaded.primary_camera(), Some(walk[2].0));
    }

    #[test]
    fn test_particle_settings_survive_without_particles() {
        let mut scene = Scene::new("Particles");
        let entity = scene.create_entity("Smoke");
        scene
            .add_component_kind(entity, crate::scene::ComponentKind::PARTICLE_SYSTEM)
            .unwrap();
        {
            let emitter = scene.world_mut().get_component_mut::<ParticleSystemComponent>(entity).unwrap();
            emitter.emission_rate = 42.0;
        }
        scene.update(1.0);

        let text = SceneDocument::from_scene(&scene).to_ron().unwrap();
        let loaded = SceneDocument::from_ron(&text)
            .unwrap()
            .instantiate(ResourceRegistry::with_defaults(), &AssetConfig::default());
        let smoke = loaded.find_by_name("smoke")[0];
        let emitter = loaded.world().get_component::<ParticleSystemComponent>(smoke).unwrap();
        assert_eq!(emitter.emission_rate, 42.0);
        assert_eq!(emitter.alive_count(), 0);
        assert_eq!(emitter.mesh().name, crate::assets::DEFAULT_QUAD_MESH);
    }

    #[test]
    fn test_particle_texture_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 200, 0, 255]))
            .save(dir.path().join("spark.png"))
            .unwrap();
        let assets = AssetConfig::default().with_assets_dir(dir.path().to_string_lossy());

        let mut scene = Scene::new("Sparks");
        let entity = scene.create_entity("Sparks");
        scene
            .add_component_kind(entity, crate::scene::ComponentKind::PARTICLE_SYSTEM)
            .unwrap();
        let texture = scene.registry_mut().load_texture("spark.png", true, &assets).unwrap();
        scene
            .world_mut()
            .get_component_mut::<ParticleSystemComponent>(entity)
            .unwrap()
            .set_particle_texture(Some(texture));

        let document = SceneDocument::from_scene(&scene);
        let saved = document.entities[0].particle_system.as_ref().unwrap();
        // the resolved file path is what gets written
        assert_eq!(saved.texture.as_deref(), Some(dir.path().join("spark.png").as_path()));

        let path = dir.path().join("sparks.ron");
        scene.save_ron(&path).unwrap();
        let loaded = Scene::load_ron(&path, &assets).unwrap();
        let sparks = loaded.find_by_name("sparks")[0];
        let emitter = loaded.world().get_component::<ParticleSystemComponent>(sparks).unwrap();
        let texture = emitter.texture().unwrap();
        assert_eq!(texture.name(), "spark.png");
        assert!(texture.properties().srgb);
        assert!(emitter.material().textures.albedo.is_some());
    }

    #[test]
    fn test_missing_texture_is_skipped() {
        let document = SceneDocument::from_ron(
            r#"(
                name: "Broken",
                entities: [(
                    name: "Textured",
                    material: Some((
                        name: "Bricks",
                        textures: (albedo: Some("does/not/exist.png")),
                    )),
                )],
            )"#,
        )
        .unwrap();
        let scene = document.instantiate(ResourceRegistry::with_defaults(), &AssetConfig::default());
        let entity = scene.find_by_name("Textured")[0];
        let material = scene.world().get_component::<MaterialComponent>(entity).unwrap();
        assert_eq!(material.material.name, "Bricks");
        assert!(material.material.textures.albedo.is_none());
    }

    #[test]
    fn test_invalid_document_is_a_parse_error() {
        assert!(matches!(
            SceneDocument::from_ron("not a scene"),
            Err(SerializationError::Parse(_))
        ));
    }
}
