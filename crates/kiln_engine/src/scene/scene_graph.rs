//! Scene: the entity tree the editor works on
//!
//! A [`Scene`] owns the ECS [`World`], the resource registry new components
//! draw shared meshes and materials from, and the particle system. Every
//! entity it creates carries a tag, a transform and a hierarchy node, and
//! all tree edits go through it so the sibling links stay consistent.

use std::path::Path;

use thiserror::Error;

use super::serialization::{SceneDocument, SerializationError};
use super::template::{ComponentKind, EntityTemplate};
use crate::assets::ResourceRegistry;
use crate::core::config::AssetConfig;
use crate::ecs::components::hierarchy;
use crate::ecs::components::{
    CameraComponent, HierarchyComponent, LightComponent, LightType, MaterialComponent, MeshComponent, ParticleFrame,
    ParticleSystemComponent, ScriptComponent, TagComponent, TransformComponent,
};
use crate::ecs::systems::ParticleSystem;
use crate::ecs::{Component, Entity, World};
use crate::foundation::math::Mat4;
use crate::render::billboard::BillboardRenderer;
use crate::render::camera::EditorCamera;
use crate::render::mesh::PrimitiveType;

/// Scene editing errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// Entity is not alive in this scene
    #[error("Entity {0:?} not found")]
    EntityNotFound(Entity),

    /// Reparenting would make an entity its own ancestor
    #[error("Cannot parent {child:?} under {parent:?}: it would create a cycle")]
    CyclicHierarchy {
        /// Entity being moved
        child: Entity,
        /// Requested parent
        parent: Entity,
    },

    /// Tag, transform and hierarchy cannot be removed
    #[error("{0:?} is required on every entity")]
    RequiredComponent(ComponentKind),

    /// Saving or loading failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),
}

/// Entity tree with shared resources and particle simulation
pub struct Scene {
    name: String,
    world: World,
    registry: ResourceRegistry,
    particle_system: ParticleSystem,
}

impl Scene {
    /// Empty scene with the default resources registered
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_registry(name, ResourceRegistry::with_defaults())
    }

    /// Empty scene drawing resources from `registry`
    pub fn with_registry(name: impl Into<String>, registry: ResourceRegistry) -> Self {
        Self {
            name: name.into(),
            world: World::new(),
            registry,
            particle_system: ParticleSystem::new(),
        }
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the scene
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Underlying ECS world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable ECS world, for editing component fields in place
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Shared resources
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Mutable shared resources
    pub fn registry_mut(&mut self) -> &mut ResourceRegistry {
        &mut self.registry
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.world.entity_count()
    }

    /// Whether `entity` belongs to this scene
    pub fn contains(&self, entity: Entity) -> bool {
        self.world.is_alive(entity)
    }

    /// Create a root entity with a tag, transform and hierarchy node
    pub fn create_entity(&mut self, name: &str) -> Entity {
        let entity = self.world.create_entity();
        self.world.add_component(entity, TagComponent::new(name));
        self.world.add_component(entity, TransformComponent::default());
        self.world.add_component(entity, HierarchyComponent::default());
        log::debug!("Created entity '{}'", self.name_of(entity).unwrap_or_default());
        entity
    }

    /// Create an entity from a menu template
    pub fn create_from_template(&mut self, template: EntityTemplate) -> Entity {
        let entity = self.create_entity(template.entity_name());
        match template {
            EntityTemplate::Empty => {}
            EntityTemplate::Camera => {
                self.world.add_component(entity, CameraComponent::default());
            }
            EntityTemplate::Primitive => {
                let mesh = self.default_mesh();
                self.world.add_component(entity, mesh);
                self.world
                    .add_component(entity, MaterialComponent::new(self.registry.default_material()));
            }
            EntityTemplate::Light => {
                let light = LightComponent {
                    light_type: LightType::Point,
                    ..Default::default()
                };
                self.world.add_component(entity, light);
            }
        }
        entity
    }

    /// Destroy an entity together with its whole subtree
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<(), SceneError> {
        self.ensure_alive(entity)?;
        let subtree = self.subtree(entity);
        hierarchy::detach(&mut self.world, entity);
        for (doomed, _) in &subtree {
            self.world.destroy_entity(*doomed);
        }
        log::debug!("Destroyed {} entit(y/ies)", subtree.len());
        Ok(())
    }

    /// Move `child` under `new_parent`, or to the root when `None`
    ///
    /// The child is appended as the last sibling.
    pub fn reparent(&mut self, child: Entity, new_parent: Option<Entity>) -> Result<(), SceneError> {
        self.ensure_alive(child)?;
        if let Some(parent) = new_parent {
            self.ensure_alive(parent)?;
            if hierarchy::is_ancestor_or_self(&self.world, child, parent) {
                return Err(SceneError::CyclicHierarchy { child, parent });
            }
        }

        hierarchy::detach(&mut self.world, child);
        if let Some(parent) = new_parent {
            hierarchy::attach(&mut self.world, child, parent);
        }
        Ok(())
    }

    /// Entities without a parent, in creation order
    pub fn roots(&self) -> Vec<Entity> {
        self.world
            .entities()
            .filter(|entity| self.parent(*entity).is_none())
            .collect()
    }

    /// Children in sibling order
    pub fn children(&self, entity: Entity) -> Vec<Entity> {
        hierarchy::children(&self.world, entity)
    }

    /// Parent entity
    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.world
            .get_component::<HierarchyComponent>(entity)
            .and_then(|node| node.parent)
    }

    /// Every entity with its depth, parents before children
    pub fn walk_depth_first(&self) -> Vec<(Entity, usize)> {
        let mut result = Vec::with_capacity(self.entity_count());
        for root in self.roots() {
            self.collect_subtree(root, 0, &mut result);
        }
        result
    }

    /// Composed transform from the root down to `entity`
    pub fn world_matrix(&self, entity: Entity) -> Mat4 {
        hierarchy::world_matrix(&self.world, entity)
    }

    /// Display name
    pub fn name_of(&self, entity: Entity) -> Option<&str> {
        self.world
            .get_component::<TagComponent>(entity)
            .map(|tag| tag.tag.as_str())
    }

    /// Change the display name
    pub fn rename(&mut self, entity: Entity, name: &str) -> Result<(), SceneError> {
        let tag = self
            .world
            .get_component_mut::<TagComponent>(entity)
            .ok_or(SceneError::EntityNotFound(entity))?;
        tag.tag = name.to_string();
        Ok(())
    }

    /// Entities whose name contains `filter`, ignoring case, in tree order
    pub fn find_by_name(&self, filter: &str) -> Vec<Entity> {
        let needle = filter.to_lowercase();
        self.walk_depth_first()
            .into_iter()
            .map(|(entity, _)| entity)
            .filter(|entity| {
                self.name_of(*entity)
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Component kinds present on an entity
    pub fn component_kinds(&self, entity: Entity) -> ComponentKind {
        let mut kinds = ComponentKind::empty();
        let mut mark = |kind: ComponentKind, present: bool| kinds.set(kind, present);
        mark(ComponentKind::TAG, self.world.has_component::<TagComponent>(entity));
        mark(ComponentKind::TRANSFORM, self.world.has_component::<TransformComponent>(entity));
        mark(ComponentKind::HIERARCHY, self.world.has_component::<HierarchyComponent>(entity));
        mark(ComponentKind::CAMERA, self.world.has_component::<CameraComponent>(entity));
        mark(ComponentKind::LIGHT, self.world.has_component::<LightComponent>(entity));
        mark(ComponentKind::MESH, self.world.has_component::<MeshComponent>(entity));
        mark(ComponentKind::MATERIAL, self.world.has_component::<MaterialComponent>(entity));
        mark(ComponentKind::SCRIPT, self.world.has_component::<ScriptComponent>(entity));
        mark(
            ComponentKind::PARTICLE_SYSTEM,
            self.world.has_component::<ParticleSystemComponent>(entity),
        );
        kinds
    }

    /// Add default components for every kind the entity lacks
    ///
    /// Returns whether anything was added.
    pub fn add_component_kind(&mut self, entity: Entity, kind: ComponentKind) -> Result<bool, SceneError> {
        self.ensure_alive(entity)?;
        let missing = kind - self.component_kinds(entity);
        for single in missing.iter() {
            self.add_default_component(entity, single);
            log::info!(
                "{} added to entity '{}'",
                single.label().unwrap_or("Component"),
                self.name_of(entity).unwrap_or_default()
            );
        }
        Ok(!missing.is_empty())
    }

    /// Remove components of the given kinds
    ///
    /// Returns whether anything was removed.
    pub fn remove_component_kind(&mut self, entity: Entity, kind: ComponentKind) -> Result<bool, SceneError> {
        self.ensure_alive(entity)?;
        if kind.intersects(ComponentKind::REQUIRED) {
            return Err(SceneError::RequiredComponent(kind & ComponentKind::REQUIRED));
        }
        let present = kind & self.component_kinds(entity);
        for single in present.iter() {
            self.remove_component(entity, single);
        }
        Ok(!present.is_empty())
    }

    /// Step every particle emitter
    pub fn update(&mut self, delta_time: f32) {
        self.particle_system.update(&mut self.world, delta_time);
    }

    /// Draw every emitter's particles from the editor camera's point of view
    ///
    /// Draws and instance transforms of all emitters are concatenated.
    pub fn render_particles(&mut self, renderer: &mut BillboardRenderer, camera: &EditorCamera) -> ParticleFrame {
        let frames = self.particle_system.render(
            &self.world,
            renderer,
            camera.view_projection(),
            camera.position(),
            camera.up_direction(),
        );
        frames.into_iter().fold(ParticleFrame::default(), |mut all, frame| {
            all.draws.extend(frame.draws);
            all.instance_transforms.extend(frame.instance_transforms);
            all
        })
    }

    /// First entity whose camera is marked primary
    pub fn primary_camera(&self) -> Option<Entity> {
        self.world
            .query::<CameraComponent>()
            .find(|(_, camera)| camera.primary)
            .map(|(entity, _)| entity)
    }

    /// Write the scene as RON
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        SceneDocument::from_scene(self).save_ron(path)?;
        Ok(())
    }

    /// Read a RON scene, loading textures relative to the asset root
    pub fn load_ron(path: impl AsRef<Path>, assets: &AssetConfig) -> Result<Self, SceneError> {
        let document = SceneDocument::load_ron(path)?;
        Ok(document.instantiate(ResourceRegistry::with_defaults(), assets))
    }

    /// Drop every entity
    pub fn clear(&mut self) {
        self.world.clear();
    }

    fn ensure_alive(&self, entity: Entity) -> Result<(), SceneError> {
        if self.world.is_alive(entity) {
            Ok(())
        } else {
            Err(SceneError::EntityNotFound(entity))
        }
    }

    fn subtree(&self, entity: Entity) -> Vec<(Entity, usize)> {
        let mut result = Vec::new();
        self.collect_subtree(entity, 0, &mut result);
        result
    }

    fn collect_subtree(&self, entity: Entity, depth: usize, out: &mut Vec<(Entity, usize)>) {
        out.push((entity, depth));
        for child in self.children(entity) {
            self.collect_subtree(child, depth + 1, out);
        }
    }

    fn default_mesh(&mut self) -> MeshComponent {
        match self.registry.primitive_mesh(PrimitiveType::Cube) {
            Some(mesh) => MeshComponent::new(PrimitiveType::Cube, mesh),
            None => MeshComponent::default(),
        }
    }

    fn add_default_component(&mut self, entity: Entity, kind: ComponentKind) {
        if kind == ComponentKind::TAG {
            self.world.add_component(entity, TagComponent::default());
        } else if kind == ComponentKind::TRANSFORM {
            self.world.add_component(entity, TransformComponent::default());
        } else if kind == ComponentKind::HIERARCHY {
            self.world.add_component(entity, HierarchyComponent::default());
        } else if kind == ComponentKind::CAMERA {
            self.world.add_component(entity, CameraComponent::default());
        } else if kind == ComponentKind::LIGHT {
            self.world.add_component(entity, LightComponent::default());
        } else if kind == ComponentKind::MESH {
            let mesh = self.default_mesh();
            self.world.add_component(entity, mesh);
        } else if kind == ComponentKind::MATERIAL {
            let material = MaterialComponent::new(self.registry.default_material());
            self.world.add_component(entity, material);
        } else if kind == ComponentKind::SCRIPT {
            self.world.add_component(entity, ScriptComponent::default());
        } else if kind == ComponentKind::PARTICLE_SYSTEM {
            let emitter = ParticleSystemComponent::new(&self.registry);
            self.world.add_component(entity, emitter);
        }
    }

    fn remove_component(&mut self, entity: Entity, kind: ComponentKind) {
        fn remove<T: Component>(world: &mut World, entity: Entity) {
            world.remove_component::<T>(entity);
        }
        if kind == ComponentKind::CAMERA {
            remove::<CameraComponent>(&mut self.world, entity);
        } else if kind == ComponentKind::LIGHT {
            remove::<LightComponent>(&mut self.world, entity);
        } else if kind == ComponentKind::MESH {
            remove::<MeshComponent>(&mut self.world, entity);
        } else if kind == ComponentKind::MATERIAL {
            remove::<MaterialComponent>(&mut self.world, entity);
        } else if kind == ComponentKind::SCRIPT {
            remove::<ScriptComponent>(&mut self.world, entity);
        } else if kind == ComponentKind::PARTICLE_SYSTEM {
            remove::<ParticleSystemComponent>(&mut self.world, entity);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    fn tree() -> (Scene, Entity, Entity, Entity) {
        let mut scene = Scene::default();
        let root = scene.create_entity("Root");
        let a = scene.create_entity("Arm");
        let b = scene.create_entity("Hand");
        scene.reparent(a, Some(root)).unwrap();
        scene.reparent(b, Some(a)).unwrap();
        (scene, root, a, b)
    }

    #[test]
    fn test_create_entity_has_required_components() {
        let mut scene = Scene::default();
        let entity = scene.create_entity("");
        assert_eq!(scene.name_of(entity), Some("Entity"));
        assert_eq!(scene.component_kinds(entity), ComponentKind::REQUIRED);
        assert_eq!(scene.roots(), vec![entity]);
    }

    #[test]
    fn test_walk_depth_first() {
        let (mut scene, root, a, b) = tree();
        let other = scene.create_entity("Other");
        assert_eq!(scene.walk_depth_first(), vec![(root, 0), (a, 1), (b, 2), (other, 0)]);
        assert_eq!(scene.parent(b), Some(a));
        assert_eq!(scene.roots(), vec![root, other]);
    }

    #[test]
    fn test_reparent_rejects_cycles_and_dead_entities() {
        let (mut scene, root, a, b) = tree();
        assert!(matches!(
            scene.reparent(root, Some(b)),
            Err(SceneError::CyclicHierarchy { .. })
        ));
        assert!(matches!(scene.reparent(a, Some(a)), Err(SceneError::CyclicHierarchy { .. })));

        scene.reparent(b, None).unwrap();
        assert_eq!(scene.roots(), vec![root, b]);
        scene.destroy_entity(a).unwrap();
        assert!(matches!(scene.reparent(b, Some(a)), Err(SceneError::EntityNotFound(_))));
    }

    #[test]
    fn test_destroy_removes_subtree_and_unlinks() {
        let (mut scene, root, a, b) = tree();
        let sibling = scene.create_entity("Sibling");
        scene.reparent(sibling, Some(root)).unwrap();

        scene.destroy_entity(a).unwrap();
        assert!(!scene.contains(a));
        assert!(!scene.contains(b));
        assert_eq!(scene.children(root), vec![sibling]);
        assert_eq!(scene.world().get_component::<HierarchyComponent>(root).unwrap().children, 1);
        assert!(scene.destroy_entity(a).is_err());
    }

    #[test]
    fn test_world_matrix_composes_parents() {
        let (mut scene, root, a, _) = tree();
        scene.world_mut().get_component_mut::<TransformComponent>(root).unwrap().position = Vec3::new(1.0, 0.0, 0.0);
        scene.world_mut().get_component_mut::<TransformComponent>(a).unwrap().scale = Vec3::repeat(2.0);
        let matrix = scene.world_matrix(a);
        assert_relative_eq!(matrix[(0, 0)], 2.0);
        assert_relative_eq!(matrix[(0, 3)], 1.0);
    }

    #[test]
    fn test_find_by_name_ignores_case() {
        let (scene, _, a, b) = tree();
        assert_eq!(scene.find_by_name("HAND"), vec![b]);
        assert_eq!(scene.find_by_name("ar"), vec![a]);
        assert_eq!(scene.find_by_name("").len(), 3);
    }

    #[test]
    fn test_templates() {
        let mut scene = Scene::default();
        let camera = scene.create_from_template(EntityTemplate::Camera);
        let primitive = scene.create_from_template(EntityTemplate::Primitive);
        let light = scene.create_from_template(EntityTemplate::Light);

        assert_eq!(scene.primary_camera(), Some(camera));
        let mesh = scene.world().get_component::<MeshComponent>(primitive).unwrap();
        assert_eq!(mesh.primitive, PrimitiveType::Cube);
        let material = scene.world().get_component::<MaterialComponent>(primitive).unwrap();
        assert_eq!(material.material.name, "Default Material");
        let light = scene.world().get_component::<LightComponent>(light).unwrap();
        assert_eq!(light.light_type, LightType::Point);
        assert_eq!(scene.name_of(primitive), Some("Primitive"));
    }

    #[test]
    fn test_add_and_remove_component_kinds() {
        let mut scene = Scene::default();
        let entity = scene.create_entity("Emitter");

        assert!(scene.add_component_kind(entity, ComponentKind::PARTICLE_SYSTEM).unwrap());
        assert!(!scene.add_component_kind(entity, ComponentKind::PARTICLE_SYSTEM).unwrap());
        assert!(scene.component_kinds(entity).contains(ComponentKind::PARTICLE_SYSTEM));

        assert!(matches!(
            scene.remove_component_kind(entity, ComponentKind::TRANSFORM),
            Err(SceneError::RequiredComponent(_))
        ));
        assert!(scene.remove_component_kind(entity, ComponentKind::PARTICLE_SYSTEM).unwrap());
        assert!(!scene.remove_component_kind(entity, ComponentKind::LIGHT).unwrap());
    }

    #[test]
    fn test_update_and_render_particles() {
        let mut scene = Scene::default();
        let entity = scene.create_entity("Fountain");
        scene.add_component_kind(entity, ComponentKind::PARTICLE_SYSTEM).unwrap();
        scene.world_mut().get_component_mut::<TransformComponent>(entity).unwrap().position = Vec3::new(0.0, 3.0, 0.0);

        scene.update(0.5);
        let emitter = scene.world().get_component::<ParticleSystemComponent>(entity).unwrap();
        assert_eq!(emitter.alive_count(), 5);
        assert_relative_eq!(emitter.global_emitter_position, Vec3::new(0.0, 3.0, 0.0));

        let mut renderer = BillboardRenderer::new();
        let camera = EditorCamera::default();
        let frame = scene.render_particles(&mut renderer, &camera);
        assert_eq!(frame.draws.len(), 5);
        assert_eq!(frame.instance_transforms.len(), 5);
    }
}
