//! Particle system for updating emitters and collecting their billboards

use crate::ecs::components::hierarchy;
use crate::ecs::components::{ParticleFrame, ParticleSystemComponent};
use crate::ecs::{Entity, World};
use crate::foundation::math::{utils, Mat4, Vec3};
use crate::render::billboard::BillboardRenderer;

/// System driving every [`ParticleSystemComponent`] in a world
#[derive(Debug, Default)]
pub struct ParticleSystem {
    /// Instance transforms from the last render, all emitters concatenated
    instance_transforms: Vec<Mat4>,
}

impl ParticleSystem {
    /// Create a new particle system
    pub fn new() -> Self {
        Self::default()
    }

    /// Move emitters to their entities and step every simulation
    pub fn update(&mut self, world: &mut World, delta_time: f32) {
        let entities = world.entities_with::<ParticleSystemComponent>();
        for entity in entities {
            self.update_emitter(world, entity, delta_time);
        }
    }

    fn update_emitter(&mut self, world: &mut World, entity: Entity, delta_time: f32) {
        let origin = utils::translation_of(&hierarchy::world_matrix(world, entity));
        let Some(emitter) = world.get_component_mut::<ParticleSystemComponent>(entity) else {
            return;
        };
        emitter.global_emitter_position = origin + emitter.local_emitter_position;
        emitter.update(delta_time);
    }

    /// Render every emitter, one billboard scene each
    pub fn render(
        &mut self,
        world: &World,
        renderer: &mut BillboardRenderer,
        view_projection: Mat4,
        camera_position: Vec3,
        camera_up: Vec3,
    ) -> Vec<ParticleFrame> {
        self.instance_transforms.clear();
        let mut frames = Vec::new();
        for (_, emitter) in world.query::<ParticleSystemComponent>() {
            let frame = emitter.render(renderer, view_projection, camera_position, camera_up);
            self.instance_transforms.extend_from_slice(&frame.instance_transforms);
            frames.push(frame);
        }
        frames
    }

    /// Instance transforms gathered by the last render
    pub fn instance_transforms(&self) -> &[Mat4] {
        &self.instance_transforms
    }

    /// Live particles across every emitter
    pub fn particle_count(world: &World) -> usize {
        world
            .query::<ParticleSystemComponent>()
            .map(|(_, emitter)| emitter.particles().len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ResourceRegistry;
    use crate::ecs::components::{HierarchyComponent, TransformComponent};
    use approx::assert_relative_eq;

    #[test]
    fn test_emitter_follows_entity() {
        let mut world = World::new();
        let parent = world.create_entity();
        let entity = world.create_entity();
        for e in [parent, entity] {
            world.add_component(e, HierarchyComponent::default());
        }
        hierarchy::attach(&mut world, entity, parent);
        world.add_component(parent, TransformComponent::from_position(Vec3::new(0.0, 5.0, 0.0)));
        world.add_component(entity, TransformComponent::from_position(Vec3::new(1.0, 0.0, 0.0)));

        let mut emitter = ParticleSystemComponent::new(&ResourceRegistry::with_defaults()).with_seed(1);
        emitter.local_emitter_position = Vec3::new(0.0, 0.0, 2.0);
        world.add_component(entity, emitter);

        let mut system = ParticleSystem::new();
        system.update(&mut world, 0.5);

        let emitter = world.get_component::<ParticleSystemComponent>(entity).unwrap();
        assert_relative_eq!(emitter.global_emitter_position, Vec3::new(1.0, 5.0, 2.0));
        assert_eq!(ParticleSystem::particle_count(&world), 5);

        let mut renderer = BillboardRenderer::new();
        let frames = system.render(&world, &mut renderer, Mat4::identity(), Vec3::new(0.0, 0.0, 10.0), Vec3::y());
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].draws.len(), 5);
        assert_eq!(system.instance_transforms().len(), 5);
    }
}
