//! ECS Components module
//!
//! Plain data attached to scene entities. Every entity created through a
//! scene carries a tag, a transform and a hierarchy node; the rest are
//! optional and added from templates or the inspector.

pub mod camera;
pub mod hierarchy;
pub mod lighting;
pub mod material;
pub mod mesh;
pub mod particle_system;
pub mod script;
pub mod tag;
pub mod transform;

pub use camera::CameraComponent;
pub use hierarchy::HierarchyComponent;
pub use lighting::{LightComponent, LightType};
pub use material::MaterialComponent;
pub use mesh::MeshComponent;
pub use particle_system::{
    EmissionArea, EmissionShape, Particle, ParticleFrame, ParticleSystemComponent, SizeRange, VelocityRange,
    DEFAULT_PARTICLE_MATERIAL,
};
pub use script::{ScriptComponent, ScriptLanguage};
pub use tag::TagComponent;
pub use transform::TransformComponent;
