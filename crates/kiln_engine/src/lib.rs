//! # Kiln Engine
//!
//! Headless core of the Kiln 3D scene editor.
//!
//! ## Features
//!
//! - **ECS Scene**: entity tree with tags, transforms, cameras, lights,
//!   meshes, materials, scripts and particle emitters
//! - **Particles**: rate-based emitters drawn as camera-facing billboards
//! - **Editor Camera**: orbit, pan and fly navigation driven by input state
//! - **CPU Resources**: textures, cubemaps, framebuffers and primitive meshes
//! - **Scene Files**: RON save and load through a resource registry
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kiln_engine::prelude::*;
//!
//! let mut scene = Scene::new("Demo");
//! let cube = scene.create_from_template(EntityTemplate::Primitive);
//! scene.add_component_kind(cube, ComponentKind::PARTICLE_SYSTEM).unwrap();
//!
//! let camera = EditorCamera::default();
//! let mut renderer = BillboardRenderer::new();
//! scene.update(1.0 / 60.0);
//! let frame = scene.render_particles(&mut renderer, &camera);
//! println!("{} particle draws", frame.draws.len());
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod core;

pub mod assets;
pub mod config;
pub mod ecs;
pub mod events;
pub mod foundation;
pub mod input;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, ResourceRegistry},
        config::{Config, ConfigError},
        core::config::{AssetConfig, EditorCameraConfig, EditorConfig, EngineConfig, WindowProps},
        ecs::components::{
            CameraComponent, HierarchyComponent, LightComponent, LightType, MaterialComponent, MeshComponent,
            ParticleSystemComponent, ScriptComponent, TagComponent, TransformComponent,
        },
        ecs::{Component, Entity, World},
        events::{Event, EventDispatcher},
        foundation::{
            math::{Mat4, Quat, Transform, Vec2, Vec3, Vec4},
            time::Timer,
        },
        input::{InputState, KeyCode, MouseButton},
        render::{
            Billboard, BillboardRenderer, BillboardType, EditorCamera, Framebuffer, ImageFormat, Material, Mesh,
            PrimitiveType, ProjectionType, SceneCamera, Texture2D,
        },
        scene::{ComponentKind, EntityTemplate, Scene, SceneError},
    };
}
