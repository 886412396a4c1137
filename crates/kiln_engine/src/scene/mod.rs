//! Scene management
//!
//! A [`Scene`] is the editable entity tree: it creates and destroys
//! entities, keeps the parent/child links consistent, adds and removes
//! components by [`ComponentKind`] and drives particle emitters. Scenes
//! save to and load from RON through [`SceneDocument`].
//!
//! ```text
//! Scene
//!  ├── World (entities + components)
//!  ├── ResourceRegistry (shared meshes, materials, textures)
//!  └── ParticleSystem
//! ```

mod scene_graph;
mod serialization;
mod template;

pub use scene_graph::{Scene, SceneError};
pub use serialization::{
    EntityDocument, MaterialDocument, MeshDocument, ParticleDocument, SceneDocument, SerializationError, TexturePaths,
};
pub use template::{ComponentKind, EntityTemplate};
