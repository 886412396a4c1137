//! # Rendering Core
//!
//! CPU-side rendering resources and the billboard pipeline. Nothing here
//! talks to a graphics API; every type produces plain data (texels, vertex
//! buffers, matrices, draw records) that a GPU backend uploads as-is.
//!
//! ## Layout
//!
//! - **Camera**: scene cameras and the orbit/fly editor camera
//! - **Billboard**: camera-facing quads and the per-frame billboard queue
//! - **Texture**: 2D textures and cubemaps decoded with `image`
//! - **Framebuffer**: offscreen targets built from texture attachments
//! - **Mesh / Material**: primitive geometry and PBR material parameters

pub mod billboard;
pub mod camera;
pub mod framebuffer;
pub mod material;
pub mod mesh;
pub mod texture;

pub use billboard::{
    Billboard, BillboardDraw, BillboardInstance, BillboardRenderCommand, BillboardRenderer, BillboardType,
    ImmediateBillboardDraw, QuadGeometry, QuadVertex, DEFAULT_ENTITY_ID,
};
pub use camera::{Camera, CameraSettings, CameraState, EditorCamera, ProjectionType, SceneCamera};
pub use framebuffer::{Framebuffer, FramebufferError, MAX_FRAMEBUFFER_SIZE};
pub use material::{Material, MaterialProperties, MaterialTextures};
pub use mesh::{Aabb, Mesh, PrimitiveMesh, PrimitiveType, Vertex};
pub use texture::{
    CubeFace, Cubemap, FaceData, FilterMode, ImageFormat, Texture2D, TextureData, TextureError, TextureProperties,
    TextureSampling, WrapMode,
};
