//! Billboard rendering system
//!
//! Camera-facing quads for particles and sprites. [`Billboard`] computes its
//! own model matrix from the camera; [`BillboardRenderer`] queues billboards
//! for a frame and turns them into draw records a backend can execute.

pub mod types;
pub mod orientation;
pub mod renderer;

pub use types::{Billboard, BillboardInstance, BillboardType, QuadVertex};
pub use orientation::{
    calculate_axis_aligned_matrix,
    calculate_screen_aligned_matrix,
    calculate_velocity_aligned_matrix,
    calculate_world_aligned_matrix,
};
pub use renderer::{
    decode_entity_id,
    encode_entity_id,
    BillboardDraw,
    BillboardRenderCommand,
    BillboardRenderer,
    ImmediateBillboardDraw,
    QuadGeometry,
    DEFAULT_ENTITY_ID,
};
