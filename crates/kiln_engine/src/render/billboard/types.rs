//! Billboard data structures and types

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::orientation::{
    calculate_axis_aligned_matrix, calculate_screen_aligned_matrix, calculate_velocity_aligned_matrix,
    calculate_world_aligned_matrix,
};
use crate::foundation::math::{Mat4, Vec3, Vec4};
use crate::render::material::Material;

/// Billboard orientation mode
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BillboardType {
    /// Faces the camera using the camera's up vector
    #[default]
    ScreenAligned,

    /// Faces the camera with an orthonormal basis
    WorldAligned,

    /// Rotates around world Y to face the camera
    AxisAligned,

    /// Right axis locked to a direction, rotates around it to face the camera
    VelocityAligned {
        /// Direction to stretch along
        direction: Vec3,
    },
}

impl BillboardType {
    /// Display name used by the inspector
    pub fn label(&self) -> &'static str {
        match self {
            Self::ScreenAligned => "Screen Aligned",
            Self::WorldAligned => "World Aligned",
            Self::AxisAligned => "Axis Aligned",
            Self::VelocityAligned { .. } => "Velocity Aligned",
        }
    }
}

/// A camera-facing quad in world space
#[derive(Debug, Clone)]
pub struct Billboard {
    /// Orientation mode
    pub billboard_type: BillboardType,

    /// World position of the quad centre
    pub position: Vec3,

    /// Per-axis scale of the unit quad
    pub scale: Vec3,

    /// Material to draw with
    pub material: Option<Arc<Material>>,
}

impl Billboard {
    /// Create a unit billboard at the origin
    pub fn new(billboard_type: BillboardType) -> Self {
        Self {
            billboard_type,
            position: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            material: None,
        }
    }

    /// Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Set material
    pub fn with_material(mut self, material: Arc<Material>) -> Self {
        self.material = Some(material);
        self
    }

    /// Model matrix for the current camera
    pub fn calculate_transform(&self, camera_position: Vec3, camera_up: Vec3) -> Mat4 {
        match self.billboard_type {
            BillboardType::ScreenAligned => {
                calculate_screen_aligned_matrix(self.position, self.scale, camera_position, camera_up)
            }
            BillboardType::WorldAligned => {
                calculate_world_aligned_matrix(self.position, self.scale, camera_position, camera_up)
            }
            BillboardType::AxisAligned => calculate_axis_aligned_matrix(self.position, self.scale, camera_position),
            BillboardType::VelocityAligned { direction } => {
                calculate_velocity_aligned_matrix(self.position, self.scale, camera_position, direction)
            }
        }
    }
}

impl Default for Billboard {
    fn default() -> Self {
        Self::new(BillboardType::default())
    }
}

/// Vertex of the shared billboard quad
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    /// Position in quad space
    pub position: [f32; 3],
    /// Texture coordinate
    pub uv: [f32; 2],
}

/// GPU instance data for billboard rendering
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BillboardInstance {
    /// Model-to-world transformation matrix, column major
    pub transform: [[f32; 4]; 4],

    /// RGBA color tint
    pub color: [f32; 4],

    /// Entity id encoded as RGB, alpha unused
    pub entity_color: [f32; 4],
}

impl BillboardInstance {
    /// Pack a model matrix, tint and encoded entity id
    pub fn new(transform: &Mat4, color: Vec4, entity_color: Vec3) -> Self {
        Self {
            transform: (*transform).into(),
            color: color.into(),
            entity_color: [entity_color.x, entity_color.y, entity_color.z, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_dispatches_on_type() {
        let camera = Vec3::new(0.0, 0.0, 5.0);
        let mut billboard = Billboard::new(BillboardType::AxisAligned).with_position(Vec3::new(1.0, 0.0, 0.0));
        let axis = billboard.calculate_transform(camera, Vec3::y());
        assert_eq!(axis, calculate_axis_aligned_matrix(billboard.position, billboard.scale, camera));

        billboard.billboard_type = BillboardType::WorldAligned;
        let world = billboard.calculate_transform(camera, Vec3::y());
        assert_eq!(world, calculate_world_aligned_matrix(billboard.position, billboard.scale, camera, Vec3::y()));
    }

    #[test]
    fn test_instance_is_plain_bytes() {
        let instance = BillboardInstance::new(&Mat4::identity(), Vec4::repeat(1.0), Vec3::new(0.5, 0.0, 0.0));
        let bytes: &[u8] = bytemuck::bytes_of(&instance);
        assert_eq!(bytes.len(), 24 * 4);
        assert_eq!(instance.transform[3][3], 1.0);
    }
}
