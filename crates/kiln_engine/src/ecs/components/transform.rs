//! Transform component for the ECS system
//!
//! Position, rotation and scale relative to the parent entity. Rotation is
//! kept as Euler angles in degrees because that is what the inspector edits;
//! the quaternion is only built when a matrix is needed.

use serde::{Deserialize, Serialize};

use crate::ecs::Component;
use crate::foundation::math::{utils, Mat4, Quat, Transform as MathTransform, Vec3};

/// Local transform of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformComponent {
    /// Translation relative to the parent
    pub position: Vec3,

    /// Euler angles in degrees, X applied first
    pub rotation: Vec3,

    /// Per-axis scale
    pub scale: Vec3,
}

impl Component for TransformComponent {}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl TransformComponent {
    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: Set Euler rotation in degrees
    pub fn with_rotation(mut self, rotation_degrees: Vec3) -> Self {
        self.rotation = rotation_degrees;
        self
    }

    /// Builder pattern: Set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation as a quaternion
    pub fn orientation(&self) -> Quat {
        utils::quat_from_euler_degrees(self.rotation)
    }

    /// Convert to foundation math Transform for calculations
    pub fn to_math_transform(&self) -> MathTransform {
        MathTransform::from_euler_degrees(self.position, self.rotation, self.scale)
    }

    /// Local matrix (T * R * S)
    pub fn local_matrix(&self) -> Mat4 {
        self.to_math_transform().to_matrix()
    }
}
