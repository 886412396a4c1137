//! Math utilities and types
//!
//! Provides the vector, matrix and quaternion aliases used across the engine,
//! plus the handful of camera and billboard matrix helpers the renderer needs.
//! All matrices follow the right-handed, Y-up, OpenGL clip-space convention.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform from position, Euler rotation in degrees, and scale
    pub fn from_euler_degrees(position: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation: utils::quat_from_euler_degrees(rotation_degrees),
            scale,
        }
    }

    /// Convert to a transformation matrix (T * R * S)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Point3) -> Point3 {
        self.to_matrix().transform_point(&point)
    }
}

/// Math constants
pub mod constants {
    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / std::f32::consts::PI;

    /// World up axis
    pub const WORLD_UP: [f32; 3] = [0.0, 1.0, 0.0];
}

/// Math utility functions
pub mod utils {
    use super::{constants, Mat3, Mat4, Quat, Vec3, Vec4};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Component-wise linear interpolation between two vectors
    pub fn lerp_vec3(a: &Vec3, b: &Vec3, t: f32) -> Vec3 {
        a + (b - a) * t
    }

    /// World up axis as a vector
    pub fn world_up() -> Vec3 {
        Vec3::from(constants::WORLD_UP)
    }

    /// Build a quaternion from Euler angles in radians (pitch about X, yaw about Y, roll about Z).
    ///
    /// Equivalent to `Rz * Ry * Rx`, so X is applied first.
    pub fn quat_from_euler(euler: Vec3) -> Quat {
        Quat::from_euler_angles(euler.x, euler.y, euler.z)
    }

    /// Build a quaternion from Euler angles in degrees
    pub fn quat_from_euler_degrees(euler_degrees: Vec3) -> Quat {
        quat_from_euler(euler_degrees.map(deg_to_rad))
    }

    /// Extend a direction to a homogeneous column
    pub fn direction4(v: &Vec3) -> Vec4 {
        Vec4::new(v.x, v.y, v.z, 0.0)
    }

    /// Extend a position to a homogeneous column
    pub fn point4(v: &Vec3) -> Vec4 {
        Vec4::new(v.x, v.y, v.z, 1.0)
    }

    /// Build a matrix from three basis columns and a translation column
    pub fn basis_matrix(x_axis: &Vec3, y_axis: &Vec3, z_axis: &Vec3, translation: &Vec3) -> Mat4 {
        Mat4::from_columns(&[
            direction4(x_axis),
            direction4(y_axis),
            direction4(z_axis),
            point4(translation),
        ])
    }

    /// Inverse-transpose of the upper 3x3 block, identity when singular
    pub fn normal_matrix(model: &Mat4) -> Mat3 {
        let upper: Mat3 = model.fixed_view::<3, 3>(0, 0).into_owned();
        upper
            .try_inverse()
            .map_or_else(Mat3::identity, |inverse| inverse.transpose())
    }

    /// Translation column of an affine matrix
    pub fn translation_of(matrix: &Mat4) -> Vec3 {
        Vec3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)])
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Right-handed perspective projection, depth mapped to [-1, 1]
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Right-handed orthographic projection centred on the view axis
    fn orthographic(height: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn orthographic(height: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let half_height = height * 0.5;
        let half_width = half_height * aspect;
        Mat4::new_orthographic(-half_width, half_width, -half_height, half_height, near, far)
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }
}
