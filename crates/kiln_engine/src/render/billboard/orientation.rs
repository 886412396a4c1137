//! Billboard orientation matrix calculations
//!
//! Every function returns `[right * sx | up * sy | normal * sz | position]`,
//! where the normal points from the billboard towards the camera.

use crate::foundation::math::{utils, Mat4, Vec3};

/// Unit direction from the billboard to the camera, +Z when they coincide
fn to_camera(camera_position: Vec3, billboard_position: Vec3) -> Vec3 {
    (camera_position - billboard_position)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vec3::z)
}

fn compose(right: Vec3, up: Vec3, normal: Vec3, position: Vec3, scale: Vec3) -> Mat4 {
    utils::basis_matrix(&(right * scale.x), &(up * scale.y), &(normal * scale.z), &position)
}

/// Screen-aligned billboard
///
/// Uses the camera up vector as-is; `right = up x normal` is not re-normalised,
/// so a camera up that is not perpendicular to the view shears the quad.
pub fn calculate_screen_aligned_matrix(
    position: Vec3,
    scale: Vec3,
    camera_position: Vec3,
    camera_up: Vec3,
) -> Mat4 {
    let normal = to_camera(camera_position, position);
    let up = camera_up;
    let right = up.cross(&normal);
    compose(right, up, normal, position, scale)
}

/// World-aligned billboard with an orthonormal basis facing the camera
pub fn calculate_world_aligned_matrix(
    position: Vec3,
    scale: Vec3,
    camera_position: Vec3,
    camera_up: Vec3,
) -> Mat4 {
    let normal = to_camera(camera_position, position);
    let right = camera_up
        .cross(&normal)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vec3::x);
    let up = normal.cross(&right);
    compose(right, up, normal, position, scale)
}

/// Billboard that turns around world Y only
pub fn calculate_axis_aligned_matrix(position: Vec3, scale: Vec3, camera_position: Vec3) -> Mat4 {
    let mut flat = camera_position - position;
    flat.y = 0.0;
    let normal = flat.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::z);
    let up = Vec3::y();
    let right = up.cross(&normal);
    compose(right, up, normal, position, scale)
}

/// Billboard stretched along a direction while facing the camera
///
/// The right axis follows `direction`, giving streaks for fast particles.
pub fn calculate_velocity_aligned_matrix(
    position: Vec3,
    scale: Vec3,
    camera_position: Vec3,
    direction: Vec3,
) -> Mat4 {
    let right = direction.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::x);
    let view = to_camera(camera_position, position);
    let up = view.cross(&right).try_normalize(f32::EPSILON).unwrap_or_else(Vec3::y);
    let normal = right.cross(&up);
    compose(right, up, normal, position, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn column(matrix: &Mat4, index: usize) -> Vec3 {
        Vec3::new(matrix[(0, index)], matrix[(1, index)], matrix[(2, index)])
    }

    #[test]
    fn test_screen_aligned_faces_camera() {
        let matrix = calculate_screen_aligned_matrix(
            Vec3::zeros(),
            Vec3::new(2.0, 3.0, 1.0),
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::y(),
        );
        assert_relative_eq!(column(&matrix, 0), Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(column(&matrix, 1), Vec3::new(0.0, 3.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(column(&matrix, 2), Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
        assert_eq!(matrix[(3, 3)], 1.0);
    }

    #[test]
    fn test_screen_aligned_keeps_skewed_up() {
        // camera up tilted towards the view: right is shorter than unit length
        let up = Vec3::new(0.0, 1.0, 1.0).normalize();
        let matrix = calculate_screen_aligned_matrix(Vec3::zeros(), Vec3::repeat(1.0), Vec3::new(0.0, 0.0, 5.0), up);
        assert_relative_eq!(column(&matrix, 0).norm(), up.y, epsilon = 1e-6);
        assert_relative_eq!(column(&matrix, 1), up, epsilon = 1e-6);
    }

    #[test]
    fn test_world_aligned_is_orthonormal() {
        let up = Vec3::new(0.0, 1.0, 1.0).normalize();
        let matrix =
            calculate_world_aligned_matrix(Vec3::new(1.0, 2.0, 3.0), Vec3::repeat(1.0), Vec3::new(4.0, 6.0, 8.0), up);
        let (r, u, n) = (column(&matrix, 0), column(&matrix, 1), column(&matrix, 2));
        assert_relative_eq!(r.norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(u.norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(r.dot(&u), 0.0, epsilon = 1e-5);
        assert_relative_eq!(u.dot(&n), 0.0, epsilon = 1e-5);
        assert_relative_eq!(column(&matrix, 3), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_axis_aligned_ignores_camera_height() {
        let matrix = calculate_axis_aligned_matrix(Vec3::zeros(), Vec3::new(1.0, 2.0, 1.0), Vec3::new(3.0, 50.0, 0.0));
        assert_relative_eq!(column(&matrix, 1), Vec3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(column(&matrix, 2), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(column(&matrix, 0), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_velocity_aligned_follows_direction() {
        let matrix = calculate_velocity_aligned_matrix(
            Vec3::zeros(),
            Vec3::repeat(1.0),
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 3.0),
        );
        assert_relative_eq!(column(&matrix, 0), Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
        // the quad normal still points at the camera
        assert!(column(&matrix, 2).dot(&Vec3::x()) > 0.99);
    }
}
