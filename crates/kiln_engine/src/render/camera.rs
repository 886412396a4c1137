//! # Camera System
//!
//! [`Camera`] holds projection parameters and the projection matrix derived
//! from them. [`SceneCamera`] is the serialisable camera attached to scene
//! entities. [`EditorCamera`] is the viewport camera driven by mouse and
//! keyboard: it orbits a focal point, pans, zooms and flies.
//!
//! All matrices follow the right-handed OpenGL convention with depth in
//! `[-1, 1]`.

use serde::{Deserialize, Serialize};

use crate::core::config::EditorCameraConfig;
use crate::events::{Event, EventDispatcher};
use crate::foundation::math::{utils, Mat4, Mat4Ext, Quat, Vec2, Vec3};
use crate::input::{InputState, KeyCode, MouseButton};

/// Projection model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectionType {
    /// Perspective with a vertical field of view
    #[default]
    Perspective,
    /// Orthographic with a vertical size
    Orthographic,
}

/// Projection parameters of a camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Projection model
    pub projection_type: ProjectionType,
    /// Vertical FOV in degrees, or vertical size for orthographic
    pub fov: f32,
    /// Width over height
    pub aspect_ratio: f32,
    /// Near clip distance
    pub near_clip: f32,
    /// Far clip distance
    pub far_clip: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            projection_type: ProjectionType::Perspective,
            fov: 45.0,
            aspect_ratio: 16.0 / 9.0,
            near_clip: 0.1,
            far_clip: 1000.0,
        }
    }
}

/// Camera with cached projection matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    settings: CameraSettings,
    projection: Mat4,
}

impl Camera {
    /// Create a camera and compute its projection
    pub fn new(settings: CameraSettings) -> Self {
        let mut camera = Self {
            settings,
            projection: Mat4::identity(),
        };
        camera.update_projection();
        camera
    }

    /// Perspective camera from a vertical FOV in degrees
    pub fn perspective(fov_degrees: f32, aspect_ratio: f32, near_clip: f32, far_clip: f32) -> Self {
        Self::new(CameraSettings {
            projection_type: ProjectionType::Perspective,
            fov: fov_degrees,
            aspect_ratio,
            near_clip,
            far_clip,
        })
    }

    /// Orthographic camera from a vertical size
    pub fn orthographic(size: f32, aspect_ratio: f32, near_clip: f32, far_clip: f32) -> Self {
        Self::new(CameraSettings {
            projection_type: ProjectionType::Orthographic,
            fov: size,
            aspect_ratio,
            near_clip,
            far_clip,
        })
    }

    /// Projection matrix
    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// Projection parameters
    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Projection model
    pub fn projection_type(&self) -> ProjectionType {
        self.settings.projection_type
    }

    /// Vertical FOV in degrees, or orthographic size
    pub fn fov(&self) -> f32 {
        self.settings.fov
    }

    /// Width over height
    pub fn aspect_ratio(&self) -> f32 {
        self.settings.aspect_ratio
    }

    /// Near clip distance
    pub fn near_clip(&self) -> f32 {
        self.settings.near_clip
    }

    /// Far clip distance
    pub fn far_clip(&self) -> f32 {
        self.settings.far_clip
    }

    /// Switch projection model
    pub fn set_projection_type(&mut self, projection_type: ProjectionType) {
        self.settings.projection_type = projection_type;
        self.update_projection();
    }

    /// Set FOV (or orthographic size)
    pub fn set_fov(&mut self, fov: f32) {
        self.settings.fov = fov;
        self.update_projection();
    }

    /// Set aspect ratio
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.settings.aspect_ratio = aspect_ratio;
        self.update_projection();
    }

    /// Set near clip
    pub fn set_near_clip(&mut self, near_clip: f32) {
        self.settings.near_clip = near_clip;
        self.update_projection();
    }

    /// Set far clip
    pub fn set_far_clip(&mut self, far_clip: f32) {
        self.settings.far_clip = far_clip;
        self.update_projection();
    }

    fn update_projection(&mut self) {
        let s = &self.settings;
        self.projection = match s.projection_type {
            ProjectionType::Perspective => {
                Mat4::perspective(utils::deg_to_rad(s.fov), s.aspect_ratio, s.near_clip, s.far_clip)
            }
            ProjectionType::Orthographic => Mat4::orthographic(s.fov, s.aspect_ratio, s.near_clip, s.far_clip),
        };
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}

/// Camera attached to scene entities
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "CameraSettings", into = "CameraSettings")]
pub struct SceneCamera {
    /// Underlying camera
    pub camera: Camera,
}

impl SceneCamera {
    /// Scene camera with the given settings
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            camera: Camera::new(settings),
        }
    }

    /// Match the viewport aspect; a zero height leaves the aspect unchanged
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.camera.set_aspect_ratio(width as f32 / height as f32);
    }
}

impl From<CameraSettings> for SceneCamera {
    fn from(settings: CameraSettings) -> Self {
        Self::new(settings)
    }
}

impl From<SceneCamera> for CameraSettings {
    fn from(camera: SceneCamera) -> Self {
        *camera.camera.settings()
    }
}

/// Interaction mode of the editor camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraState {
    /// Idle, no input received yet
    #[default]
    None,
    /// Orbiting the focal point
    Orbit,
    /// Free flight with WASDQE
    Fly,
}

/// Viewport camera controlled by mouse and keyboard
#[derive(Debug, Clone)]
pub struct EditorCamera {
    camera: Camera,
    view: Mat4,
    position: Vec3,
    focal_point: Vec3,
    distance: f32,
    pitch: f32,
    yaw: f32,
    speed: f32,
    last_mouse_position: Vec2,
    state: CameraState,
    zoom_factor: f32,
    mouse_sensitivity: f32,
}

impl EditorCamera {
    /// Create an editor camera from the camera configuration
    pub fn new(config: &EditorCameraConfig) -> Self {
        let camera = Camera::perspective(config.fov, config.aspect_ratio, config.near_clip, config.far_clip);
        let mut editor_camera = Self {
            camera,
            view: Mat4::identity(),
            position: Vec3::zeros(),
            focal_point: Vec3::zeros(),
            distance: config.orbit_distance,
            pitch: 0.0,
            yaw: 0.0,
            speed: config.fly_step,
            last_mouse_position: Vec2::zeros(),
            state: CameraState::None,
            zoom_factor: config.zoom_factor,
            mouse_sensitivity: config.mouse_sensitivity,
        };
        editor_camera.update_view();
        editor_camera
    }

    /// Apply one frame of mouse and keyboard input
    pub fn on_update(&mut self, _delta_time: f32, input: &InputState) {
        let mouse = input.mouse_position();
        let delta = (mouse - self.last_mouse_position) * self.mouse_sensitivity;
        self.last_mouse_position = mouse;

        if input.is_mouse_button_pressed(MouseButton::Middle) {
            if input.is_key_pressed(KeyCode::LeftShift) {
                self.mouse_pan(delta);
            } else {
                self.mouse_rotate(delta);
            }
        } else if input.is_mouse_button_pressed(MouseButton::Right) {
            self.state = CameraState::Fly;
            self.fly(delta, input);
        } else {
            self.state = CameraState::Orbit;
        }

        self.update_view();
    }

    /// Handle scroll zoom; never consumes the event
    pub fn on_event(&mut self, event: &Event) -> bool {
        let mut dispatcher = EventDispatcher::new(event);
        dispatcher.dispatch_mouse_scrolled(|_, y_offset| {
            self.mouse_zoom(y_offset * self.zoom_factor);
            self.update_view();
            false
        });
        dispatcher.handled()
    }

    /// Move the orbit focal point
    pub fn set_focus_point(&mut self, focal_point: Vec3) {
        self.focal_point = focal_point;
        self.update_view();
    }

    /// Match the viewport aspect; a zero height is ignored
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.camera.set_aspect_ratio(width as f32 / height as f32);
    }

    /// Camera rotation from pitch and yaw
    pub fn orientation(&self) -> Quat {
        utils::quat_from_euler(Vec3::new(-self.pitch, -self.yaw, 0.0))
    }

    /// View direction
    pub fn forward_direction(&self) -> Vec3 {
        self.orientation() * Vec3::new(0.0, 0.0, -1.0)
    }

    /// Camera right axis
    pub fn right_direction(&self) -> Vec3 {
        self.orientation() * Vec3::new(1.0, 0.0, 0.0)
    }

    /// Camera up axis
    pub fn up_direction(&self) -> Vec3 {
        self.orientation() * Vec3::new(0.0, 1.0, 0.0)
    }

    /// View matrix
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view
    }

    /// Projection matrix
    pub fn projection(&self) -> &Mat4 {
        self.camera.projection()
    }

    /// Projection times view
    pub fn view_projection(&self) -> Mat4 {
        self.camera.projection() * self.view
    }

    /// Underlying projection camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Eye position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Orbit centre
    pub fn focal_point(&self) -> Vec3 {
        self.focal_point
    }

    /// Distance from the focal point
    pub fn orbit_zoom(&self) -> f32 {
        self.distance
    }

    /// Distance moved per fly step
    pub fn fly_speed(&self) -> f32 {
        self.speed
    }

    /// Current interaction mode
    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Pitch in radians
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Yaw in radians
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    fn mouse_rotate(&mut self, delta: Vec2) {
        self.yaw += delta.x;
        self.pitch += delta.y;
    }

    fn mouse_pan(&mut self, delta: Vec2) {
        let scale = self.distance * 0.1;
        self.focal_point += -self.right_direction() * delta.x * scale;
        self.focal_point += self.up_direction() * delta.y * scale;
    }

    fn mouse_zoom(&mut self, delta: f32) {
        match self.state {
            CameraState::Fly => self.position += self.forward_direction() * delta,
            CameraState::Orbit => self.distance = (self.distance - delta).max(1.0),
            CameraState::None => {}
        }
    }

    fn fly(&mut self, mouse_delta: Vec2, input: &InputState) {
        self.mouse_rotate(mouse_delta);

        let forward = self.forward_direction();
        let right = self.right_direction();
        let up = self.up_direction();
        let step = self.speed;

        let moves = [
            (KeyCode::W, forward),
            (KeyCode::S, -forward),
            (KeyCode::A, -right),
            (KeyCode::D, right),
            (KeyCode::Q, -up),
            (KeyCode::E, up),
        ];
        for (key, direction) in moves {
            if input.is_key_pressed(key) {
                self.position += direction * step;
            }
        }

        self.focal_point = self.position + forward * self.distance;
    }

    fn update_view(&mut self) {
        let up = self.up_direction();
        if self.state == CameraState::Fly {
            let target = self.position + self.forward_direction();
            self.view = Mat4::look_at(self.position, target, up);
        } else {
            // idle cameras are placed like orbiting ones so the first frame has a view
            self.position = self.focal_point - self.forward_direction() * self.distance;
            self.view = Mat4::look_at(self.position, self.focal_point, up);
        }
    }
}

impl Default for EditorCamera {
    fn default() -> Self {
        Self::new(&EditorCameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn idle_input() -> InputState {
        InputState::new()
    }

    #[test]
    fn test_default_orbit_position() {
        let camera = EditorCamera::default();
        assert_relative_eq!(camera.position(), Vec3::new(0.0, 0.0, 10.0), epsilon = 1e-5);
        assert_relative_eq!(camera.forward_direction(), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
        assert_eq!(camera.orbit_zoom(), 10.0);
        assert_eq!(camera.fly_speed(), 0.1);
    }

    #[test]
    fn test_scroll_zoom_clamps_distance() {
        let mut camera = EditorCamera::default();
        camera.on_update(0.016, &idle_input());
        assert_eq!(camera.state(), CameraState::Orbit);

        let consumed = camera.on_event(&Event::MouseScrolled { x_offset: 0.0, y_offset: 4.0 });
        assert!(!consumed);
        assert_relative_eq!(camera.orbit_zoom(), 8.0);

        camera.on_event(&Event::MouseScrolled { x_offset: 0.0, y_offset: 100.0 });
        assert_relative_eq!(camera.orbit_zoom(), 1.0);
        assert_relative_eq!(camera.position(), Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_middle_drag_rotates() {
        let mut camera = EditorCamera::default();
        let mut input = InputState::new();
        input.press_mouse_button(MouseButton::Middle);
        input.set_mouse_position(100.0, 50.0);
        camera.on_update(0.016, &input);

        assert_relative_eq!(camera.yaw(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(camera.pitch(), 0.5, epsilon = 1e-6);
        assert_relative_eq!((camera.position() - camera.focal_point()).norm(), 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_shift_middle_drag_pans_focal_point() {
        let mut camera = EditorCamera::default();
        let mut input = InputState::new();
        input.press_mouse_button(MouseButton::Middle);
        input.press_key(KeyCode::LeftShift);
        input.set_mouse_position(10.0, 0.0);
        camera.on_update(0.016, &input);

        // delta.x = 0.1, scaled by distance * 0.1 = 1.0, moved against the right axis
        assert_relative_eq!(camera.focal_point(), Vec3::new(-0.1, 0.0, 0.0), epsilon = 1e-5);
        assert_eq!(camera.yaw(), 0.0);
    }

    #[test]
    fn test_right_drag_flies_forward() {
        let mut camera = EditorCamera::default();
        let mut input = InputState::new();
        input.press_mouse_button(MouseButton::Right);
        input.press_key(KeyCode::W);
        camera.on_update(0.016, &input);

        assert_eq!(camera.state(), CameraState::Fly);
        assert_relative_eq!(camera.position(), Vec3::new(0.0, 0.0, 9.9), epsilon = 1e-5);
        assert_relative_eq!(camera.focal_point(), Vec3::new(0.0, 0.0, -0.1), epsilon = 1e-5);

        camera.on_event(&Event::MouseScrolled { x_offset: 0.0, y_offset: 2.0 });
        assert_relative_eq!(camera.position(), Vec3::new(0.0, 0.0, 8.9), epsilon = 1e-5);
        assert_eq!(camera.orbit_zoom(), 10.0);
    }

    #[test]
    fn test_scene_camera_viewport_and_serde() {
        let mut camera = SceneCamera::default();
        camera.set_viewport_size(800, 400);
        assert_relative_eq!(camera.camera.aspect_ratio(), 2.0);
        camera.set_viewport_size(800, 0);
        assert_relative_eq!(camera.camera.aspect_ratio(), 2.0);

        let text = ron::to_string(&camera).unwrap();
        let restored: SceneCamera = ron::from_str(&text).unwrap();
        assert_eq!(restored, camera);
    }

    #[test]
    fn test_orthographic_projection_uses_size() {
        let camera = Camera::orthographic(10.0, 2.0, 0.1, 100.0);
        let projected = camera.projection().transform_point(&crate::foundation::math::Point3::new(10.0, 5.0, -1.0));
        assert_relative_eq!(projected.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(projected.y, 1.0, epsilon = 1e-5);
    }
}
