//! Camera component

use serde::{Deserialize, Serialize};

use crate::ecs::Component;
use crate::render::camera::SceneCamera;

/// Scene camera attached to an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraComponent {
    /// Projection parameters
    pub camera: SceneCamera,
    /// Whether this camera renders the game view
    pub primary: bool,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            camera: SceneCamera::default(),
            primary: true,
        }
    }
}

impl Component for CameraComponent {}
