//! Lighting component for ECS
//!
//! Lights take their position and direction from the entity transform, so
//! the component only carries the photometric parameters.

use serde::{Deserialize, Serialize};

use crate::ecs::Component;
use crate::foundation::math::Vec3;

/// Types of lights supported by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LightType {
    /// Directional light (like sunlight) with parallel rays
    #[default]
    Directional,
    /// Point light that radiates in all directions from a position
    Point,
    /// Spot light that creates a cone of light from a position
    Spot,
}

impl LightType {
    /// Every light type in inspector order
    pub const ALL: [LightType; 3] = [Self::Directional, Self::Point, Self::Spot];

    /// Display name used by the inspector
    pub fn label(self) -> &'static str {
        match self {
            Self::Directional => "Directional",
            Self::Point => "Point",
            Self::Spot => "Spot",
        }
    }

    /// Whether the light has a finite range
    pub fn has_range(self) -> bool {
        matches!(self, Self::Point | Self::Spot)
    }

    /// Whether the light exposes an attenuation factor
    pub fn has_attenuation(self) -> bool {
        self == Self::Point
    }
}

/// Light attached to an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightComponent {
    /// The type of light (directional, point, or spot)
    pub light_type: LightType,
    /// Linear RGB colour (0.0 to 1.0 range)
    pub color: Vec3,
    /// Light intensity multiplier
    pub intensity: f32,
    /// Maximum distance for point/spot lights
    pub range: f32,
    /// Falloff factor for point lights
    pub attenuation: f32,
}

impl Default for LightComponent {
    fn default() -> Self {
        Self {
            light_type: LightType::Directional,
            color: Vec3::repeat(150.0 / 255.0),
            intensity: 1.0,
            range: 5.0,
            attenuation: 1.0,
        }
    }
}

impl Component for LightComponent {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_visibility_by_type() {
        assert!(!LightType::Directional.has_range());
        assert!(LightType::Spot.has_range());
        assert!(!LightType::Spot.has_attenuation());
        assert!(LightType::Point.has_attenuation());
    }
}
