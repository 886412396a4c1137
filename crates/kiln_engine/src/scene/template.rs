//! Entity templates and component kinds
//!
//! [`ComponentKind`] names component types as flags so the inspector can ask
//! which components an entity has and offer the rest. [`EntityTemplate`] is
//! the "Add Entity" menu.

use bitflags::bitflags;

bitflags! {
    /// Set of component types
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ComponentKind: u32 {
        /// Display name
        const TAG = 1 << 0;
        /// Local transform
        const TRANSFORM = 1 << 1;
        /// Scene tree links
        const HIERARCHY = 1 << 2;
        /// Scene camera
        const CAMERA = 1 << 3;
        /// Light source
        const LIGHT = 1 << 4;
        /// Geometry
        const MESH = 1 << 5;
        /// Surface material
        const MATERIAL = 1 << 6;
        /// Script attachment
        const SCRIPT = 1 << 7;
        /// Particle emitter
        const PARTICLE_SYSTEM = 1 << 8;

        /// Components every scene entity keeps
        const REQUIRED = Self::TAG.bits() | Self::TRANSFORM.bits() | Self::HIERARCHY.bits();
    }
}

impl ComponentKind {
    /// Optional components in "Add Component" menu order
    pub const OPTIONAL: [ComponentKind; 6] = [
        Self::MESH,
        Self::MATERIAL,
        Self::LIGHT,
        Self::CAMERA,
        Self::SCRIPT,
        Self::PARTICLE_SYSTEM,
    ];

    /// Display name of a single kind, `None` for combinations
    pub fn label(self) -> Option<&'static str> {
        LABELS.iter().find(|(kind, _)| *kind == self).map(|(_, label)| *label)
    }

    /// Single kind for a menu label
    pub fn from_label(label: &str) -> Option<Self> {
        LABELS.iter().find(|(_, name)| *name == label).map(|(kind, _)| *kind)
    }
}

const LABELS: [(ComponentKind, &str); 9] = [
    (ComponentKind::TAG, "Tag Component"),
    (ComponentKind::TRANSFORM, "Transform Component"),
    (ComponentKind::HIERARCHY, "Hierarchy Component"),
    (ComponentKind::CAMERA, "Camera Component"),
    (ComponentKind::LIGHT, "Light Component"),
    (ComponentKind::MESH, "Mesh Component"),
    (ComponentKind::MATERIAL, "Material Component"),
    (ComponentKind::SCRIPT, "Script Component"),
    (ComponentKind::PARTICLE_SYSTEM, "Particle System Component"),
];

/// Preset entities offered by the "Add Entity" menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityTemplate {
    /// Tag, transform and hierarchy only
    #[default]
    Empty,
    /// Entity with a camera
    Camera,
    /// Cube with the default material
    Primitive,
    /// Point light
    Light,
}

impl EntityTemplate {
    /// Every template in menu order
    pub const ALL: [EntityTemplate; 4] = [Self::Empty, Self::Camera, Self::Primitive, Self::Light];

    /// Name given to entities created from the template
    pub fn entity_name(self) -> &'static str {
        match self {
            Self::Empty => "Entity",
            Self::Camera => "Camera",
            Self::Primitive => "Primitive",
            Self::Light => "Light",
        }
    }

    /// Menu label
    pub fn label(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            other => other.entity_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for kind in ComponentKind::all().iter() {
            let label = kind.label().unwrap();
            assert_eq!(ComponentKind::from_label(label), Some(kind));
        }
        assert_eq!(ComponentKind::REQUIRED.label(), None);
    }

    #[test]
    fn test_required_set() {
        assert!(ComponentKind::REQUIRED.contains(ComponentKind::HIERARCHY));
        assert!(!ComponentKind::OPTIONAL.iter().any(|k| k.intersects(ComponentKind::REQUIRED)));
    }
}
