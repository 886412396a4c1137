//! Material component

use std::sync::Arc;

use crate::ecs::Component;
use crate::render::material::Material;

/// Material used to draw the entity's mesh
#[derive(Debug, Clone, Default)]
pub struct MaterialComponent {
    /// Shared material
    pub material: Arc<Material>,
}

impl MaterialComponent {
    /// Wrap a shared material
    pub fn new(material: Arc<Material>) -> Self {
        Self { material }
    }

    /// Material for in-place editing, cloned first when shared
    pub fn material_mut(&mut self) -> &mut Material {
        Arc::make_mut(&mut self.material)
    }
}

impl Component for MaterialComponent {}
