//! Mesh component

use std::sync::Arc;

use crate::ecs::Component;
use crate::render::mesh::{Mesh, PrimitiveMesh, PrimitiveType};

/// Geometry drawn for the entity
#[derive(Debug, Clone)]
pub struct MeshComponent {
    /// Primitive the mesh was generated from, saved instead of the vertices
    pub primitive: PrimitiveType,
    /// Shared geometry
    pub mesh: Arc<Mesh>,
    /// Draw the bounding box in the viewport
    pub draw_aabb: bool,
}

impl MeshComponent {
    /// Component for an already built primitive mesh
    pub fn new(primitive: PrimitiveType, mesh: Arc<Mesh>) -> Self {
        Self {
            primitive,
            mesh,
            draw_aabb: false,
        }
    }

    /// Generate a fresh mesh for a primitive, an empty mesh for `None`
    pub fn from_primitive(primitive: PrimitiveType) -> Self {
        let mesh = PrimitiveMesh::create(primitive).unwrap_or_else(|| Mesh::new("None", Vec::new(), Vec::new()));
        Self::new(primitive, Arc::new(mesh))
    }

    /// Display name of the mesh
    pub fn mesh_name(&self) -> &str {
        &self.mesh.name
    }
}

impl Default for MeshComponent {
    fn default() -> Self {
        Self::from_primitive(PrimitiveType::Cube)
    }
}

impl Component for MeshComponent {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_cube() {
        let mesh = MeshComponent::default();
        assert_eq!(mesh.primitive, PrimitiveType::Cube);
        assert_eq!(mesh.mesh.triangle_count(), 12);
        assert!(!mesh.draw_aabb);
    }

    #[test]
    fn test_none_primitive_is_empty() {
        let mesh = MeshComponent::from_primitive(PrimitiveType::None);
        assert_eq!(mesh.mesh_name(), "None");
        assert_eq!(mesh.mesh.triangle_count(), 0);
    }
}
