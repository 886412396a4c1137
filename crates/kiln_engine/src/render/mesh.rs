//! Mesh representation and primitive generators
//!
//! [`Mesh`] is a backend-agnostic container of vertices and triangle indices.
//! [`PrimitiveMesh`] builds the editor's built-in shapes. Every generator
//! emits counter-clockwise triangles (seen from outside) with unit normals.

use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::foundation::math::{Vec2, Vec3};

/// 3D vertex data structure for rendering
///
/// `#[repr(C)]` and `Pod` so vertex slices can be uploaded as raw bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in 3D space
    pub position: [f32; 3],

    /// Normal vector
    pub normal: [f32; 3],

    /// Texture coordinates
    pub uv: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, normal, uv }
    }

    fn from_vectors(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self::new(position.into(), normal.into(), uv.into())
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Bounds of a vertex set, a zero box at the origin when empty
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        let mut iter = vertices.iter().map(|v| Vec3::from(v.position));
        let Some(first) = iter.next() else {
            return Self {
                min: Vec3::zeros(),
                max: Vec3::zeros(),
            };
        };
        iter.fold(Self { min: first, max: first }, |aabb, p| Self {
            min: aabb.min.inf(&p),
            max: aabb.max.sup(&p),
        })
    }

    /// Box centre
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// 3D mesh containing vertices and indices for rendering
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Display name
    pub name: String,

    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Index data for triangles
    pub indices: Vec<u32>,

    aabb: Aabb,
}

impl Mesh {
    /// Create a new mesh
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        let aabb = Aabb::from_vertices(&vertices);
        Self {
            name: name.into(),
            vertices,
            indices,
            aabb,
        }
    }

    /// Bounding box of the vertices
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex buffer as raw bytes
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Built-in shapes the editor can create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PrimitiveType {
    /// Unit cube
    #[default]
    Cube,
    /// UV sphere
    Sphere,
    /// Horizontal plane
    Plane,
    /// Camera-facing unit quad
    Quad,
    /// Capped cylinder
    Cylinder,
    /// Capped cone
    Cone,
    /// Ring torus
    Torus,
    /// Cylinder with hemispherical ends
    Capsule,
    /// No geometry
    None,
}

impl PrimitiveType {
    /// Every shape that produces geometry
    pub const SHAPES: [PrimitiveType; 8] = [
        Self::Cube,
        Self::Sphere,
        Self::Plane,
        Self::Quad,
        Self::Cylinder,
        Self::Cone,
        Self::Torus,
        Self::Capsule,
    ];
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cube => "Cube",
            Self::Sphere => "Sphere",
            Self::Plane => "Plane",
            Self::Quad => "Quad",
            Self::Cylinder => "Cylinder",
            Self::Cone => "Cone",
            Self::Torus => "Torus",
            Self::Capsule => "Capsule",
            Self::None => "None",
        };
        f.write_str(name)
    }
}

/// Factory for primitive meshes
pub struct PrimitiveMesh;

impl PrimitiveMesh {
    /// Build a primitive with default dimensions, `None` for [`PrimitiveType::None`]
    pub fn create(kind: PrimitiveType) -> Option<Mesh> {
        let mesh = match kind {
            PrimitiveType::Cube => Self::cube(Vec3::new(1.0, 1.0, 1.0)),
            PrimitiveType::Sphere => Self::sphere(0.5, 16, 32),
            PrimitiveType::Plane => Self::plane(Vec2::new(1.0, 1.0), Vec3::y()),
            PrimitiveType::Quad => Self::quad(),
            PrimitiveType::Cylinder => Self::cylinder(0.5, 1.0, 32),
            PrimitiveType::Cone => Self::cone(0.5, 1.0, 32),
            PrimitiveType::Torus => Self::torus(0.5, 0.2, 32, 16),
            PrimitiveType::Capsule => Self::capsule(0.5, 2.0, 32, 8),
            PrimitiveType::None => return None,
        };
        Some(mesh)
    }

    /// Unit quad in the XY plane facing +Z
    pub fn quad() -> Mesh {
        let mut builder = MeshBuilder::default();
        builder.face(Vec3::zeros(), Vec3::z(), Vec3::x(), Vec3::y(), Vec2::new(1.0, 1.0));
        builder.build("Quad")
    }

    /// Plane of `size` centred on the origin, facing `normal`
    pub fn plane(size: Vec2, normal: Vec3) -> Mesh {
        let normal = normal.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::y);
        let (right, bitangent) = plane_basis(&normal);
        let mut builder = MeshBuilder::default();
        builder.face(Vec3::zeros(), normal, right, bitangent, size);
        builder.build("Plane")
    }

    /// Box of `size` centred on the origin
    pub fn cube(size: Vec3) -> Mesh {
        let half = size * 0.5;
        let mut builder = MeshBuilder::default();
        for axis in 0..3 {
            for sign in [1.0_f32, -1.0] {
                let mut normal = Vec3::zeros();
                normal[axis] = sign;
                let (right, bitangent) = plane_basis(&normal);
                let extent = Vec2::new(right.abs().dot(&size), bitangent.abs().dot(&size));
                builder.face(normal * half[axis], normal, right, bitangent, extent);
            }
        }
        builder.build("Cube")
    }

    /// UV sphere with `rings` latitude bands and `sectors` longitude bands
    pub fn sphere(radius: f32, rings: u32, sectors: u32) -> Mesh {
        let rings = rings.max(2);
        let latitudes: Vec<(f32, f32)> = (0..=rings).map(|r| (PI * r as f32 / rings as f32, 0.0)).collect();
        let mut builder = MeshBuilder::default();
        builder.latitude_grid(radius, &latitudes, sectors.max(3));
        builder.build("Sphere")
    }

    /// Capsule of total `height`; the straight section is `height - 2 * radius`
    pub fn capsule(radius: f32, height: f32, sectors: u32, rings_per_cap: u32) -> Mesh {
        let rings = rings_per_cap.max(1);
        let half_body = ((height - 2.0 * radius) * 0.5).max(0.0);
        let top = (0..=rings).map(|r| (FRAC_PI_2 * r as f32 / rings as f32, half_body));
        let bottom = (0..=rings).map(|r| (FRAC_PI_2 + FRAC_PI_2 * r as f32 / rings as f32, -half_body));
        let latitudes: Vec<(f32, f32)> = top.chain(bottom).collect();

        let mut builder = MeshBuilder::default();
        builder.latitude_grid(radius, &latitudes, sectors.max(3));
        builder.build("Capsule")
    }

    /// Capped cylinder along Y
    pub fn cylinder(radius: f32, height: f32, segments: u32) -> Mesh {
        let segments = segments.max(3);
        let half = height * 0.5;
        let mut builder = MeshBuilder::default();

        let side_start = builder.next_index();
        for i in 0..=segments {
            let u = i as f32 / segments as f32;
            let dir = ring_direction(u * TAU);
            let bottom = Vec3::new(dir.x * radius, -half, dir.z * radius);
            let top = Vec3::new(dir.x * radius, half, dir.z * radius);
            builder.push(bottom, dir, Vec2::new(u, 0.0));
            builder.push(top, dir, Vec2::new(u, 1.0));
        }
        for i in 0..segments {
            let b0 = side_start + 2 * i;
            let t0 = b0 + 1;
            let b1 = b0 + 2;
            let t1 = b0 + 3;
            builder.triangle(b0, b1, t0);
            builder.triangle(t0, b1, t1);
        }

        builder.cap(radius, half, segments, true);
        builder.cap(radius, -half, segments, false);
        builder.build("Cylinder")
    }

    /// Cone with its apex at `+height/2` and a capped base
    pub fn cone(radius: f32, height: f32, segments: u32) -> Mesh {
        let segments = segments.max(3);
        let half = height * 0.5;
        let apex = Vec3::new(0.0, half, 0.0);
        let slant_normal = |angle: f32| {
            let dir = ring_direction(angle);
            Vec3::new(dir.x * height, radius, dir.z * height).normalize()
        };

        let mut builder = MeshBuilder::default();
        for i in 0..segments {
            let a0 = TAU * i as f32 / segments as f32;
            let a1 = TAU * (i + 1) as f32 / segments as f32;
            let d0 = ring_direction(a0);
            let d1 = ring_direction(a1);

            let start = builder.next_index();
            builder.push(Vec3::new(d0.x * radius, -half, d0.z * radius), slant_normal(a0), Vec2::new(0.0, 0.0));
            builder.push(Vec3::new(d1.x * radius, -half, d1.z * radius), slant_normal(a1), Vec2::new(1.0, 0.0));
            builder.push(apex, slant_normal((a0 + a1) * 0.5), Vec2::new(0.5, 1.0));
            builder.triangle(start, start + 1, start + 2);
        }

        builder.cap(radius, -half, segments, false);
        builder.build("Cone")
    }

    /// Torus around Y with a `major` ring radius and `minor` tube radius
    pub fn torus(major: f32, minor: f32, major_segments: u32, minor_segments: u32) -> Mesh {
        let major_segments = major_segments.max(3);
        let minor_segments = minor_segments.max(3);
        let mut builder = MeshBuilder::default();

        for i in 0..=major_segments {
            let u = i as f32 / major_segments as f32;
            let ring = ring_direction(u * TAU);
            for j in 0..=minor_segments {
                let v = j as f32 / minor_segments as f32;
                let (sin_tube, cos_tube) = (v * TAU).sin_cos();
                let normal = ring * cos_tube + Vec3::y() * sin_tube;
                let position = ring * major + normal * minor;
                builder.push(position, normal, Vec2::new(u, v));
            }
        }

        let stride = minor_segments + 1;
        for i in 0..major_segments {
            for j in 0..minor_segments {
                let a = i * stride + j;
                let a_next_ring = a + stride;
                builder.triangle(a, a_next_ring, a + 1);
                builder.triangle(a_next_ring, a_next_ring + 1, a + 1);
            }
        }
        builder.build("Torus")
    }
}

/// In-plane axes for a face, with `right x bitangent == normal`
fn plane_basis(normal: &Vec3) -> (Vec3, Vec3) {
    let reference = if normal.y.abs() > 0.999 { Vec3::z() } else { Vec3::y() };
    let right = normal.cross(&reference).normalize();
    let bitangent = normal.cross(&right);
    (right, bitangent)
}

/// Horizontal unit direction for an angle around Y, 0 pointing at +Z
fn ring_direction(angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(sin, 0.0, cos)
}

#[derive(Default)]
struct MeshBuilder {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    fn next_index(&self) -> u32 {
        self.vertices.len() as u32
    }

    fn push(&mut self, position: Vec3, normal: Vec3, uv: Vec2) {
        self.vertices.push(Vertex::from_vectors(position, normal, uv));
    }

    fn triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Flat quad at `center`, corners ordered so it winds CCW around `normal`
    fn face(&mut self, center: Vec3, normal: Vec3, right: Vec3, up: Vec3, size: Vec2) {
        let start = self.next_index();
        for (x, y) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let position = center + right * (x * size.x) + up * (y * size.y);
            self.push(position, normal, Vec2::new(x + 0.5, y + 0.5));
        }
        self.triangle(start, start + 1, start + 2);
        self.triangle(start + 2, start + 3, start);
    }

    /// Disc of `radius` at height `y`, facing up or down
    fn cap(&mut self, radius: f32, y: f32, segments: u32, facing_up: bool) {
        let normal = if facing_up { Vec3::y() } else { -Vec3::y() };
        let center = self.next_index();
        self.push(Vec3::new(0.0, y, 0.0), normal, Vec2::new(0.5, 0.5));
        for i in 0..=segments {
            let dir = ring_direction(TAU * i as f32 / segments as f32);
            let uv = Vec2::new(dir.x * 0.5 + 0.5, dir.z * 0.5 + 0.5);
            self.push(Vec3::new(dir.x * radius, y, dir.z * radius), normal, uv);
        }
        for i in 0..segments {
            let (a, b) = (center + 1 + i, center + 2 + i);
            if facing_up {
                self.triangle(center, a, b);
            } else {
                self.triangle(center, b, a);
            }
        }
    }

    /// Rows of latitude `(polar angle, y offset)` from top to bottom, joined into bands
    fn latitude_grid(&mut self, radius: f32, latitudes: &[(f32, f32)], sectors: u32) {
        let start = self.next_index();
        let rows = latitudes.len() as u32;
        for (row, &(phi, offset)) in latitudes.iter().enumerate() {
            let (sin_phi, cos_phi) = phi.sin_cos();
            for s in 0..=sectors {
                let u = s as f32 / sectors as f32;
                let (sin_theta, cos_theta) = (u * TAU).sin_cos();
                let normal = Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta);
                let position = normal * radius + Vec3::new(0.0, offset, 0.0);
                let v = 1.0 - row as f32 / (rows - 1) as f32;
                self.push(position, normal, Vec2::new(u, v));
            }
        }

        let stride = sectors + 1;
        for row in 0..rows - 1 {
            for s in 0..sectors {
                let a = start + row * stride + s;
                let below = a + stride;
                self.triangle(a, a + 1, below);
                self.triangle(a + 1, below + 1, below);
            }
        }
    }

    fn build(self, name: &str) -> Mesh {
        Mesh::new(name, self.vertices, self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_well_formed(mesh: &Mesh) {
        assert!(!mesh.indices.is_empty(), "{} has no triangles", mesh.name);
        assert_eq!(mesh.indices.len() % 3, 0);

        for vertex in &mesh.vertices {
            assert_relative_eq!(Vec3::from(vertex.normal).norm(), 1.0, epsilon = 1e-4);
        }

        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
            let pa = Vec3::from(a.position);
            let face = (Vec3::from(b.position) - pa).cross(&(Vec3::from(c.position) - pa));
            if face.norm() < 1e-6 {
                continue;
            }
            let shading = Vec3::from(a.normal) + Vec3::from(b.normal) + Vec3::from(c.normal);
            assert!(face.dot(&shading) > 0.0, "{} has a clockwise triangle {:?}", mesh.name, tri);
        }
    }

    #[test]
    fn test_every_primitive_is_ccw_with_unit_normals() {
        for kind in PrimitiveType::SHAPES {
            let mesh = PrimitiveMesh::create(kind).unwrap();
            assert_well_formed(&mesh);
        }
        assert!(PrimitiveMesh::create(PrimitiveType::None).is_none());
    }

    #[test]
    fn test_quad_layout() {
        let quad = PrimitiveMesh::quad();
        assert_eq!(quad.indices, vec![0, 1, 2, 2, 3, 0]);
        assert_eq!(quad.vertices[0].position, [-0.5, -0.5, 0.0]);
        assert_eq!(quad.vertices[2].uv, [1.0, 1.0]);
    }

    #[test]
    fn test_cube_bounds_follow_size() {
        let cube = PrimitiveMesh::cube(Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_relative_eq!(cube.aabb().size(), Vec3::new(2.0, 4.0, 6.0), epsilon = 1e-5);
        assert_relative_eq!(cube.aabb().center(), Vec3::zeros(), epsilon = 1e-5);
    }

    #[test]
    fn test_tilted_plane_faces_its_normal() {
        let normal = Vec3::new(1.0, 0.0, 0.0);
        let plane = PrimitiveMesh::plane(Vec2::new(2.0, 2.0), normal);
        assert_well_formed(&plane);
        for vertex in &plane.vertices {
            assert_relative_eq!(vertex.position[0], 0.0, epsilon = 1e-6);
            assert_eq!(vertex.normal, [1.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn test_capsule_height() {
        let capsule = PrimitiveMesh::capsule(0.5, 3.0, 16, 4);
        assert_relative_eq!(capsule.aabb().size().y, 3.0, epsilon = 1e-4);
        assert_relative_eq!(capsule.aabb().size().x, 1.0, epsilon = 1e-4);
    }
}
