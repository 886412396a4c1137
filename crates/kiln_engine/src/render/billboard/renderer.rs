//! Billboard renderer
//!
//! Owns the shared unit quad and the per-frame command queue. A frame is
//! bracketed by [`BillboardRenderer::begin_scene`] and
//! [`BillboardRenderer::end_scene`]; the latter drains the queue into
//! [`BillboardDraw`] records with everything a backend needs per draw.

use std::sync::Arc;

use super::types::{Billboard, BillboardInstance, QuadVertex};
use crate::foundation::math::{utils, Mat3, Mat4, Vec3, Vec4};
use crate::render::material::Material;
use crate::render::texture::Texture2D;

/// Entity id used when a billboard belongs to no entity
pub const DEFAULT_ENTITY_ID: u32 = u32::MAX;

/// Encode the low 24 bits of an entity id as an RGB colour in `[0, 1]`
pub fn encode_entity_id(entity_id: u32) -> Vec3 {
    let r = entity_id & 0xFF;
    let g = (entity_id >> 8) & 0xFF;
    let b = (entity_id >> 16) & 0xFF;
    Vec3::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

/// Recover the id written by [`encode_entity_id`]
pub fn decode_entity_id(color: Vec3) -> u32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
    channel(color.x) | (channel(color.y) << 8) | (channel(color.z) << 16)
}

/// Queued billboard draw
#[derive(Debug, Clone)]
pub struct BillboardRenderCommand {
    /// Billboard to draw
    pub billboard: Billboard,
    /// Material; commands without one are skipped
    pub material: Option<Arc<Material>>,
    /// Owning entity for picking
    pub entity_id: u32,
}

impl BillboardRenderCommand {
    /// Command with the default entity id
    pub fn new(billboard: Billboard, material: Option<Arc<Material>>) -> Self {
        Self {
            billboard,
            material,
            entity_id: DEFAULT_ENTITY_ID,
        }
    }
}

/// One resolved billboard draw
#[derive(Debug, Clone)]
pub struct BillboardDraw {
    /// Model matrix
    pub model: Mat4,
    /// Inverse-transpose of the model's upper 3x3
    pub normal_matrix: Mat3,
    /// Entity id
    pub entity_id: u32,
    /// Entity id encoded for the picking attachment
    pub entity_color: Vec3,
    /// Material to bind
    pub material: Arc<Material>,
}

impl BillboardDraw {
    /// Instance record for batched upload
    pub fn instance(&self) -> BillboardInstance {
        BillboardInstance::new(&self.model, self.material.properties.color, self.entity_color)
    }
}

/// Textured billboard drawn outside the queue
#[derive(Debug, Clone)]
pub struct ImmediateBillboardDraw {
    /// Camera view-projection of the current scene
    pub view_projection: Mat4,
    /// Billboard model matrix
    pub transform: Mat4,
    /// Tint
    pub color: Vec4,
    /// Texture bound to slot 0
    pub texture: Arc<Texture2D>,
}

/// Shared unit quad
#[derive(Debug, Clone, PartialEq)]
pub struct QuadGeometry {
    /// Corners, counter-clockwise from bottom-left
    pub vertices: [QuadVertex; 4],
    /// Two triangles
    pub indices: [u32; 6],
}

impl QuadGeometry {
    fn unit() -> Self {
        let vertex = |x: f32, y: f32, u: f32, v: f32| QuadVertex {
            position: [x, y, 0.0],
            uv: [u, v],
        };
        Self {
            vertices: [
                vertex(-0.5, -0.5, 0.0, 0.0),
                vertex(0.5, -0.5, 1.0, 0.0),
                vertex(0.5, 0.5, 1.0, 1.0),
                vertex(-0.5, 0.5, 0.0, 1.0),
            ],
            indices: [0, 1, 2, 2, 3, 0],
        }
    }
}

/// Per-frame billboard batching
#[derive(Debug)]
pub struct BillboardRenderer {
    quad: Option<QuadGeometry>,
    queue: Vec<BillboardRenderCommand>,
    view_projection: Mat4,
    camera_position: Vec3,
    camera_up: Vec3,
}

impl BillboardRenderer {
    /// Build the shared quad
    pub fn new() -> Self {
        log::debug!("Initialising billboard renderer");
        Self {
            quad: Some(QuadGeometry::unit()),
            queue: Vec::new(),
            view_projection: Mat4::identity(),
            camera_position: Vec3::zeros(),
            camera_up: Vec3::y(),
        }
    }

    /// Record the camera for this frame
    pub fn begin_scene(&mut self, view_projection: Mat4, camera_position: Vec3, camera_up: Vec3) {
        self.view_projection = view_projection;
        self.camera_position = camera_position;
        self.camera_up = camera_up;
    }

    /// Queue a command
    pub fn submit(&mut self, command: BillboardRenderCommand) {
        self.queue.push(command);
    }

    /// Queue a billboard with a material and owning entity
    pub fn submit_billboard(&mut self, billboard: Billboard, material: Option<Arc<Material>>, entity_id: u32) {
        self.submit(BillboardRenderCommand {
            billboard,
            material,
            entity_id,
        });
    }

    /// Drain the queue into draw records
    pub fn end_scene(&mut self) -> Vec<BillboardDraw> {
        let commands = std::mem::take(&mut self.queue);
        if self.quad.is_none() {
            log::warn!("Billboard renderer used after shutdown, dropping {} command(s)", commands.len());
            return Vec::new();
        }

        let mut draws = Vec::with_capacity(commands.len());
        for command in commands {
            let Some(material) = command.material else {
                log::trace!("Skipping billboard without material (entity {})", command.entity_id);
                continue;
            };
            let model = command
                .billboard
                .calculate_transform(self.camera_position, self.camera_up);
            draws.push(BillboardDraw {
                normal_matrix: utils::normal_matrix(&model),
                model,
                entity_id: command.entity_id,
                entity_color: encode_entity_id(command.entity_id),
                material,
            });
        }
        log::trace!("Resolved {} billboard draw(s)", draws.len());
        draws
    }

    /// Resolve a single textured billboard immediately
    pub fn draw_billboard(
        &self,
        billboard: &Billboard,
        texture: Arc<Texture2D>,
        color: Vec4,
    ) -> Option<ImmediateBillboardDraw> {
        self.quad.as_ref()?;
        Some(ImmediateBillboardDraw {
            view_projection: self.view_projection,
            transform: billboard.calculate_transform(self.camera_position, self.camera_up),
            color,
            texture,
        })
    }

    /// Release the quad and drop queued commands
    pub fn shutdown(&mut self) {
        self.quad = None;
        self.queue.clear();
        log::debug!("Billboard renderer shut down");
    }

    /// Shared quad, `None` after shutdown
    pub fn quad(&self) -> Option<&QuadGeometry> {
        self.quad.as_ref()
    }

    /// Commands waiting for `end_scene`
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// View-projection recorded by `begin_scene`
    pub fn view_projection(&self) -> &Mat4 {
        &self.view_projection
    }
}

impl Default for BillboardRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::billboard::BillboardType;
    use crate::render::texture::ImageFormat;
    use approx::assert_relative_eq;

    #[test]
    fn test_entity_id_colour_round_trip() {
        assert_relative_eq!(encode_entity_id(0x0003_02FF), Vec3::new(1.0, 2.0 / 255.0, 3.0 / 255.0));
        assert_eq!(decode_entity_id(encode_entity_id(123_456)), 123_456);
        assert_eq!(decode_entity_id(encode_entity_id(DEFAULT_ENTITY_ID)), 0x00FF_FFFF);
    }

    #[test]
    fn test_unit_quad_layout() {
        let renderer = BillboardRenderer::new();
        let quad = renderer.quad().unwrap();
        assert_eq!(quad.indices, [0, 1, 2, 2, 3, 0]);
        assert_eq!(quad.vertices[1].position, [0.5, -0.5, 0.0]);
        assert_eq!(quad.vertices[3].uv, [0.0, 1.0]);
    }

    #[test]
    fn test_end_scene_skips_missing_material_and_drains() {
        let mut renderer = BillboardRenderer::new();
        renderer.begin_scene(Mat4::identity(), Vec3::new(0.0, 0.0, 5.0), Vec3::y());

        let material = Arc::new(Material::default());
        let billboard = Billboard::new(BillboardType::ScreenAligned).with_scale(Vec3::new(2.0, 2.0, 2.0));
        renderer.submit_billboard(billboard.clone(), Some(material), 7);
        renderer.submit(BillboardRenderCommand::new(billboard, None));
        assert_eq!(renderer.queued(), 2);

        let draws = renderer.end_scene();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].entity_id, 7);
        assert_relative_eq!(draws[0].normal_matrix, Mat3::identity() * 0.5, epsilon = 1e-6);
        assert_eq!(renderer.queued(), 0);
        assert!(renderer.end_scene().is_empty());
    }

    #[test]
    fn test_draw_billboard_uses_scene_camera() {
        let mut renderer = BillboardRenderer::new();
        let view_projection = Mat4::new_scaling(2.0);
        renderer.begin_scene(view_projection, Vec3::new(0.0, 0.0, 5.0), Vec3::y());

        let texture = Arc::new(Texture2D::new(1, 1, ImageFormat::RGBA8));
        let draw = renderer
            .draw_billboard(&Billboard::default(), texture, Vec4::new(1.0, 0.0, 0.0, 1.0))
            .unwrap();
        assert_eq!(draw.view_projection, view_projection);
        assert_relative_eq!(draw.transform, Mat4::identity(), epsilon = 1e-6);

        renderer.shutdown();
        assert!(renderer.quad().is_none());
        let texture = Arc::new(Texture2D::new(1, 1, ImageFormat::RGBA8));
        assert!(renderer.draw_billboard(&Billboard::default(), texture, Vec4::repeat(1.0)).is_none());
    }
}
