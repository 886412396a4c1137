//! Editor session
//!
//! Owns everything one open scene needs per frame and steps it in the
//! editor's order: camera, then scene simulation, then particle rendering.

use kiln_engine::core::config::EditorConfig;
use kiln_engine::ecs::components::CameraComponent;
use kiln_engine::events::Event;
use kiln_engine::foundation::time::Timer;
use kiln_engine::input::InputState;
use kiln_engine::render::{BillboardRenderer, EditorCamera, Framebuffer, FramebufferError, ImageFormat};
use kiln_engine::scene::Scene;

use crate::panels::SceneTreePanel;

/// Viewport attachments: colour plus depth/stencil
pub const VIEWPORT_ATTACHMENTS: [ImageFormat; 2] = [ImageFormat::RGBA8, ImageFormat::DEPTH24STENCIL8];

/// Per-frame statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Frames stepped so far, including this one
    pub frame: u64,
    /// Clamped step length in seconds
    pub delta_time: f32,
    /// Live entities in the scene
    pub entities: usize,
    /// Particle instances rendered this frame
    pub particles: usize,
    /// Billboard draws flushed by the renderer
    pub billboard_draws: usize,
    /// Frames per second since the session opened
    pub average_fps: f32,
}

/// One open scene with its camera, renderer, viewport and panels
pub struct EditorSession {
    scene: Scene,
    camera: EditorCamera,
    renderer: BillboardRenderer,
    viewport: Framebuffer,
    timer: Timer,
    panel: SceneTreePanel,
}

impl EditorSession {
    /// Open `scene` with a viewport the size of the configured window
    pub fn new(config: &EditorConfig, scene: Scene) -> Result<Self, FramebufferError> {
        let (width, height) = (config.window.width, config.window.height);
        let viewport = Framebuffer::new(width, height, &VIEWPORT_ATTACHMENTS)?;
        let mut camera = EditorCamera::new(&config.camera);
        camera.set_viewport_size(width, height);

        log::info!(
            "Opened scene '{}' ({} entities) in a {}x{} viewport",
            scene.name(),
            scene.entity_count(),
            width,
            height
        );
        Ok(Self {
            scene,
            camera,
            renderer: BillboardRenderer::new(),
            viewport,
            timer: Timer::new(),
            panel: SceneTreePanel::new(),
        })
    }

    /// Advance one frame
    pub fn step(&mut self, delta_time: f32, input: &InputState) -> FrameStats {
        self.timer.tick(delta_time);
        self.camera.on_update(delta_time, input);
        self.scene.update(delta_time);
        let frame = self.scene.render_particles(&mut self.renderer, &self.camera);
        self.panel.sync_selection(&self.scene);

        let stats = FrameStats {
            frame: self.timer.frame_count(),
            delta_time: self.timer.delta_time(),
            entities: self.scene.entity_count(),
            particles: frame.instance_transforms.len(),
            billboard_draws: frame.draws.len(),
            average_fps: self.timer.average_fps(),
        };
        log::trace!("{:?}", stats);
        stats
    }

    /// Route a window or input event; returns whether it was consumed
    pub fn on_event(&mut self, event: &Event) -> bool {
        if let Event::WindowResized { width, height } = *event {
            self.resize_viewport(width, height);
            return false;
        }
        self.camera.on_event(event)
    }

    /// Resize the viewport and every camera aspect to match
    ///
    /// Invalid sizes are ignored.
    pub fn resize_viewport(&mut self, width: u32, height: u32) {
        if self.viewport.resize(width, height).is_err() {
            return;
        }
        self.camera.set_viewport_size(width, height);
        let world = self.scene.world_mut();
        for entity in world.entities_with::<CameraComponent>() {
            if let Some(component) = world.get_component_mut::<CameraComponent>(entity) {
                component.camera.set_viewport_size(width, height);
            }
        }
    }

    /// Open scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Scene and panel together, for panel actions that edit the scene
    pub fn scene_and_panel(&mut self) -> (&mut Scene, &mut SceneTreePanel) {
        (&mut self.scene, &mut self.panel)
    }

    /// Viewport camera
    pub fn camera(&self) -> &EditorCamera {
        &self.camera
    }

    /// Offscreen viewport the scene renders into
    pub fn viewport(&self) -> &Framebuffer {
        &self.viewport
    }

    /// Frame timer
    pub fn timer(&self) -> &Timer {
        &self.timer
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.renderer.shutdown();
    }
}
