//! Particle emitter component
//!
//! Emits camera-facing particles at a fixed rate from a point or an area,
//! integrates gravity, and optionally drifts each particle's velocity and
//! size between random targets. Live particles are simulation state and are
//! never serialised; everything else round-trips through scene files.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::assets::{ResourceRegistry, DEFAULT_QUAD_MESH};
use crate::ecs::Component;
use crate::foundation::math::{utils, Mat4, Vec3, Vec4};
use crate::render::billboard::{Billboard, BillboardDraw, BillboardRenderer, BillboardType};
use crate::render::material::Material;
use crate::render::mesh::{Mesh, PrimitiveMesh};
use crate::render::texture::Texture2D;

/// Name of the material every emitter starts with
pub const DEFAULT_PARTICLE_MATERIAL: &str = "Default Particle Material";

/// Range new particle velocities are drawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityRange {
    /// Lower corner
    pub min: Vec3,
    /// Upper corner
    pub max: Vec3,
    /// Draw random velocities instead of starting at rest
    pub use_range: bool,
}

impl Default for VelocityRange {
    fn default() -> Self {
        Self {
            min: Vec3::new(-1.0, 0.0, -1.0),
            max: Vec3::new(1.0, 2.0, 1.0),
            use_range: false,
        }
    }
}

/// Range particle sizes are drawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeRange {
    /// Smallest size
    pub min: f32,
    /// Largest size
    pub max: f32,
    /// Vary size over the particle's life
    pub use_range: bool,
    /// New particles start at `min`
    pub start_with_min: bool,
    /// New particles start at `max`
    pub start_with_max: bool,
    /// Pick a new target each interval instead of holding the first one
    pub repeat_interval: bool,
}

impl Default for SizeRange {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 2.0,
            use_range: false,
            start_with_min: false,
            start_with_max: false,
            repeat_interval: true,
        }
    }
}

/// Emission area shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmissionShape {
    /// Axis-aligned box of `size`
    #[default]
    Box,
    /// Ball of radius `size.x`
    Sphere,
    /// Horizontal ellipse with radii `(size.x, size.z)`
    Circle,
}

impl EmissionShape {
    /// Every shape in inspector order
    pub const ALL: [EmissionShape; 3] = [Self::Box, Self::Sphere, Self::Circle];

    /// Display name used by the inspector
    pub fn label(self) -> &'static str {
        match self {
            Self::Box => "Box",
            Self::Sphere => "Sphere",
            Self::Circle => "Circle",
        }
    }
}

/// Area particles are spawned in around the emitter
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionArea {
    /// Extent, interpreted per shape
    pub size: Vec3,
    /// Spawn inside the area instead of at the emitter point
    pub use_emission_area: bool,
    /// Area shape
    pub shape: EmissionShape,
}

/// One live particle
#[derive(Debug, Clone)]
pub struct Particle {
    /// World position
    pub position: Vec3,
    /// Velocity applied this frame
    pub velocity: Vec3,
    /// Drift velocity at the start of the current interval
    pub initial_velocity: Vec3,
    /// Drift velocity at the end of the current interval
    pub target_velocity: Vec3,
    /// Velocity accumulated from gravity
    pub gravity_velocity: Vec3,
    /// RGBA colour
    pub color: Vec4,
    /// Seconds the particle lives
    pub lifetime: f32,
    /// Seconds since emission
    pub age: f32,
    /// Current uniform scale
    pub size: f32,
    /// Size at the start of the current interval
    pub initial_size: f32,
    /// Size at the end of the current interval
    pub target_size: f32,
    /// Billboard drawn for this particle
    pub billboard: Billboard,
    velocity_phase: f32,
    size_phase: f32,
}

impl Particle {
    /// Still inside its lifetime
    pub fn is_alive(&self) -> bool {
        self.age < self.lifetime
    }
}

/// Output of one particle render pass
#[derive(Debug, Clone, Default)]
pub struct ParticleFrame {
    /// Resolved billboard draws
    pub draws: Vec<BillboardDraw>,
    /// `translate(position) * scale(size)` per live particle, for instancing
    pub instance_transforms: Vec<Mat4>,
}

/// Particle emitter attached to an entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSystemComponent {
    /// Emitter offset from the owning entity
    pub local_emitter_position: Vec3,
    /// Emitter position in world space, recomputed every update
    #[serde(skip)]
    pub global_emitter_position: Vec3,
    /// Particles emitted per second
    pub emission_rate: f32,
    /// Seconds each particle lives
    pub particle_lifetime: f32,
    /// Constant acceleration
    pub gravity: Vec3,
    /// Size of particles when the size range is off
    pub particle_size: f32,
    /// Particle rotation in degrees
    pub rotation: f32,
    /// Velocity randomisation
    pub velocity_range: VelocityRange,
    /// Seconds between velocity targets
    pub velocity_change_interval: f32,
    /// Size randomisation
    pub size_range: SizeRange,
    /// Seconds between size targets
    pub size_change_interval: f32,
    /// Spawn area
    pub emission_area: EmissionArea,
    /// Orientation of particle billboards
    pub billboard_type: BillboardType,

    #[serde(skip)]
    alive_count: usize,
    #[serde(skip)]
    particles: Vec<Particle>,
    #[serde(skip)]
    emission_accumulator: f32,
    #[serde(skip, default = "default_particle_material")]
    material: Arc<Material>,
    #[serde(skip, default = "fallback_quad")]
    mesh: Arc<Mesh>,
    #[serde(skip)]
    texture: Option<Arc<Texture2D>>,
    #[serde(skip, default = "StdRng::from_entropy")]
    rng: StdRng,
}

fn default_particle_material() -> Arc<Material> {
    Arc::new(Material::new(DEFAULT_PARTICLE_MATERIAL))
}

fn fallback_quad() -> Arc<Mesh> {
    Arc::new(PrimitiveMesh::quad())
}

impl ParticleSystemComponent {
    /// Emitter with default settings, drawing with the registry's quad
    pub fn new(registry: &ResourceRegistry) -> Self {
        let mut system = Self::default();
        system.resolve_mesh(registry);
        system
    }

    /// Reseed the random generator for reproducible emission
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Look up the shared quad mesh, generating one when it is missing
    pub fn resolve_mesh(&mut self, registry: &ResourceRegistry) {
        match registry.get_mesh(DEFAULT_QUAD_MESH) {
            Some(mesh) => self.mesh = mesh,
            None => {
                log::warn!("{} not found. Falling back to a generated quad.", DEFAULT_QUAD_MESH);
                self.mesh = fallback_quad();
            }
        }
    }

    /// Advance the simulation by `delta_time` seconds
    pub fn update(&mut self, delta_time: f32) {
        self.alive_count = 0;

        self.emission_accumulator += self.emission_rate * delta_time;
        while self.emission_accumulator >= 1.0 {
            self.emit_particle();
            self.emission_accumulator -= 1.0;
        }

        let mut particles = std::mem::take(&mut self.particles);
        for particle in particles.iter_mut().filter(|p| p.is_alive()) {
            self.step_particle(particle, delta_time);
            self.alive_count += 1;
        }
        particles.retain(Particle::is_alive);
        self.particles = particles;

        log::trace!("Alive particles: {}", self.alive_count);
    }

    /// Submit every live particle and resolve the frame's draws
    pub fn render(
        &self,
        renderer: &mut BillboardRenderer,
        view_projection: Mat4,
        camera_position: Vec3,
        camera_up: Vec3,
    ) -> ParticleFrame {
        renderer.begin_scene(view_projection, camera_position, camera_up);

        let mut instance_transforms = Vec::with_capacity(self.particles.len());
        for particle in self.particles.iter().filter(|p| p.is_alive()) {
            renderer.submit_billboard(particle.billboard.clone(), Some(Arc::clone(&self.material)), 0);
            instance_transforms
                .push(Mat4::new_translation(&particle.position) * Mat4::new_scaling(particle.size));
        }

        ParticleFrame {
            draws: renderer.end_scene(),
            instance_transforms,
        }
    }

    /// Drop every live particle and pending emission
    pub fn clear(&mut self) {
        self.particles.clear();
        self.alive_count = 0;
        self.emission_accumulator = 0.0;
    }

    /// Particles stepped during the last update
    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Live particles
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Material particles are drawn with
    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    /// Quad particles are drawn with
    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    /// Texture on the particle material
    pub fn texture(&self) -> Option<&Arc<Texture2D>> {
        self.texture.as_ref()
    }

    /// Replace the particle texture with a new material instance
    pub fn set_particle_texture(&mut self, texture: Option<Arc<Texture2D>>) {
        let material = (*self.material).clone().with_albedo_texture(texture.clone());
        self.material = Arc::new(material);
        self.texture = texture;
    }

    /// Restore the velocity range and its interval
    pub fn reset_velocity_range(&mut self) {
        let use_range = self.velocity_range.use_range;
        self.velocity_range = VelocityRange {
            use_range,
            ..VelocityRange::default()
        };
        self.velocity_change_interval = 1.0;
    }

    /// Restore the size bounds and their interval
    pub fn reset_size_range(&mut self) {
        self.size_range.min = 0.5;
        self.size_range.max = 2.0;
        self.size_change_interval = 1.0;
    }

    /// Toggle starting at the minimum size, clearing start-at-max when set
    pub fn set_start_with_min(&mut self, enabled: bool) {
        self.size_range.start_with_min = enabled;
        if enabled {
            self.size_range.start_with_max = false;
        }
    }

    /// Toggle starting at the maximum size, clearing start-at-min when set
    pub fn set_start_with_max(&mut self, enabled: bool) {
        self.size_range.start_with_max = enabled;
        if enabled {
            self.size_range.start_with_min = false;
        }
    }

    /// Set the minimum size, kept within `[0.1, max]`
    pub fn set_size_range_min(&mut self, min: f32) {
        self.size_range.min = min.min(self.size_range.max).max(0.1);
    }

    /// Set the maximum size, kept within `[min, 10]`
    pub fn set_size_range_max(&mut self, max: f32) {
        self.size_range.max = max.min(10.0).max(self.size_range.min);
    }

    /// Set the area extent the way the current shape reads it
    ///
    /// Box uses all three axes, Sphere takes `size.x` as a uniform radius and
    /// Circle keeps the X and Z radii.
    pub fn set_emission_shape_size(&mut self, size: Vec3) {
        let size = size.map(|v| v.clamp(0.0, 100.0));
        self.emission_area.size = match self.emission_area.shape {
            EmissionShape::Box => size,
            EmissionShape::Sphere => Vec3::repeat(size.x),
            EmissionShape::Circle => Vec3::new(size.x, 0.0, size.z),
        };
    }

    /// Set the particle rotation in degrees, clamped to `[-180, 180]`
    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees.clamp(-180.0, 180.0);
    }

    fn emit_particle(&mut self) {
        let mut position = self.global_emitter_position;
        if self.emission_area.use_emission_area {
            position += self.random_point_in_area();
        }

        let (initial_velocity, target_velocity) = if self.velocity_range.use_range {
            (self.random_velocity(), self.random_velocity())
        } else {
            (Vec3::zeros(), Vec3::zeros())
        };

        let (size, target_size) = if self.size_range.use_range {
            let start = if self.size_range.start_with_min {
                self.size_range.min
            } else if self.size_range.start_with_max {
                self.size_range.max
            } else {
                self.random_size()
            };
            (start, self.random_size())
        } else {
            (self.particle_size, self.particle_size)
        };

        let billboard = Billboard::new(self.billboard_type)
            .with_position(position)
            .with_scale(Vec3::repeat(size));

        self.particles.push(Particle {
            position,
            velocity: initial_velocity,
            initial_velocity,
            target_velocity,
            gravity_velocity: Vec3::zeros(),
            color: Vec4::repeat(1.0),
            lifetime: self.particle_lifetime,
            age: 0.0,
            size,
            initial_size: size,
            target_size,
            billboard,
            velocity_phase: 0.0,
            size_phase: 0.0,
        });
        log::trace!("Emitted particle at {:?}", position);
    }

    fn step_particle(&mut self, particle: &mut Particle, delta_time: f32) {
        let drift = if self.velocity_range.use_range {
            particle.velocity_phase += delta_time;
            let t = interval_progress(particle.velocity_phase, self.velocity_change_interval);
            let drift = utils::lerp_vec3(&particle.initial_velocity, &particle.target_velocity, t);
            if t >= 1.0 {
                particle.initial_velocity = particle.target_velocity;
                particle.target_velocity = self.random_velocity();
                particle.velocity_phase = 0.0;
            }
            drift
        } else {
            particle.initial_velocity
        };

        particle.gravity_velocity += self.gravity * delta_time;
        particle.velocity = drift + particle.gravity_velocity;
        particle.position += particle.velocity * delta_time;

        if self.size_range.use_range {
            particle.size_phase += delta_time;
            let t = interval_progress(particle.size_phase, self.size_change_interval);
            particle.size = utils::lerp(particle.initial_size, particle.target_size, t);
            if t >= 1.0 && self.size_range.repeat_interval {
                particle.initial_size = particle.target_size;
                particle.target_size = self.random_size();
                particle.size_phase = 0.0;
            }
        }

        particle.age += delta_time;
        particle.billboard.position = particle.position;
        particle.billboard.scale = Vec3::repeat(particle.size);
    }

    fn random_velocity(&mut self) -> Vec3 {
        let (min, max) = (self.velocity_range.min, self.velocity_range.max);
        Vec3::new(
            random_between(&mut self.rng, min.x, max.x),
            random_between(&mut self.rng, min.y, max.y),
            random_between(&mut self.rng, min.z, max.z),
        )
    }

    fn random_size(&mut self) -> f32 {
        random_between(&mut self.rng, self.size_range.min, self.size_range.max)
    }

    fn random_point_in_area(&mut self) -> Vec3 {
        let size = self.emission_area.size;
        match self.emission_area.shape {
            EmissionShape::Box => {
                let half = size * 0.5;
                Vec3::new(
                    random_between(&mut self.rng, -half.x, half.x),
                    random_between(&mut self.rng, -half.y, half.y),
                    random_between(&mut self.rng, -half.z, half.z),
                )
            }
            EmissionShape::Sphere => {
                // rejection sampling keeps the ball uniformly filled
                loop {
                    let candidate = Vec3::new(
                        random_between(&mut self.rng, -1.0, 1.0),
                        random_between(&mut self.rng, -1.0, 1.0),
                        random_between(&mut self.rng, -1.0, 1.0),
                    );
                    if candidate.norm_squared() <= 1.0 {
                        break candidate * size.x;
                    }
                }
            }
            EmissionShape::Circle => {
                let radius = self.rng.gen::<f32>().sqrt();
                let angle = self.rng.gen::<f32>() * std::f32::consts::TAU;
                Vec3::new(size.x * radius * angle.cos(), 0.0, size.z * radius * angle.sin())
            }
        }
    }
}

impl Default for ParticleSystemComponent {
    fn default() -> Self {
        Self {
            local_emitter_position: Vec3::zeros(),
            global_emitter_position: Vec3::zeros(),
            emission_rate: 10.0,
            particle_lifetime: 5.0,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            particle_size: 1.0,
            rotation: 0.0,
            velocity_range: VelocityRange::default(),
            velocity_change_interval: 1.0,
            size_range: SizeRange::default(),
            size_change_interval: 1.0,
            emission_area: EmissionArea::default(),
            billboard_type: BillboardType::WorldAligned,
            alive_count: 0,
            particles: Vec::new(),
            emission_accumulator: 0.0,
            material: default_particle_material(),
            mesh: fallback_quad(),
            texture: None,
            rng: StdRng::from_entropy(),
        }
    }
}

impl Component for ParticleSystemComponent {}

/// Fraction of an interval elapsed, 1 once it is over or when it is empty
fn interval_progress(phase: f32, interval: f32) -> f32 {
    if interval <= 0.0 {
        return 1.0;
    }
    (phase / interval).min(1.0)
}

/// Uniform sample between two bounds in either order
fn random_between(rng: &mut StdRng, a: f32, b: f32) -> f32 {
    a + (b - a) * rng.gen::<f32>()
}
