//! ECS Systems module

pub mod particle_system;

pub use particle_system::ParticleSystem;
