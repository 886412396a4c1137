//! Entity-Component-System implementation
//!
//! Entities are generational keys and components are plain data stored per
//! type in the [`World`]. Systems own their scratch state and update the
//! world once per frame.

pub mod world;
pub mod entity;
pub mod component;
pub mod components;
pub mod systems;

pub use world::World;
pub use entity::Entity;
pub use component::Component;
