//! Editor panels

pub mod inspector;
pub mod scene_tree;

pub use scene_tree::SceneTreePanel;
