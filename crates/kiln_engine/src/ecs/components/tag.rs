//! Display name component

use serde::{Deserialize, Serialize};

use crate::ecs::Component;

/// Name shown in the scene tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagComponent {
    /// Display name
    pub tag: String,
}

impl TagComponent {
    /// Tag with a name, "Entity" when the name is empty
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            tag: if tag.is_empty() { "Entity".to_string() } else { tag },
        }
    }
}

impl Default for TagComponent {
    fn default() -> Self {
        Self::new("")
    }
}

impl Component for TagComponent {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_falls_back() {
        assert_eq!(TagComponent::new("").tag, "Entity");
        assert_eq!(TagComponent::new("Sun").tag, "Sun");
    }
}
