//! Script attachment component
//!
//! Records which script an entity runs. No interpreter is embedded; the
//! component is carried through the inspector and scene files as data.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ecs::Component;

/// Script language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScriptLanguage {
    /// Lua script
    #[default]
    Lua,
    /// C# script
    CSharp,
}

impl ScriptLanguage {
    /// Guess the language from a file extension
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "lua" => Some(Self::Lua),
            "cs" => Some(Self::CSharp),
            _ => None,
        }
    }

    /// Display name used by the inspector
    pub fn label(self) -> &'static str {
        match self {
            Self::Lua => "Lua",
            Self::CSharp => "CSharp",
        }
    }
}

/// Script attached to an entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptComponent {
    /// Script file
    pub path: PathBuf,
    /// Script language
    pub language: ScriptLanguage,
}

impl ScriptComponent {
    /// Attach a script, inferring the language from its extension
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let language = ScriptLanguage::from_path(&path).unwrap_or_default();
        Self { path, language }
    }
}

impl Component for ScriptComponent {}
