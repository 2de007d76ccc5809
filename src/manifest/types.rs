use serde::{Deserialize, Serialize};

use crate::registration::split_aliases;

/// Root of a command manifest file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub commands: Vec<CommandEntry>,
}

/// Interactive front-end settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Prompt printed before each line in interactive mode (default: "> ").
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
        }
    }
}

fn default_prompt() -> String {
    "> ".to_string()
}

/// One `[[commands]]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEntry {
    pub name: String,
    /// Ancestor names, top-level first.
    #[serde(default)]
    pub parent: Vec<String>,
    #[serde(default)]
    pub aliases: Aliases,
    #[serde(default)]
    pub params: Vec<ParamEntry>,
    /// Output template; `{n}` is replaced by bound argument `n`.
    #[serde(default)]
    pub reply: Option<String>,
}

/// Aliases as a TOML array or as one comma-separated string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Aliases {
    List(Vec<String>),
    Joined(String),
}

impl Default for Aliases {
    fn default() -> Self {
        Aliases::List(Vec::new())
    }
}

impl Aliases {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Aliases::List(list) => list.clone(),
            Aliases::Joined(joined) => split_aliases(joined),
        }
    }
}

/// One parameter declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamEntry {
    /// Type name, e.g. "string", "int", "double" or "session".
    #[serde(rename = "type")]
    pub ty: String,
    /// Default text; `"null"` means no value.
    #[serde(default)]
    pub default: Option<String>,
}
