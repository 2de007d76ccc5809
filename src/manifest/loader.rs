use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::manifest::types::Manifest;
use crate::manifest::SESSION_TAG;
use crate::registration::is_valid_command_name;
use crate::value::ParamType;

/// Errors that can occur when loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Manifest validation failed: {message}")]
    ValidationError { message: String },
}

impl Manifest {
    /// Returns the path to the default manifest.
    ///
    /// Uses `~/.config/linedispatch/commands.toml` on Unix,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to the current directory if config_dir is unavailable.
    pub fn manifest_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("linedispatch").join("commands.toml")
    }

    /// Loads the default manifest.
    ///
    /// A missing file is not an error: it yields an empty manifest.
    pub fn load() -> Result<Self, ManifestError> {
        let path = Self::manifest_path();

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No manifest found, starting empty");
            return Ok(Manifest::default());
        }

        Self::load_from(&path)
    }

    /// Reads, parses and validates the manifest at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|e| ManifestError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let manifest: Manifest = toml::from_str(&content).map_err(|e| ManifestError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        manifest.validate()?;
        tracing::info!(
            path = %path.display(),
            commands = manifest.commands.len(),
            "Loaded manifest"
        );
        Ok(manifest)
    }

    /// Validates the manifest.
    ///
    /// Checks:
    /// - Every command name is a valid command name
    /// - Every parameter type is a built-in type or `session`; a manifest
    ///   cannot supply parsers, so no other custom type is accepted
    ///
    /// Aliases and parent paths are checked when the commands are registered.
    pub fn validate(&self) -> Result<(), ManifestError> {
        for entry in &self.commands {
            if !is_valid_command_name(&entry.name) {
                return Err(ManifestError::ValidationError {
                    message: format!("Invalid command name '{}'", entry.name),
                });
            }

            for param in &entry.params {
                let ty = ParamType::from_name(&param.ty);
                if !ty.is_builtin() && ty.name() != SESSION_TAG {
                    return Err(ManifestError::ValidationError {
                        message: format!(
                            "Unknown parameter type '{}' in command '{}'",
                            param.ty, entry.name
                        ),
                    });
                }
            }
        }

        Ok(())
    }
}
