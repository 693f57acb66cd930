// src/config/file.rs
// File-based configuration from vct-bdd.toml

use super::ConfigLayer;
use crate::error::{HarnessError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "vct-bdd.toml";

impl ConfigLayer {
    /// Load a layer from a TOML file.
    ///
    /// An explicit path must exist. Without one, `vct-bdd.toml` in the
    /// working directory is used if present; otherwise the layer is empty.
    pub fn from_file(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(HarnessError::Config(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let layer: ConfigLayer = toml::from_str(&contents)
            .map_err(|e| HarnessError::Config(format!("cannot parse {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Loaded config from file");
        Ok(layer)
    }
}
