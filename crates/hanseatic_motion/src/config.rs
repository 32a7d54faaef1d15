// SPDX-License-Identifier: MIT OR Apache-2.0
//! Engine configuration.
//!
//! Configuration is stored as RON:
//!
//! ```ron
//! (
//!     smoother: (enabled: true, settle_time: 1.18, epsilon: 0.5, max_frame_delta: 0.1),
//!     default_easing: "power2.out",
//!     refresh_on_load: true,
//! )
//! ```

use crate::easing::Easing;
use crate::smoother::SmootherConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("Failed to access {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The RON text is malformed
    #[error("Failed to parse motion config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The config could not be serialized
    #[error("Failed to serialize motion config: {0}")]
    Serialize(#[from] ron::Error),
}

/// Top-level motion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Scroll smoothing
    pub smoother: SmootherConfig,
    /// Easing for segments that do not name one
    pub default_easing: Easing,
    /// Re-resolve triggers when the host reports that loading finished
    pub refresh_on_load: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            smoother: SmootherConfig::default(),
            default_easing: Easing::Power2Out,
            refresh_on_load: true,
        }
    }
}

impl MotionConfig {
    /// Parse from RON text
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Serialize to pretty RON text
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let config = ron::ser::PrettyConfig::default().depth_limit(3);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&text)?;
        tracing::info!("Loaded motion config from {}", path.display());
        Ok(config)
    }

    /// Save to a RON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = self.to_ron_string()?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
