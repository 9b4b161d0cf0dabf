//! Configuration types and loading.
//!
//! Every section and field has a default, so a config file only needs the
//! keys it wants to change:
//!
//! ```yaml
//! render:
//!   title-font-pt: 32
//! provider:
//!   model: gpt-4o
//! limits:
//!   max-template-bytes: 5242880
//! ```

use crate::ooxml::pptx::shapes::{EMUS_PER_INCH, Geometry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Yaml { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub render: RenderConfig,
    pub provider: ProviderConfig,
    pub limits: LimitsConfig,
}

impl Config {
    /// Load from `path`, or return the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            tracing::debug!("no config file given, using defaults");
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content).map_err(|message| ConfigError::Yaml {
            path: path.to_path_buf(),
            message,
        })?;

        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse a YAML document. An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_saphyr::from_str(content).map_err(|e| e.to_string())
    }
}

/// Fonts and the fallback text box used when rendering slides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderConfig {
    pub title_font_pt: f64,
    pub body_font_pt: f64,
    pub fallback_box: BoxConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title_font_pt: 28.0,
            body_font_pt: 18.0,
            fallback_box: BoxConfig::default(),
        }
    }
}

/// Position and size in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxConfig {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl Default for BoxConfig {
    /// 1in from the left, 2in from the top, 8in x 3in.
    fn default() -> Self {
        Self {
            left: EMUS_PER_INCH,
            top: 2 * EMUS_PER_INCH,
            width: 8 * EMUS_PER_INCH,
            height: 3 * EMUS_PER_INCH,
        }
    }
}

impl From<BoxConfig> for Geometry {
    fn from(b: BoxConfig) -> Self {
        Geometry::new(b.left, b.top, b.width, b.height)
    }
}

/// Outline provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProviderConfig {
    /// Provider id; ids starting with `openai` select the OpenAI provider
    pub name: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_ms: u64,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.2,
            max_tokens: 1000,
            timeout_ms: 60_000,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

/// Template intake limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LimitsConfig {
    pub max_template_bytes: u64,
    /// Accepted file extensions, lowercase, without the dot
    pub template_extensions: Vec<String>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_template_bytes: 20 * 1024 * 1024,
            template_extensions: vec!["pptx".to_string(), "potx".to_string()],
        }
    }
}
