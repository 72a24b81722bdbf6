//! Tool settings for cfgloc.toml
//!
//! ```toml
//! [export]
//! language = "en-us"
//! skip_prefixes = ["#autoLOC_"]
//! global_prefixes = ["#myMod_common_"]
//!
//! [parts]
//! tag_prefix = "myMod_"
//! fields = ["title", "manufacturer", "description", "tags"]
//!
//! [parse]
//! resolve_tags = true
//! ```
//!
//! Every section and key is optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::localization::{ExportConfig, ExtractOptions};

/// Default file name looked up next to the processed directory.
pub const CONFIG_FILE_NAME: &str = "cfgloc.toml";

fn default_true() -> bool {
    true
}

/// Parser settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseSettings {
    /// Annotate tag values with their text when a catalog is loaded.
    #[serde(default = "default_true")]
    pub resolve_tags: bool,
}

impl Default for ParseSettings {
    fn default() -> Self {
        Self { resolve_tags: true }
    }
}

/// The full tool configuration (cfgloc.toml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub parts: ExtractOptions,
    #[serde(default)]
    pub parse: ParseSettings,
}

impl ToolConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    /// Returns [`crate::Error::ConfigParse`] if the text is not valid.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_toml(&fs::read_to_string(path)?)?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Load `cfgloc.toml` from `dir`, or fall back to defaults when absent.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
