//! Translator configuration (cnobi.toml format).

use crate::error::Result;
use cnobi_parser::{ParseOptions, UnrecognizedPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up next to the input when no config is given.
pub const CONFIG_FILE_NAME: &str = "cnobi.toml";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Parser settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// What to do with a statement that matches no known form.
    #[serde(default)]
    pub unrecognized: Unrecognized,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unrecognized {
    #[default]
    Warn,
    Error,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Replaces the input's extension to form the default output path.
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Copy the companion header next to the generated file.
    #[serde(default = "default_copy_header")]
    pub copy_header: bool,
}

fn default_suffix() -> String {
    "_ninja.c".to_string()
}

fn default_copy_header() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            copy_header: default_copy_header(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load `cnobi.toml` from `dir` if it exists, defaults otherwise.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading configuration");
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        let unrecognized = match self.parser.unrecognized {
            Unrecognized::Warn => UnrecognizedPolicy::Warn,
            Unrecognized::Error => UnrecognizedPolicy::Error,
        };
        ParseOptions { unrecognized }
    }
}
