use crate::error::{ConcatenateError, Result};
use crate::paths;
use crate::types::Configuration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigFormat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "json" | "json5" => Ok(ConfigFormat::Json),
            _ => Err(ConcatenateError::UnsupportedFormat(format!(".{ext}"))),
        }
    }

    /// Extension used when writing new files.
    pub fn extension(self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Json => "json",
        }
    }

    /// Parse text into an untyped value. JSON files go through the JSON5
    /// parser, which also accepts plain JSON.
    pub fn parse(self, data: &str) -> std::result::Result<serde_json::Value, String> {
        match self {
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| e.to_string()),
            ConfigFormat::Json => json5::from_str(data).map_err(|e| e.to_string()),
        }
    }

    pub fn render(self, cfg: &Configuration) -> Result<String> {
        match self {
            ConfigFormat::Yaml => Ok(serde_yaml::to_string(cfg)?),
            ConfigFormat::Json => {
                let mut out = serde_json::to_string_pretty(cfg)?;
                out.push('\n');
                Ok(out)
            }
        }
    }
}

impl std::str::FromStr for ConfigFormat {
    type Err = ConcatenateError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "json" | "json5" => Ok(ConfigFormat::Json),
            other => Err(ConcatenateError::UnsupportedFormat(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// LoadedConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub name: String,
    pub path: PathBuf,
    pub format: ConfigFormat,
    pub configuration: Configuration,
}

impl LoadedConfig {
    /// Find, read, parse, and validate the configuration called `name`
    /// inside `root/.concatenate/`.
    pub fn load(root: &Path, name: &str) -> Result<Self> {
        let path = paths::resolve_config_file(root, name)?;
        tracing::debug!(config = %path.display(), "resolved configuration file");

        let data = std::fs::read_to_string(&path).map_err(|source| ConcatenateError::ConfigRead {
            path: path.clone(),
            source,
        })?;
        let format = ConfigFormat::from_path(&path)?;
        let value = format
            .parse(&data)
            .map_err(|message| ConcatenateError::ConfigParse {
                path: path.clone(),
                message,
            })?;
        let configuration = Configuration::from_value(&value)?;

        Ok(Self {
            name: name.to_string(),
            path,
            format,
            configuration,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
