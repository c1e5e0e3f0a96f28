use std::path::PathBuf;

use thiserror::Error;

use crate::schema::Violations;

#[derive(Debug, Error)]
pub enum ConcatenateError {
    #[error("could not find the configuration directory: {}", .0.display())]
    ConfigDirMissing(PathBuf),

    #[error("There was an issue trying to find the configuration file for {name} ({found} candidates found, expected exactly 1)")]
    ConfigDiscovery { name: String, found: usize },

    #[error("There was an issue trying to read the configuration file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("There was an issue trying to parse the configuration file {}: {message}", .path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("invalid configuration:\n{0}")]
    SchemaValidation(Violations),

    #[error("Duplicate action IDs found in configuration: {}. Each action must have a unique ID.", .0.join(", "))]
    DuplicateIdentifier(Vec<String>),

    #[error("The following action IDs were not found: {}. Available IDs: {}", .missing.join(", "), available_ids(.available))]
    UnknownIdentifier {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("Some tasks failed")]
    RunFailed,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn available_ids(ids: &[String]) -> String {
    if ids.is_empty() {
        "(none - no actions have IDs defined)".to_string()
    } else {
        ids.join(", ")
    }
}

pub type Result<T> = std::result::Result<T, ConcatenateError>;
