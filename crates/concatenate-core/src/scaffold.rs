//! Default configurations written by `concatenate init`.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::ConfigFormat;
use crate::error::Result;
use crate::io;
use crate::paths;
use crate::types::{Action, Configuration, Mode};

/// `check` runs every checker at once; `fix` applies fixers one by one.
pub fn default_configurations() -> Vec<(&'static str, Configuration)> {
    vec![
        (
            "check",
            Configuration::new(
                Mode::Parallel,
                vec![
                    Action::new("Checking with ESLint", "eslint . --format pretty").with_id("eslint"),
                    Action::new("Checking with Prettier", "prettier --list-different --cache .")
                        .with_id("prettier"),
                    Action::new("Checking with Knip", "knip").with_id("knip"),
                    Action::new("Checking with TSC", "tsc --noEmit").with_id("tsc"),
                ],
            ),
        ),
        (
            "fix",
            Configuration::new(
                Mode::Series,
                vec![
                    Action::new("Fixing with ESLint", "eslint . --format pretty --fix")
                        .with_id("eslint"),
                    Action::new(
                        "Fixing with Prettier",
                        "prettier --write --list-different --cache .",
                    )
                    .with_id("prettier"),
                ],
            ),
        ),
    ]
}

#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldedFile {
    pub name: String,
    pub path: PathBuf,
    pub written: bool,
}

/// Write the default configurations into `root/.concatenate/`.
///
/// Existing files are left alone unless `force` is set. A configuration whose
/// name already exists under another extension is skipped too, since a second
/// file would make the name ambiguous.
pub fn scaffold(root: &Path, format: ConfigFormat, force: bool) -> Result<Vec<ScaffoldedFile>> {
    let dir = paths::config_dir(root);
    std::fs::create_dir_all(&dir)?;

    let mut files = Vec::new();
    for (name, cfg) in default_configurations() {
        let path = dir.join(format!("{name}.{}", format.extension()));
        let data = format.render(&cfg)?;

        let other = paths::config_candidates(root, name)?
            .into_iter()
            .find(|p| p != &path);
        if let Some(other) = other {
            tracing::debug!(config = %other.display(), "configuration exists in another format");
            files.push(ScaffoldedFile {
                name: name.to_string(),
                path: other,
                written: false,
            });
            continue;
        }

        let written = io::write_config_file(&path, &data, force)?;

        if written {
            tracing::info!(config = %path.display(), "wrote configuration");
        } else {
            tracing::debug!(config = %path.display(), "configuration already present");
        }
        files.push(ScaffoldedFile {
            name: name.to_string(),
            path,
            written,
        });
    }
    Ok(files)
}
