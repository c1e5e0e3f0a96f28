use crate::error::{ConcatenateError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CONFIG_DIR: &str = ".concatenate";

pub const DEFAULT_CONFIG_NAME: &str = "default";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_dir(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR)
}

/// Walk upward from `start` looking for a `.concatenate/` directory and
/// return the project root that contains it.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_DIR).is_dir())
        .map(Path::to_path_buf)
}

/// Candidate files for `name`: everything in the config directory matching
/// `<name>.*`, dot files included. Sorted for stable output.
pub fn config_candidates(root: &Path, name: &str) -> Result<Vec<PathBuf>> {
    let dir = config_dir(root);
    if !dir.is_dir() {
        return Err(ConcatenateError::ConfigDirMissing(dir));
    }
    let prefix = format!("{name}.");
    let mut found = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if file_name.len() > prefix.len() && file_name.starts_with(&prefix) {
            found.push(entry.path());
        }
    }
    found.sort();
    Ok(found)
}

/// Resolve `name` to exactly one configuration file.
pub fn resolve_config_file(root: &Path, name: &str) -> Result<PathBuf> {
    let mut candidates = config_candidates(root, name)?;
    if candidates.len() != 1 {
        return Err(ConcatenateError::ConfigDiscovery {
            name: name.to_string(),
            found: candidates.len(),
        });
    }
    Ok(candidates.remove(0))
}

/// Names of every configuration file in the config directory, i.e. file
/// names up to their first dot. Deduplicated and sorted.
pub fn config_names(root: &Path) -> Result<Vec<String>> {
    let dir = config_dir(root);
    if !dir.is_dir() {
        return Err(ConcatenateError::ConfigDirMissing(dir));
    }
    let mut names = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        match file_name.split_once('.') {
            Some((name, ext)) if !name.is_empty() && !ext.is_empty() => {
                names.push(name.to_string());
            }
            _ => {}
        }
    }
    names.sort();
    names.dedup();
    Ok(names)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(config_dir(dir.path())).unwrap();
        dir
    }

    #[test]
    fn finds_root_from_nested_dir() {
        let dir = project();
        let nested = dir.path().join("src/deep");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_root(&nested).unwrap(), dir.path());
    }

    #[test]
    fn resolves_single_match() {
        let dir = project();
        std::fs::write(config_dir(dir.path()).join("check.yaml"), "").unwrap();
        std::fs::write(config_dir(dir.path()).join("checkout.yaml"), "").unwrap();
        let path = resolve_config_file(dir.path(), "check").unwrap();
        assert_eq!(path.file_name().unwrap(), "check.yaml");
    }

    #[test]
    fn ambiguous_match_is_an_error() {
        let dir = project();
        std::fs::write(config_dir(dir.path()).join("check.yaml"), "").unwrap();
        std::fs::write(config_dir(dir.path()).join("check.json"), "").unwrap();
        let err = resolve_config_file(dir.path(), "check").unwrap_err();
        assert!(matches!(err, ConcatenateError::ConfigDiscovery { found: 2, .. }));
    }

    #[test]
    fn missing_match_is_an_error() {
        let dir = project();
        let err = resolve_config_file(dir.path(), "nope").unwrap_err();
        assert!(matches!(err, ConcatenateError::ConfigDiscovery { found: 0, .. }));
    }

    #[test]
    fn missing_config_dir_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = resolve_config_file(dir.path(), "check").unwrap_err();
        assert!(matches!(err, ConcatenateError::ConfigDirMissing(_)));
    }

    #[test]
    fn names_are_deduplicated() {
        let dir = project();
        for f in ["fix.yaml", "check.yaml", "check.json"] {
            std::fs::write(config_dir(dir.path()).join(f), "").unwrap();
        }
        assert_eq!(config_names(dir.path()).unwrap(), vec!["check", "fix"]);
    }
}
