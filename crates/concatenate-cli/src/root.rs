use concatenate_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the project root.
///
/// Priority:
/// 1. `--root` flag / `CONCATENATE_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from the current directory looking for `.concatenate/`
/// 3. Walk upward looking for `.git/`
/// 4. Fall back to the current directory
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    discover_root(&cwd)
}

fn discover_root(start: &Path) -> PathBuf {
    if let Some(root) = paths::find_project_root(start) {
        return root;
    }
    start
        .ancestors()
        .find(|dir| dir.join(".git").is_dir())
        .unwrap_or(start)
        .to_path_buf()
}
