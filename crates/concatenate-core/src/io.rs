use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write a configuration file through a tempfile next to it, so readers never
/// see a partial file.
///
/// An existing file is only replaced when `overwrite` is set. Returns whether
/// the file was written.
pub fn write_config_file(path: &Path, contents: &str, overwrite: bool) -> Result<bool> {
    if !overwrite && path.exists() {
        return Ok(false);
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(contents.as_bytes())?;
    staged.flush()?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(true)
}
