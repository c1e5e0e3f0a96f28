use concatenate_core::paths;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::output::{print_json, print_table};

#[derive(Serialize)]
struct ConfigEntry {
    name: String,
    files: Vec<PathBuf>,
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let mut entries = Vec::new();
    for name in paths::config_names(root)? {
        let files = paths::config_candidates(root, &name)?;
        entries.push(ConfigEntry { name, files });
    }

    if json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        println!("No configurations found. Run `concatenate init` to create some.");
        return Ok(());
    }

    let rows = entries
        .iter()
        .map(|e| {
            let file = match e.files.as_slice() {
                [only] => only
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                many => format!("ambiguous ({} files)", many.len()),
            };
            vec![e.name.clone(), file]
        })
        .collect();
    print_table(&["NAME", "FILE"], rows);
    Ok(())
}
