use anyhow::Context;
use concatenate_core::config::ConfigFormat;
use concatenate_core::scaffold;
use std::path::Path;

use crate::output::print_json;

pub fn run(root: &Path, format: ConfigFormat, force: bool, json: bool) -> anyhow::Result<()> {
    let files = scaffold::scaffold(root, format, force)
        .with_context(|| format!("failed to scaffold configurations in {}", root.display()))?;

    if json {
        return print_json(&files);
    }

    println!("Initializing concatenate in: {}", root.display());
    for file in &files {
        let shown = file.path.strip_prefix(root).unwrap_or(&file.path);
        if file.written {
            println!("  created: {}", shown.display());
        } else {
            println!("  exists:  {} ({})", shown.display(), file.name);
        }
    }
    Ok(())
}
