use concatenate_core::config::LoadedConfig;
use std::path::Path;

use crate::output::{print_json, print_table};

pub fn run(root: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    let loaded = LoadedConfig::load(root, name)?;

    if json {
        return print_json(&serde_json::json!({
            "name": loaded.name,
            "path": loaded.path,
            "format": loaded.format,
            "type": loaded.configuration.mode,
            "actions": loaded.configuration.actions,
        }));
    }

    println!("config: {}", loaded.path.display());
    println!("mode:   {}", loaded.configuration.mode);
    println!();

    let rows = loaded
        .configuration
        .actions
        .iter()
        .map(|a| {
            vec![
                a.selectable_id().unwrap_or("-").to_string(),
                a.label.clone(),
                a.command.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "LABEL", "COMMAND"], rows);
    Ok(())
}
