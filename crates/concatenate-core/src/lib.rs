pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod paths;
pub mod present;
pub mod report;
pub mod scaffold;
pub mod schema;
pub mod select;
pub mod types;

pub use error::{ConcatenateError, Result};

use std::path::Path;

use config::LoadedConfig;
use engine::{Engine, RunOutcome};
use types::Action;

/// A loaded configuration narrowed to the actions that will run.
#[derive(Debug, Clone)]
pub struct Plan {
    pub config: LoadedConfig,
    pub actions: Vec<Action>,
    /// Labels of actions skipped by selection because they have no id.
    pub unselectable: Vec<String>,
}

impl Plan {
    /// Load `name` from `root` and apply `ids`. An empty `ids` keeps every
    /// action.
    pub fn build(root: &Path, name: &str, ids: &[String]) -> Result<Self> {
        let config = LoadedConfig::load(root, name)?;
        if ids.is_empty() {
            let actions = config.configuration.actions.clone();
            return Ok(Self {
                config,
                actions,
                unselectable: Vec::new(),
            });
        }
        let selection = select::select(&config.configuration.actions, ids)?;
        tracing::debug!(
            config = %config.name,
            selected = selection.actions.len(),
            "narrowed actions by id"
        );
        Ok(Self {
            config,
            actions: selection.actions,
            unselectable: selection.unselectable,
        })
    }

    pub async fn execute(&self, root: &Path) -> RunOutcome {
        Engine::new(root)
            .execute(&self.actions, self.config.configuration.mode)
            .await
    }
}

/// Load, narrow, and execute a configuration. Action failures are reported
/// through [`RunOutcome::failed`], not as an error.
pub async fn run(root: &Path, name: &str, ids: &[String]) -> Result<RunOutcome> {
    let plan = Plan::build(root, name, ids)?;
    Ok(plan.execute(root).await)
}
