use anyhow::Context;
use concatenate_core::present::Presenter;
use concatenate_core::Plan;
use std::path::Path;

use crate::output::print_json;

pub fn run(root: &Path, name: &str, ids: &[String], json: bool) -> anyhow::Result<()> {
    let plan = Plan::build(root, name, ids)?;
    tracing::info!(
        config = %plan.config.path.display(),
        mode = %plan.config.configuration.mode,
        actions = plan.actions.len(),
        "running configuration"
    );

    let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let outcome = rt.block_on(plan.execute(root));

    if json {
        print_json(&outcome)?;
        if outcome.failed() {
            return Err(concatenate_core::ConcatenateError::RunFailed.into());
        }
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut presenter = Presenter::new(stdout.lock());
    presenter.status_lines(&plan.actions, &outcome)?;
    presenter.present(&outcome)?;
    Ok(())
}
