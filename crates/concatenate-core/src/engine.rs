//! Process execution for configured actions.
//!
//! Every action runs through the same [`ActionTask`]: spawn the command via
//! the host shell, buffer stdout/stderr, and record exactly one
//! [`ExecutionReport`] in the shared [`RunContext`]. A [`Scheduler`] decides
//! ordering and failure policy:
//!
//! - [`Series`]: one at a time, stop after the first non-zero exit.
//! - [`Parallel`]: launch all, wait for all, never cancel siblings.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::process::{Child, Command};
use tokio::task::JoinSet;

use crate::report::{ExecutionReport, RunContext, SYNTHETIC_EXIT_CODE};
use crate::types::{Action, Mode};

/// Environment added to every child so tools keep their colored output even
/// though stdout is a pipe.
const FORCED_COLOR_ENV: &[(&str, &str)] = &[("FORCE_COLOR", "1"), ("CLICOLOR_FORCE", "1")];

// ---------------------------------------------------------------------------
// ActionTask
// ---------------------------------------------------------------------------

/// Runs single actions in `cwd` and records their reports into `context`.
#[derive(Debug, Clone)]
pub struct ActionTask {
    cwd: PathBuf,
    context: RunContext,
}

impl ActionTask {
    pub fn new(cwd: impl Into<PathBuf>, context: RunContext) -> Self {
        Self {
            cwd: cwd.into(),
            context,
        }
    }

    /// Spawn the action's process without waiting for it.
    ///
    /// Spawning is synchronous, so callers that launch in a loop start
    /// processes in loop order.
    pub fn launch(&self, action: &Action) -> Pending {
        let started_at = Utc::now();
        let clock = Instant::now();
        tracing::info!(action = %action.label, command = %action.command, "launching action");

        let spawned = shell_command(&action.command)
            .current_dir(&self.cwd)
            .envs(FORCED_COLOR_ENV.iter().copied())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let state = match spawned {
            Ok(child) => PendingState::Running(child),
            Err(e) => {
                tracing::debug!(action = %action.label, error = %e, "failed to launch action");
                PendingState::LaunchFailed(format!(
                    "failed to launch '{}': {e}",
                    action.command
                ))
            }
        };

        Pending {
            action: action.clone(),
            started_at,
            clock,
            state,
            context: self.context.clone(),
        }
    }

    /// Launch, wait, and record. Returns the recorded report.
    pub async fn run(&self, action: &Action) -> ExecutionReport {
        self.launch(action).settle().await
    }
}

enum PendingState {
    Running(Child),
    LaunchFailed(String),
}

/// A launched action that has not settled yet.
pub struct Pending {
    action: Action,
    started_at: DateTime<Utc>,
    clock: Instant,
    state: PendingState,
    context: RunContext,
}

impl Pending {
    /// Wait for the process to exit, record its report, and return it.
    pub async fn settle(self) -> ExecutionReport {
        let (exit_code, stdout, stderr) = match self.state {
            PendingState::LaunchFailed(message) => (SYNTHETIC_EXIT_CODE, String::new(), message),
            PendingState::Running(child) => match child.wait_with_output().await {
                Ok(output) => (
                    output.status.code().unwrap_or(SYNTHETIC_EXIT_CODE),
                    String::from_utf8_lossy(&output.stdout).into_owned(),
                    String::from_utf8_lossy(&output.stderr).into_owned(),
                ),
                Err(e) => (SYNTHETIC_EXIT_CODE, String::new(), format!("wait failed: {e}")),
            },
        };

        let report = ExecutionReport::new(
            self.action.label.clone(),
            self.action.id.clone(),
            exit_code,
            stdout,
            stderr,
            self.started_at,
            self.clock.elapsed().as_millis() as u64,
        );
        tracing::debug!(
            action = %report.title,
            exit_code = report.exit_code,
            duration_ms = report.duration_ms,
            "action settled"
        );
        self.context.record(report.clone());
        report
    }
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    // cmd.exe does its own parsing; the line must reach it unquoted.
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").raw_arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Ordering and failure policy for a list of actions.
///
/// Implementations drive [`ActionTask`] and return scheduling faults: problems
/// that prevented an action from producing a report at all. Action failures
/// are not faults; they live in the reports.
#[async_trait]
pub trait Scheduler: Send + Sync {
    fn mode(&self) -> Mode;

    async fn schedule(&self, actions: &[Action], task: &ActionTask) -> Vec<String>;
}

pub fn scheduler_for(mode: Mode) -> Box<dyn Scheduler> {
    match mode {
        Mode::Series => Box::new(Series),
        Mode::Parallel => Box::new(Parallel),
    }
}

/// One action at a time; stop after the first failure.
pub struct Series;

#[async_trait]
impl Scheduler for Series {
    fn mode(&self) -> Mode {
        Mode::Series
    }

    async fn schedule(&self, actions: &[Action], task: &ActionTask) -> Vec<String> {
        for (i, action) in actions.iter().enumerate() {
            let report = task.run(action).await;
            if !report.succeeded() {
                let skipped = actions.len() - i - 1;
                if skipped > 0 {
                    tracing::info!(
                        action = %action.label,
                        skipped,
                        "action failed; skipping remaining actions"
                    );
                }
                break;
            }
        }
        Vec::new()
    }
}

/// All actions at once; wait for every one of them.
pub struct Parallel;

#[async_trait]
impl Scheduler for Parallel {
    fn mode(&self) -> Mode {
        Mode::Parallel
    }

    async fn schedule(&self, actions: &[Action], task: &ActionTask) -> Vec<String> {
        let mut tasks = JoinSet::new();
        for action in actions {
            let pending = task.launch(action);
            tasks.spawn(async move {
                pending.settle().await;
            });
        }

        let mut faults = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "action task did not complete");
                faults.push(format!("action task did not complete: {e}"));
            }
        }
        faults
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Result of one run: every recorded report plus any scheduling faults.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub mode: Mode,
    pub reports: Vec<ExecutionReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub faults: Vec<String>,
}

impl RunOutcome {
    /// A run fails on any scheduling fault or any non-zero report.
    pub fn failed(&self) -> bool {
        !self.faults.is_empty() || self.reports.iter().any(|r| !r.succeeded())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ExecutionReport> {
        self.reports.iter().filter(|r| !r.succeeded())
    }
}

/// Runs actions with the project root as working directory.
#[derive(Debug, Clone)]
pub struct Engine {
    cwd: PathBuf,
}

impl Engine {
    pub fn new(project_root: &Path) -> Self {
        Self {
            cwd: project_root.to_path_buf(),
        }
    }

    pub async fn execute(&self, actions: &[Action], mode: Mode) -> RunOutcome {
        self.execute_with(scheduler_for(mode).as_ref(), actions).await
    }

    pub async fn execute_with(&self, scheduler: &dyn Scheduler, actions: &[Action]) -> RunOutcome {
        let context = RunContext::new();
        let task = ActionTask::new(self.cwd.clone(), context.clone());
        let faults = scheduler.schedule(actions, &task).await;
        RunOutcome {
            mode: scheduler.mode(),
            reports: context.reports(),
            faults,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn engine(dir: &TempDir) -> Engine {
        Engine::new(dir.path())
    }

    #[tokio::test]
    async fn captures_output_and_exit_code() {
        let dir = TempDir::new().unwrap();
        let actions = vec![Action::new("Echo", "echo out; echo err >&2; exit 3").with_id("echo")];
        let outcome = engine(&dir).execute(&actions, Mode::Series).await;

        assert_eq!(outcome.reports.len(), 1);
        let r = &outcome.reports[0];
        assert_eq!(r.title, "Echo");
        assert_eq!(r.id.as_deref(), Some("echo"));
        assert_eq!(r.exit_code, 3);
        assert_eq!(r.stdout, "out\n");
        assert_eq!(r.stderr, "err\n");
        assert_eq!(r.message, "err\n\n\nout");
        assert!(outcome.failed());
    }

    #[tokio::test]
    async fn parallel_records_every_action() {
        let dir = TempDir::new().unwrap();
        let actions = vec![Action::new("ok", "exit 0"), Action::new("bad", "exit 1")];
        let outcome = engine(&dir).execute(&actions, Mode::Parallel).await;

        assert!(outcome.failed());
        assert_eq!(outcome.reports.len(), 2);
        let failures: Vec<&str> = outcome.failures().map(|r| r.title.as_str()).collect();
        assert_eq!(failures, vec!["bad"]);
        assert!(outcome.reports.iter().any(|r| r.title == "ok" && r.exit_code == 0));
    }

    #[tokio::test]
    async fn parallel_does_not_cancel_siblings() {
        let dir = TempDir::new().unwrap();
        let actions = vec![
            Action::new("fails fast", "exit 1"),
            Action::new("finishes later", "sleep 0.2; touch done"),
        ];
        let outcome = engine(&dir).execute(&actions, Mode::Parallel).await;

        assert_eq!(outcome.reports.len(), 2);
        assert!(dir.path().join("done").exists());
    }

    #[tokio::test]
    async fn parallel_runs_concurrently() {
        let dir = TempDir::new().unwrap();
        let actions: Vec<Action> = (0..4)
            .map(|i| Action::new(format!("sleep-{i}"), "sleep 0.3"))
            .collect();
        let start = Instant::now();
        let outcome = engine(&dir).execute(&actions, Mode::Parallel).await;
        assert!(!outcome.failed());
        assert!(start.elapsed().as_millis() < 1000);
    }

    #[tokio::test]
    async fn series_stops_after_first_failure() {
        let dir = TempDir::new().unwrap();
        let actions = vec![
            Action::new("A", "exit 1"),
            Action::new("B", "touch b-ran"),
        ];
        let outcome = engine(&dir).execute(&actions, Mode::Series).await;

        assert!(outcome.failed());
        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.reports[0].title, "A");
        assert!(!dir.path().join("b-ran").exists());
    }

    #[tokio::test]
    async fn series_keeps_configuration_order() {
        let dir = TempDir::new().unwrap();
        let actions = vec![
            Action::new("first", "sleep 0.1; echo 1 >> order"),
            Action::new("second", "echo 2 >> order"),
            Action::new("third", "echo 3 >> order"),
        ];
        let outcome = engine(&dir).execute(&actions, Mode::Series).await;

        assert!(!outcome.failed());
        let titles: Vec<&str> = outcome.reports.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
        let order = std::fs::read_to_string(dir.path().join("order")).unwrap();
        assert_eq!(order, "1\n2\n3\n");
    }

    #[tokio::test]
    async fn runs_in_project_root_with_forced_color() {
        let dir = TempDir::new().unwrap();
        let actions = vec![Action::new("env", "pwd; echo \"$FORCE_COLOR\"")];
        let outcome = engine(&dir).execute(&actions, Mode::Series).await;

        let lines: Vec<&str> = outcome.reports[0].stdout.lines().collect();
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(
            std::path::Path::new(lines[0]).canonicalize().unwrap(),
            expected
        );
        assert_eq!(lines[1], "1");
    }

    #[tokio::test]
    async fn launch_failure_becomes_a_report() {
        let missing = std::path::Path::new("/definitely/not/a/real/dir");
        let outcome = Engine::new(missing)
            .execute(&[Action::new("nowhere", "true")], Mode::Parallel)
            .await;

        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.reports[0].exit_code, SYNTHETIC_EXIT_CODE);
        assert!(outcome.reports[0].message.contains("failed to launch"));
        assert!(outcome.failed());
    }

    #[tokio::test]
    async fn series_stops_after_launch_failure() {
        let missing = std::path::Path::new("/definitely/not/a/real/dir");
        let actions = vec![
            Action::new("first", "true").with_id("first"),
            Action::new("second", "true").with_id("second"),
        ];
        let outcome = Engine::new(missing).execute(&actions, Mode::Series).await;

        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.reports[0].title, "first");
        assert_eq!(outcome.reports[0].exit_code, SYNTHETIC_EXIT_CODE);
        assert!(outcome.faults.is_empty());
        assert!(outcome.failed());
    }

    #[cfg(windows)]
    #[tokio::test]
    async fn windows_command_line_reaches_cmd_verbatim() {
        let dir = TempDir::new().unwrap();
        let report = ActionTask::new(dir.path(), RunContext::new())
            .run(&Action::new("quoted", r#"echo "a b""#))
            .await;
        assert_eq!(report.exit_code, 0);
        assert_eq!(report.stdout.trim(), r#""a b""#);
    }

    #[tokio::test]
    async fn unknown_command_is_a_failed_report() {
        let dir = TempDir::new().unwrap();
        let outcome = engine(&dir)
            .execute(
                &[Action::new("missing", "definitely-not-a-command-xyz")],
                Mode::Series,
            )
            .await;
        assert_eq!(outcome.reports.len(), 1);
        assert_ne!(outcome.reports[0].exit_code, 0);
        assert!(!outcome.reports[0].stderr.is_empty());
    }

    #[tokio::test]
    async fn empty_action_list_succeeds() {
        let dir = TempDir::new().unwrap();
        for mode in Mode::all() {
            let outcome = engine(&dir).execute(&[], *mode).await;
            assert!(outcome.reports.is_empty());
            assert!(!outcome.failed());
        }
    }

    #[tokio::test]
    async fn repeated_runs_are_equivalent() {
        let dir = TempDir::new().unwrap();
        let actions = vec![Action::new("one", "true"), Action::new("two", "echo hi")];
        let e = engine(&dir);
        let first = e.execute(&actions, Mode::Parallel).await;
        let second = e.execute(&actions, Mode::Parallel).await;

        let shape = |o: &RunOutcome| {
            let mut v: Vec<(String, i32)> = o
                .reports
                .iter()
                .map(|r| (r.title.clone(), r.exit_code))
                .collect();
            v.sort();
            v
        };
        assert_eq!(shape(&first), shape(&second));
        assert!(first.reports.iter().all(|r| r.exit_code == 0));
    }

    #[test]
    fn scheduler_matches_mode() {
        assert_eq!(scheduler_for(Mode::Series).mode(), Mode::Series);
        assert_eq!(scheduler_for(Mode::Parallel).mode(), Mode::Parallel);
    }

    #[test]
    fn outcome_with_fault_is_failed_even_without_reports() {
        let outcome = RunOutcome {
            mode: Mode::Parallel,
            reports: Vec::new(),
            faults: vec!["task panicked".to_string()],
        };
        assert!(outcome.failed());
    }
}
