use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Exit code recorded when a process could not be launched or waited on, or
/// was terminated by a signal.
pub const SYNTHETIC_EXIT_CODE: i32 = -1;

// ---------------------------------------------------------------------------
// ExecutionReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// stderr followed by stdout, trimmed. Shown for failed actions.
    pub message: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl ExecutionReport {
    pub fn new(
        title: impl Into<String>,
        id: Option<String>,
        exit_code: i32,
        stdout: String,
        stderr: String,
        started_at: DateTime<Utc>,
        duration_ms: u64,
    ) -> Self {
        let message = combine_output(&stderr, &stdout);
        Self {
            title: title.into(),
            id,
            exit_code,
            stdout,
            stderr,
            message,
            started_at,
            duration_ms,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

fn combine_output(stderr: &str, stdout: &str) -> String {
    format!("{stderr}\n\n{stdout}").trim().to_string()
}

// ---------------------------------------------------------------------------
// RunContext
// ---------------------------------------------------------------------------

/// Append-only report collection shared by every action task of one run.
///
/// Clones share the same underlying list.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    reports: Arc<Mutex<Vec<ExecutionReport>>>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, report: ExecutionReport) {
        // A poisoned lock still holds every report pushed before the panic.
        let mut reports = self.reports.lock().unwrap_or_else(|e| e.into_inner());
        reports.push(report);
    }

    /// Snapshot of the reports recorded so far, in insertion order.
    pub fn reports(&self) -> Vec<ExecutionReport> {
        self.reports
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
