use std::io::Write;

use console::style;

use crate::engine::RunOutcome;
use crate::error::{ConcatenateError, Result};
use crate::types::{Action, Mode};

pub const SEPARATOR: &str = "---------------------------------";

/// Renders a finished run for humans.
pub struct Presenter<W: Write> {
    out: W,
}

impl<W: Write> Presenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// One line per report in recorded order, then one per action a series
    /// run never reached.
    pub fn status_lines(&mut self, planned: &[Action], outcome: &RunOutcome) -> Result<()> {
        for report in &outcome.reports {
            if report.succeeded() {
                writeln!(
                    self.out,
                    "  \u{2713} {} ({}ms)",
                    report.title, report.duration_ms
                )?;
            } else {
                writeln!(
                    self.out,
                    "  \u{2717} {} (exit {}, {}ms)",
                    report.title, report.exit_code, report.duration_ms
                )?;
            }
        }
        if outcome.mode == Mode::Series {
            for action in planned.iter().skip(outcome.reports.len()) {
                writeln!(self.out, "  - {} (skipped)", action.label)?;
            }
        }
        Ok(())
    }

    /// Title, separator, and captured output for every failed report.
    pub fn render_failures(&mut self, outcome: &RunOutcome) -> Result<()> {
        for report in outcome.failures() {
            writeln!(self.out, "\n\n{}", style(&report.title).black().on_yellow())?;
            writeln!(self.out, "{SEPARATOR}")?;
            writeln!(self.out, "{}", report.message)?;
        }
        for fault in &outcome.faults {
            writeln!(self.out, "\n{}", style(fault).red())?;
        }
        Ok(())
    }

    /// Render failures if the run failed and turn that into an error.
    /// Nothing is written for a successful run.
    pub fn present(&mut self, outcome: &RunOutcome) -> Result<()> {
        if !outcome.failed() {
            return Ok(());
        }
        self.render_failures(outcome)?;
        Err(ConcatenateError::RunFailed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
