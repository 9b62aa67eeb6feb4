//! Terminal output helpers

use std::time::Duration;

use anyhow::Result;
use colored::*;
use modelscope_core::catalog::{ModelKind, validate_model};
use modelscope_core::domain::job::{JobHandle, JobStatus};
use modelscope_runner::PollObserver;
use serde::Serialize;

/// Prints a value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Warns when a model is not part of the built-in catalog
///
/// The API may still accept it, so this never fails the command.
pub fn check_model(kind: ModelKind, model: &str) {
    if let Err(e) = validate_model(kind, model) {
        eprintln!("{} {}", "warning:".yellow().bold(), e);
    }
}

/// Prints image job progress to stderr
pub struct ProgressPrinter {
    budget: Duration,
}

impl ProgressPrinter {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }
}

impl PollObserver for ProgressPrinter {
    fn on_status(&self, handle: &JobHandle, attempt: u32, status: &JobStatus, elapsed: Duration) {
        let percent = (elapsed.as_secs_f64() / self.budget.as_secs_f64() * 100.0).min(100.0);
        eprintln!(
            "  {} {} {} (attempt {}, {:.0}s elapsed, {:.0}% of timeout)",
            "▸".cyan(),
            handle.as_str().dimmed(),
            colorize_status(status),
            attempt,
            elapsed.as_secs_f64(),
            percent
        );
    }
}

/// Colorize job status for display
pub fn colorize_status(status: &JobStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        JobStatus::Succeeded => text.green(),
        JobStatus::Failed => text.red(),
        JobStatus::Running => text.yellow(),
        JobStatus::Pending => text.blue(),
        JobStatus::Unknown(_) => text.dimmed(),
    }
}
