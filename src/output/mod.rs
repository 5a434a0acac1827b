//! Step-oriented progress output.
//!
//! Bundling is a sequence of named steps (parse manifest, extract
//! dependencies, install, write target). [`TaskRunner`] gives each step a
//! spinner while it runs and a colored success or failure mark when it
//! finishes. With progress disabled (piped output, `--no-progress`) the same
//! information is printed as plain lines.

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Runs named steps with progress feedback.
#[derive(Debug, Clone)]
pub struct TaskRunner {
    progress: bool,
    quiet: bool,
}

impl TaskRunner {
    /// Create a runner. `progress` enables spinners, `quiet` suppresses all
    /// step output.
    #[must_use]
    pub fn new(progress: bool, quiet: bool) -> Self {
        Self {
            progress: progress && !quiet,
            quiet,
        }
    }

    /// Run `task` as a step named `label`.
    ///
    /// The step is marked successful when the closure returns `Ok` and
    /// failed when it returns `Err`; the error is propagated either way.
    pub fn run<T>(&self, label: &str, task: impl FnOnce() -> Result<T>) -> Result<T> {
        let spinner = self.start(label);
        let result = task();
        self.finish(spinner.as_ref(), label, result.is_ok());
        result
    }

    /// Run a step that can fail without producing an error.
    ///
    /// Returns the closure's verdict; a `false` verdict only marks the step
    /// as failed.
    pub fn attempt(&self, label: &str, task: impl FnOnce() -> bool) -> bool {
        let spinner = self.start(label);
        let succeeded = task();
        self.finish(spinner.as_ref(), label, succeeded);
        succeeded
    }

    /// Print a warning line outside any step.
    pub fn warn(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {message}", "warning:".yellow().bold());
        }
    }

    /// Print an informational line outside any step.
    pub fn note(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }

    fn start(&self, label: &str) -> Option<ProgressBar> {
        if !self.progress {
            return None;
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(label.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Some(spinner)
    }

    fn finish(&self, spinner: Option<&ProgressBar>, label: &str, succeeded: bool) {
        let mark = if succeeded {
            "✓".green().to_string()
        } else {
            "✗".red().to_string()
        };
        match spinner {
            Some(spinner) => spinner.finish_with_message(format!("{mark} {label}")),
            None if !self.quiet => println!("{mark} {label}"),
            None => {}
        }
    }
}

impl Default for TaskRunner {
    fn default() -> Self {
        Self::new(true, false)
    }
}
