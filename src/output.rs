// file: src/output.rs
// version: 1.0.0
// guid: 4a7c0e2d-b85f-4139-9d6e-f3a2c1b8e057

//! Where child process output goes while a command runs
//!
//! Callers pick a sink; the runner asks it whether to connect the child's
//! stdout/stderr to ours or discard them.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""];

/// Destination for a running tool's output
pub trait OutputSink: Send + Sync {
    /// Connect the child's stdout/stderr to the caller's
    fn passthrough(&self) -> bool;

    /// A step described by `message` is starting
    fn begin(&self, message: &str);

    /// The current step is over, successfully or not
    fn end(&self);
}

/// Streams tool output straight to the terminal
#[derive(Debug, Default)]
pub struct Passthrough;

impl OutputSink for Passthrough {
    fn passthrough(&self) -> bool {
        true
    }

    fn begin(&self, message: &str) {
        tracing::debug!("{}", message);
    }

    fn end(&self) {}
}

/// Discards tool output and shows a spinner instead
#[derive(Default)]
pub struct SpinnerSink {
    bar: Mutex<Option<ProgressBar>>,
}

impl SpinnerSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .tick_strings(SPINNER_FRAMES)
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl OutputSink for SpinnerSink {
    fn passthrough(&self) -> bool {
        false
    }

    fn begin(&self, message: &str) {
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::style());
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.bar.lock() {
            if let Some(previous) = slot.replace(bar) {
                previous.finish_and_clear();
            }
        }
    }

    fn end(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }
}

impl Drop for SpinnerSink {
    fn drop(&mut self) {
        self.end();
    }
}

/// Pass-through when verbose, spinner otherwise
pub fn sink_for(verbose: bool) -> Box<dyn OutputSink> {
    if verbose {
        Box::new(Passthrough)
    } else {
        Box::new(SpinnerSink::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_selection() {
        assert!(sink_for(true).passthrough());
        assert!(!sink_for(false).passthrough());
    }

    #[test]
    fn test_spinner_begin_end_is_repeatable() {
        let sink = SpinnerSink::new();
        sink.begin(" Building application web...");
        sink.begin(" Installing application web...");
        sink.end();
        sink.end();
        assert!(sink.bar.lock().unwrap().is_none());
    }
}
