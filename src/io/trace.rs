//! Timestamped execution trace for a generation run
//!
//! The trace is handed explicitly to whatever does the work and read back by
//! the caller afterwards; there is no process-wide timing state.

use std::time::{Duration, Instant};

/// One recorded event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    /// What happened
    pub label: String,
    /// Time since the trace started
    pub elapsed: Duration,
}

/// Accumulates labelled timestamps
#[derive(Debug, Clone)]
pub struct GenerationTrace {
    started: Instant,
    events: Vec<TraceEvent>,
}

impl Default for GenerationTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationTrace {
    /// Start a trace now, with a "Start" event at zero
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            events: vec![TraceEvent {
                label: "Start".to_string(),
                elapsed: Duration::ZERO,
            }],
        }
    }

    /// Record an event at the current time
    pub fn record(&mut self, label: impl Into<String>) {
        self.events.push(TraceEvent {
            label: label.into(),
            elapsed: self.started.elapsed(),
        });
    }

    /// All events in recording order
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Label of the most recent event
    pub fn last_label(&self) -> Option<&str> {
        self.events.last().map(|event| event.label.as_str())
    }

    /// Time between the first and last events
    pub fn total(&self) -> Duration {
        self.events
            .last()
            .map_or(Duration::ZERO, |event| event.elapsed)
    }

    /// Human-readable report: each event with the time since the previous
    /// one, then the total
    pub fn report(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .events
            .windows(2)
            .filter_map(|pair| match pair {
                [previous, event] => Some(format!(
                    "{} ({:.4} seconds since last)",
                    event.label,
                    event.elapsed.saturating_sub(previous.elapsed).as_secs_f64()
                )),
                _ => None,
            })
            .collect();
        lines.push(format!(
            "Total execution time: {:.4} seconds",
            self.total().as_secs_f64()
        ));
        lines
    }
}
