//! `log` backend for the binary
//!
//! Lines go through the progress display when one is active so they are
//! printed above the bars instead of tearing them; otherwise to stderr.

use indicatif::MultiProgress;
use log::{LevelFilter, Log, Metadata, Record};

use crate::io::error::{Result, invalid_configuration};

/// Writes log records above the progress bars
pub struct ProgressLogger {
    level: LevelFilter,
    multi_progress: Option<MultiProgress>,
}

impl ProgressLogger {
    /// Logger passing records at or above `level`
    pub const fn new(level: LevelFilter, multi_progress: Option<MultiProgress>) -> Self {
        Self {
            level,
            multi_progress,
        }
    }

    /// Text written for one record
    pub fn format_record(record: &Record<'_>) -> String {
        format!("[{:<5}] {}", record.level(), record.args())
    }

    /// Install as the global logger
    ///
    /// # Errors
    ///
    /// Returns [`crate::GenerationError::InvalidConfiguration`] if a logger
    /// is already installed.
    pub fn install(self) -> Result<()> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self)).map_err(|e| invalid_configuration(&e))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for ProgressLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    // Allow print for log output when no progress display is active
    #[allow(clippy::print_stderr)]
    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = Self::format_record(record);
        let printed = self
            .multi_progress
            .as_ref()
            .is_some_and(|multi| !multi.is_hidden() && multi.println(&line).is_ok());
        if !printed {
            eprintln!("{line}");
        }
    }

    fn flush(&self) {}
}

/// Verbosity from CLI flags: quiet shows errors only, each `-v` adds a level
pub const fn level_for(quiet: bool, verbose: u8) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
