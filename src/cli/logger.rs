//! A small [`log::Log`] backend for the binary.
//!
//! Records go to stderr in the same `[source] message` shape as every other
//! line the CLI prints, so library logging blends in with the REPL.

use colored::Colorize;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::cli::messages::{system_message, warning_message};

pub(crate) struct CliLogger {
    level: LevelFilter,
}

impl CliLogger {
    pub(crate) fn new(level: LevelFilter) -> CliLogger {
        CliLogger { level }
    }

    pub(crate) fn format(&self, record: &Record) -> String {
        let source = record.level().as_str().to_lowercase();
        let message = record.args().to_string();

        match record.level() {
            Level::Error | Level::Warn => warning_message(&source, message),
            Level::Info => system_message(&source, message),
            Level::Debug | Level::Trace => system_message(&source, message.dimmed().to_string()),
        }
    }
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", self.format(record));
        }
    }

    fn flush(&self) {}
}

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    //! Install the CLI logger for the rest of the process.
    //!
    //! Fails when a logger has already been installed.

    let logger: &'static CliLogger = Box::leak(Box::new(CliLogger::new(level)));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}
