#![deny(missing_docs)]
//! Shared logging utilities for the word frequency workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! the logger initialization used by the binary and a minimal test initializer
//! for the global logger.

use std::fs::File;
use std::io;
use std::path::PathBuf;

use log::{LevelFilter, SetLoggerError};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use thiserror::Error;

/// Default log file, relative to the current working directory.
pub const DEFAULT_LOG_FILE: &str = "./wordfreq.log";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to the given file only.
    File(PathBuf),
    /// Write to terminal (stderr for warnings and errors, stdout otherwise).
    Terminal,
    /// Write to both the given file and the terminal.
    Both(PathBuf),
}

/// Reasons the global logger could not be installed.
#[derive(Debug, Error)]
pub enum LogInitError {
    /// The log file could not be created.
    #[error("cannot create log file {}: {source}", .path.display())]
    LogFile {
        /// Requested log file.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
    /// Another logger was installed first.
    #[error("a global logger is already installed")]
    AlreadySet(#[from] SetLoggerError),
}

/// Initializes the global logger with the specified destination and level.
///
/// Nothing is installed when the log file cannot be created.
pub fn initialize(destination: LogDestination, level: LevelFilter) -> Result<(), LogInitError> {
    let config = build_config();
    let terminal = |config: Config| -> Box<dyn SharedLogger> {
        TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)
    };

    let loggers = match destination {
        LogDestination::File(path) => vec![file_logger(path, level, config)?],
        LogDestination::Terminal => vec![terminal(config)],
        LogDestination::Both(path) => {
            vec![terminal(config.clone()), file_logger(path, level, config)?]
        }
    };
    CombinedLogger::init(loggers)?;
    Ok(())
}

/// Like [`initialize`], but logs to the terminal when the log file cannot be
/// created. Returns the destination actually in use.
pub fn initialize_or_fallback(
    destination: LogDestination,
    level: LevelFilter,
) -> Result<LogDestination, LogInitError> {
    match initialize(destination.clone(), level) {
        Ok(()) => Ok(destination),
        Err(LogInitError::LogFile { path, source }) => {
            initialize(LogDestination::Terminal, level)?;
            engine_warn!(
                "Cannot create log file {}: {}; logging to the terminal",
                path.display(),
                source
            );
            Ok(LogDestination::Terminal)
        }
        Err(err) => Err(err),
    }
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn file_logger(
    path: PathBuf,
    level: LevelFilter,
    config: Config,
) -> Result<Box<dyn SharedLogger>, LogInitError> {
    match File::create(&path) {
        Ok(file) => Ok(WriteLogger::new(level, config, file)),
        Err(source) => Err(LogInitError::LogFile { path, source }),
    }
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the result if a logger was already set by another test.
    let _ = initialize(LogDestination::Terminal, level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_log_directory_installs_nothing() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("no_such_dir").join("wordfreq.log");
        let err = initialize(LogDestination::File(path.clone()), LevelFilter::Info).unwrap_err();
        assert!(matches!(err, LogInitError::LogFile { path: ref failed, .. } if *failed == path));
        assert!(!path.exists());
    }

    #[test]
    fn unusable_log_file_falls_back_to_the_terminal() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("no_such_dir").join("wordfreq.log");
        // Another test may already own the global logger.
        match initialize_or_fallback(LogDestination::Both(path.clone()), LevelFilter::Info) {
            Ok(destination) => assert_eq!(destination, LogDestination::Terminal),
            Err(err) => assert!(matches!(err, LogInitError::AlreadySet(_)), "{err}"),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_initializer_is_repeatable() {
        initialize_for_tests();
        initialize_for_tests();
        engine_debug!("logger initialized twice without panicking");
    }
}
