//! Caller-owned log sink for the sensor-logger utility.
//!
//! The sink is constructed explicitly and passed to whoever needs it;
//! there is no process-wide logger registry. Each line goes to the log
//! file and to stdout in the same `<timestamp> - <LEVEL> - <message>`
//! shape.

use crate::error::{Result, UtilError};
use crate::format::local_timestamp;
use clap::ValueEnum;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Severity threshold for the data log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// File + console log sink with a severity threshold.
#[derive(Debug)]
pub struct LogSink {
    file: File,
    threshold: LogLevel,
}

impl LogSink {
    /// Open the sink, creating the log file.
    ///
    /// Without `append`, an existing file at `path` is a configuration
    /// error and nothing is written; the create is atomic (`create_new`)
    /// so the check cannot race with another process.
    pub fn create(path: &Path, threshold: LogLevel, append: bool) -> Result<Self> {
        let file = if append {
            OpenOptions::new().create(true).append(true).open(path)?
        } else {
            OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(path)
                .map_err(|err| {
                    if err.kind() == std::io::ErrorKind::AlreadyExists {
                        UtilError::config(format!(
                            "Log file '{}' already exists. Use --append to append or choose a different file.",
                            path.display()
                        ))
                    } else {
                        err.into()
                    }
                })?
        };
        Ok(Self { file, threshold })
    }

    /// Write one line to the file and to stdout, unless it falls below
    /// the severity threshold.
    pub fn log(&mut self, level: LogLevel, message: &str) -> Result<()> {
        if level < self.threshold {
            return Ok(());
        }
        let line = format!("{} - {} - {}", local_timestamp(), level, message);
        writeln!(self.file, "{line}")?;
        println!("{line}");
        Ok(())
    }

    pub fn debug(&mut self, message: &str) -> Result<()> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&mut self, message: &str) -> Result<()> {
        self.log(LogLevel::Info, message)
    }

    pub fn warning(&mut self, message: &str) -> Result<()> {
        self.log(LogLevel::Warning, message)
    }

    pub fn error(&mut self, message: &str) -> Result<()> {
        self.log(LogLevel::Error, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_log_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pi_utils_{}_{}.log", name, std::process::id()))
    }

    #[test]
    fn test_existing_file_without_append_is_rejected() {
        let path = temp_log_path("existing");
        fs::write(&path, "previous run\n").unwrap();

        let err = LogSink::create(&path, LogLevel::Info, false).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("already exists"));
        // Nothing was written over the prior contents.
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous run\n");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_keeps_prior_lines() {
        let path = temp_log_path("append");
        fs::write(&path, "first\n").unwrap();

        let mut sink = LogSink::create(&path, LogLevel::Info, true).unwrap();
        sink.info("second").unwrap();
        drop(sink);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("first\n"));
        assert!(contents.contains(" - INFO - second"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_line_format() {
        let path = temp_log_path("format");
        let _ = fs::remove_file(&path);

        let mut sink = LogSink::create(&path, LogLevel::Debug, false).unwrap();
        sink.warning("Pressure out of range").unwrap();
        drop(sink);

        let contents = fs::read_to_string(&path).unwrap();
        let line = contents.lines().next().unwrap();
        // <YYYY-MM-DD HH:MM:SS> - WARNING - <message>
        assert_eq!(&line[19..], " - WARNING - Pressure out of range");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_threshold_drops_lower_levels() {
        let path = temp_log_path("threshold");
        let _ = fs::remove_file(&path);

        let mut sink = LogSink::create(&path, LogLevel::Warning, false).unwrap();
        sink.debug("hidden").unwrap();
        sink.info("also hidden").unwrap();
        sink.error("kept").unwrap();
        drop(sink);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("hidden"));
        assert!(contents.contains(" - ERROR - kept"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_level_ordering_and_names() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert_eq!(LogLevel::Warning.to_string(), "WARNING");
    }
}
