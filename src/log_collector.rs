//! Run logging backend for the `log` facade.
//!
//! Every record goes to stderr; when a log directory is configured it is also
//! appended to `<dir>/run_<timestamp>.log`. The run is single-threaded, so the
//! file handle sits behind a plain mutex and each line is written inline.
//!
//! ```text
//! log::info!(...)
//!     |
//! [LogCollector]
//!     |
//! +---+---+
//! |       |
//! v       v
//! stderr  logs/run_<ts>.log
//! ```

use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A formatted log line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
}

impl LogLine {
    pub fn new(level: log::Level, target: &str, message: String) -> Self {
        LogLine {
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
            level: level.to_string(),
            target: target.to_string(),
            message,
        }
    }

    /// `[HH:MM:SS.mmm] LEVEL [target] message`
    pub fn render(&self) -> String {
        format!(
            "[{}] {:<5} [{}] {}",
            self.timestamp, self.level, self.target, self.message
        )
    }
}

/// Logger writing to stderr and, optionally, a per-run file.
pub struct LogCollector {
    level: LevelFilter,
    file: Option<Mutex<File>>,
    file_path: Option<PathBuf>,
}

impl LogCollector {
    /// Stderr-only collector
    pub fn new(level: LevelFilter) -> Self {
        LogCollector {
            level,
            file: None,
            file_path: None,
        }
    }

    /// Collector that also appends to a fresh run log in `log_dir`
    pub fn with_log_dir(level: LevelFilter, log_dir: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(log_dir)?;
        let path = log_dir.join(format!("run_{}.log", Local::now().format("%Y%m%d_%H%M%S")));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(LogCollector {
            level,
            file: Some(Mutex::new(file)),
            file_path: Some(path),
        })
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Register as the global logger.
    pub fn install(self) -> Result<(), SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self)).map(|()| log::set_max_level(level))
    }
}

impl Log for LogCollector {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = LogLine::new(record.level(), record.target(), record.args().to_string()).render();
        eprintln!("{}", line);

        if let Some(file) = &self.file {
            if let Ok(mut handle) = file.lock() {
                // A failed log write must not abort the run.
                let _ = writeln!(handle, "{}", line);
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut handle) = file.lock() {
                let _ = handle.flush();
            }
        }
    }
}

/// Install the global logger. `verbose` lowers the threshold to debug.
pub fn initialize_logging(verbose: bool, log_dir: Option<&Path>) -> Result<Option<PathBuf>, String> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let collector = match log_dir {
        Some(dir) => LogCollector::with_log_dir(level, dir)
            .map_err(|e| format!("Failed to create run log in {}: {}", dir.display(), e))?,
        None => LogCollector::new(level),
    };
    let path = collector.file_path().map(Path::to_path_buf);

    collector
        .install()
        .map_err(|e| format!("Failed to register logger: {}", e))?;
    Ok(path)
}
