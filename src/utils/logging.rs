// Logging utilities
// Author: Gabriel Demetrios Lafis

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use log::{Level, LevelFilter, Metadata, Record};

use super::{AppError, AppResult};

/// Initialize logging with the given level, also appending to `file` when set
pub fn init_logging(level: LevelFilter, file: Option<&Path>) -> AppResult<()> {
    let logger = SimpleLogger::new(level, file)?;

    log::set_boxed_logger(Box::new(logger))
        .map(|()| log::set_max_level(level))
        .map_err(|e| AppError::Config(format!("logger already set: {}", e)))
}

/// Stdout logger with local timestamps and an optional plain-text log file
pub struct SimpleLogger {
    level: LevelFilter,
    file: Option<Mutex<File>>,
}

impl SimpleLogger {
    pub fn new(level: LevelFilter, file: Option<&Path>) -> io::Result<Self> {
        let file = match file {
            Some(path) => Some(Mutex::new(OpenOptions::new().create(true).append(true).open(path)?)),
            None => None,
        };

        Ok(SimpleLogger { level, file })
    }
}

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let level_str = match record.level() {
                Level::Error => "\x1B[31mERROR\x1B[0m",
                Level::Warn => "\x1B[33mWARN\x1B[0m",
                Level::Info => "\x1B[32mINFO\x1B[0m",
                Level::Debug => "\x1B[34mDEBUG\x1B[0m",
                Level::Trace => "\x1B[90mTRACE\x1B[0m",
            };
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

            println!("[{}] {} {}: {}",
                timestamp,
                level_str,
                record.target(),
                record.args()
            );

            if let Some(file) = &self.file {
                if let Ok(mut file) = file.lock() {
                    // Write errors are dropped
                    let _ = writeln!(file, "[{}] {} {}: {}",
                        timestamp,
                        record.level(),
                        record.target(),
                        record.args()
                    );
                }
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}
