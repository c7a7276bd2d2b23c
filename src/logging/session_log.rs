use std::{fs::File, io::Write, path::Path, sync::Mutex};

use anyhow::{Context, Error};
use log::{LevelFilter, Log, Metadata, Record};

use moutils::files;

use super::LogEntry;

/// Writes every record as one JSON line to a file, for the duration of one
/// invocation. An existing file is truncated.
#[derive(Debug)]
pub struct SessionLog {
    file: Mutex<File>,
    max_level: LevelFilter,
}

impl SessionLog {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = files::create_file(path.as_ref())
            .context(format!("Failed to create session log '{}'", path.as_ref().display()))?;
        Ok(Self {
            file: Mutex::new(file),
            max_level: LevelFilter::Trace,
        })
    }

    pub fn with_max_level(self, max_level: LevelFilter) -> Self {
        Self { max_level, ..self }
    }

    pub fn into_logger(self) -> Box<dyn Log> {
        Box::new(self)
    }

    fn write_entry(&self, record: &Record) -> Result<(), Error> {
        let mut line = serde_json::to_string(&LogEntry::from(record))?;
        line.push('\n');

        let mut file = self
            .file
            .lock()
            .map_err(|_| anyhow::anyhow!("Session log lock is poisoned"))?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

impl Log for SessionLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        // Logging must never fail the operation
        let _ = self.write_entry(record);
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}
