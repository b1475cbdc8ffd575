//! Optional transcript logging.
//!
//! When a log file is given on the command line, every transcript entry is
//! appended to it as it is produced, using the same lines the screen shows.

use std::fs::OpenOptions;
use std::io::Write;

use crate::core::message::Entry;

pub struct TranscriptLog {
    file_path: Option<String>,
}

impl TranscriptLog {
    pub fn new(file_path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(path) = &file_path {
            // Verify write access up front rather than on the first message.
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.flush()?;
        }
        Ok(TranscriptLog { file_path })
    }

    pub fn is_active(&self) -> bool {
        self.file_path.is_some()
    }

    pub fn record(&self, entry: &Entry) -> Result<(), Box<dyn std::error::Error>> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry.display())?;
        file.flush()?;
        Ok(())
    }
}
