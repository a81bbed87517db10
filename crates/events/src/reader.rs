//! JSONL journal reader - sequential replay

use crate::error::JournalError;
use crate::record::JournalRecord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Sequential record reader for replay and verification
pub struct JournalReader {
    files: Vec<PathBuf>,
}

impl JournalReader {
    /// Create a reader over all JSONL files in a directory
    pub fn from_directory(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref();
        let mut files = Vec::new();

        if path.exists() {
            for entry in std::fs::read_dir(path)? {
                let entry = entry?;
                let file_path = entry.path();
                if file_path.extension().map_or(false, |ext| ext == "jsonl") {
                    files.push(file_path);
                }
            }
        }

        files.sort();

        Ok(Self { files })
    }

    /// Read all records from all files in order
    pub fn read_all(&self) -> Result<Vec<JournalRecord>, JournalError> {
        let mut records = Vec::new();

        for file_path in &self.files {
            for record in read_file(file_path)? {
                records.push(record);
            }
        }

        Ok(records)
    }

    /// The last record on disk, if any.
    ///
    /// Only the newest file is scanned; rotation keeps files in date order.
    pub fn last_record(&self) -> Result<Option<JournalRecord>, JournalError> {
        match self.files.last() {
            Some(file_path) => Ok(read_file(file_path)?.into_iter().last()),
            None => Ok(None),
        }
    }

    /// Count total records across all files
    pub fn count(&self) -> Result<usize, JournalError> {
        let mut count = 0;

        for file_path in &self.files {
            let file = File::open(file_path)?;
            let reader = BufReader::new(file);

            for line in reader.lines() {
                let line = line?;
                if !line.trim().is_empty() {
                    count += 1;
                }
            }
        }

        Ok(count)
    }
}

fn read_file(file_path: &Path) -> Result<Vec<JournalRecord>, JournalError> {
    let file = File::open(file_path)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: JournalRecord = serde_json::from_str(&line)?;
        records.push(record);
    }

    Ok(records)
}
