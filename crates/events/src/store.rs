//! JSONL journal - append-only writer

use crate::error::JournalError;
use crate::reader::JournalReader;
use crate::record::{calculate_record_hash, JournalRecord, GENESIS_HASH};
use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use trivault_escrow::EscrowEvent;

/// Append-only JSONL journal with daily file rotation.
///
/// On open, the chain resumes from the last record already on disk.
pub struct Journal {
    base_path: PathBuf,
    current_file: Option<BufWriter<File>>,
    current_date: Option<String>,
    next_sequence: u64,
    prev_hash: String,
}

impl Journal {
    /// Open a journal at the given directory, creating it if needed
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;

        let reader = JournalReader::from_directory(&base_path)?;
        let (next_sequence, prev_hash) = match reader.last_record()? {
            Some(last) => (last.sequence + 1, last.hash),
            None => (1, GENESIS_HASH.to_string()),
        };

        Ok(Self {
            base_path,
            current_file: None,
            current_date: None,
            next_sequence,
            prev_hash,
        })
    }

    /// Append one escrow event, returning the chained record
    pub fn record(
        &mut self,
        escrow: &str,
        event: &EscrowEvent,
    ) -> Result<JournalRecord, JournalError> {
        let mut record = JournalRecord {
            sequence: self.next_sequence,
            timestamp: Utc::now(),
            escrow: escrow.to_string(),
            event: event.clone(),
            prev_hash: self.prev_hash.clone(),
            hash: String::new(),
        };
        record.hash = calculate_record_hash(&record);

        let date = record.timestamp.format("%Y-%m-%d").to_string();
        if self.current_date.as_ref() != Some(&date) {
            self.rotate_file(&date)?;
        }

        if let Some(ref mut writer) = self.current_file {
            let json = serde_json::to_string(&record)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }

        self.next_sequence += 1;
        self.prev_hash = record.hash.clone();

        tracing::debug!(
            sequence = record.sequence,
            escrow,
            kind = %record.event.kind(),
            "journal record appended"
        );

        Ok(record)
    }

    /// Rotate to a new file for the given date
    fn rotate_file(&mut self, date: &str) -> Result<(), JournalError> {
        if let Some(ref mut writer) = self.current_file {
            writer.flush()?;
        }

        let file_path = self.base_path.join(format!("{}.jsonl", date));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)?;

        self.current_file = Some(BufWriter::new(file));
        self.current_date = Some(date.to_string());

        Ok(())
    }

    /// List all JSONL files in the journal directory, sorted
    pub fn list_files(&self) -> Result<Vec<PathBuf>, JournalError> {
        let mut files = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "jsonl") {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Flush and close the current file
    pub fn close(&mut self) -> Result<(), JournalError> {
        if let Some(ref mut writer) = self.current_file {
            writer.flush()?;
        }
        self.current_file = None;
        self.current_date = None;
        Ok(())
    }
}

impl Drop for Journal {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::verify_chain;
    use trivault_core::{AccountId, Amount};

    fn deposit_event(amount: u128) -> EscrowEvent {
        EscrowEvent::Deposited {
            depositor: AccountId::new("alice"),
            amount: Amount::new(amount),
        }
    }

    #[test]
    fn test_records_chain_from_genesis() {
        let dir = tempfile::tempdir().unwrap();
        let mut journal = Journal::new(dir.path()).unwrap();

        let first = journal.record("ESCR-A", &deposit_event(5)).unwrap();
        let second = journal.record("ESCR-A", &deposit_event(8)).unwrap();

        assert_eq!(first.sequence, 1);
        assert_eq!(first.prev_hash, GENESIS_HASH);
        assert_eq!(second.sequence, 2);
        assert_eq!(second.prev_hash, first.hash);
    }

    #[test]
    fn test_written_records_verify() {
        let dir = tempfile::tempdir().unwrap();
        let mut journal = Journal::new(dir.path()).unwrap();

        for amount in [5, 8, 13] {
            journal.record("ESCR-A", &deposit_event(amount)).unwrap();
        }
        journal.close().unwrap();

        let reader = JournalReader::from_directory(dir.path()).unwrap();
        let records = reader.read_all().unwrap();
        assert_eq!(records.len(), 3);
        assert!(verify_chain(&records).is_ok());
    }

    #[test]
    fn test_reopen_resumes_chain() {
        let dir = tempfile::tempdir().unwrap();

        let last_hash = {
            let mut journal = Journal::new(dir.path()).unwrap();
            journal.record("ESCR-A", &deposit_event(5)).unwrap();
            let last = journal.record("ESCR-A", &deposit_event(8)).unwrap();
            journal.close().unwrap();
            last.hash
        };

        let mut journal = Journal::new(dir.path()).unwrap();
        let resumed = journal.record("ESCR-B", &deposit_event(13)).unwrap();

        assert_eq!(resumed.sequence, 3);
        assert_eq!(resumed.prev_hash, last_hash);

        let reader = JournalReader::from_directory(dir.path()).unwrap();
        assert!(verify_chain(&reader.read_all().unwrap()).is_ok());
    }

    #[test]
    fn test_list_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut journal = Journal::new(dir.path()).unwrap();
        journal.record("ESCR-A", &deposit_event(5)).unwrap();

        let files = journal.list_files().unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].extension().map_or(false, |ext| ext == "jsonl"));
    }
}
