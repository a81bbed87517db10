//! Journal records and hash chain utilities

use crate::error::JournalError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use trivault_escrow::EscrowEvent;

/// Anchor value for the first record's `prev_hash`
pub const GENESIS_HASH: &str = "GENESIS";

/// One journaled escrow event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRecord {
    /// Strictly increasing, starting at 1
    pub sequence: u64,

    /// When the record was appended
    pub timestamp: DateTime<Utc>,

    /// Identifier of the escrow instance that emitted the event
    pub escrow: String,

    /// The emitted event
    pub event: EscrowEvent,

    /// Hash of the preceding record, or `GENESIS` for the first
    pub prev_hash: String,

    /// SHA256 over this record's content
    pub hash: String,
}

/// Calculate SHA256 hash of record content (excluding the hash field itself)
pub fn calculate_record_hash(record: &JournalRecord) -> String {
    let mut hasher = Sha256::new();

    hasher.update(record.sequence.to_le_bytes());
    hasher.update(record.prev_hash.as_bytes());
    hasher.update(record.timestamp.to_rfc3339().as_bytes());
    hasher.update(record.escrow.as_bytes());
    hasher.update(record.event.kind().to_string().as_bytes());
    hasher.update(format!("{:?}", record.event).as_bytes());

    hex::encode(hasher.finalize())
}

/// Verify journal chain integrity
pub fn verify_chain(records: &[JournalRecord]) -> Result<(), JournalError> {
    if records.is_empty() {
        return Ok(());
    }

    let mut prev_hash = GENESIS_HASH.to_string();

    for (i, record) in records.iter().enumerate() {
        if record.prev_hash != prev_hash {
            return Err(JournalError::BrokenLink {
                sequence: record.sequence,
                expected: prev_hash,
                actual: record.prev_hash.clone(),
            });
        }

        let calculated = calculate_record_hash(record);
        if record.hash != calculated {
            return Err(JournalError::InvalidHash {
                sequence: record.sequence,
                expected: calculated,
                actual: record.hash.clone(),
            });
        }

        if i > 0 && record.sequence != records[i - 1].sequence + 1 {
            return Err(JournalError::InvalidSequence {
                expected: records[i - 1].sequence + 1,
                actual: record.sequence,
            });
        }

        prev_hash = record.hash.clone();
    }

    Ok(())
}
