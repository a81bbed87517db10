//! Trivault Events - Hash-chained JSONL journal
//!
//! Every deposit receipt and payout an escrow emits can be appended here as
//! one JSON line. Records carry a SHA-256 hash chain so a journal can be
//! verified end to end after replay.

pub mod error;
pub mod reader;
pub mod record;
pub mod store;

pub use error::JournalError;
pub use reader::JournalReader;
pub use record::{calculate_record_hash, verify_chain, JournalRecord, GENESIS_HASH};
pub use store::Journal;
