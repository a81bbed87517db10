//! Trivault Escrow - Custody released only by unanimous approval
//!
//! An escrow account holds deposited funds behind a fixed set of exactly
//! three signatories. Funds move out only once all three have approved the
//! identical payout, in the same call that records the third approval.
//!
//! # Key Types
//! - `SignatoryRegistry`: The fixed three-approver trust anchor
//! - `ApprovalLedger`: Per-proposal approval collection and unanimity test
//! - `UserEscrow`: Single-depositor account, released in full to one destination
//! - `ExchangeEscrow`: Pooled account, released as an itemized distribution
//! - `Settlement`: Seam to the platform's fund-transfer primitive

pub mod approval;
pub mod error;
pub mod event;
pub mod exchange;
pub mod registry;
pub mod settlement;
pub mod user;

pub use approval::{ApprovalLedger, ApprovalProgress, ApprovalReceipt};
pub use error::EscrowError;
pub use event::{EscrowEvent, EventKind};
pub use exchange::{Distribution, ExchangeEscrow};
pub use registry::SignatoryRegistry;
pub use settlement::{MemorySettlement, Settlement};
pub use user::UserEscrow;

/// Short unique identifier for an escrow instance
pub(crate) fn escrow_id() -> String {
    format!(
        "ESCR-{}",
        uuid::Uuid::new_v4().to_string()[..8].to_uppercase()
    )
}
