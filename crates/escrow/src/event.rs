//! Escrow events - the observable record of deposits and payouts

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use trivault_core::{AccountId, Amount};

/// Event kind code, used by logs and the journal
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Deposited,
    Transferred,
    Released,
}

/// Events emitted by escrow operations.
///
/// Deposits always emit exactly one `Deposited`, including zero-value ones.
/// A user-escrow execution emits exactly one `Transferred` carrying the full
/// balance at the instant of release. An exchange-escrow execution emits one
/// `Released` per (recipient, amount) pair, in proposal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EscrowEvent {
    /// Funds were received into the escrow
    Deposited {
        depositor: AccountId,
        amount: Amount,
    },

    /// A user escrow released its entire balance to a destination
    Transferred {
        /// Most recent depositor, when one is known
        depositor: Option<AccountId>,
        destination: AccountId,
        amount: Amount,
    },

    /// An exchange escrow paid one recipient of an approved distribution
    Released {
        recipient: AccountId,
        amount: Amount,
    },
}

impl EscrowEvent {
    /// The kind code for this event
    pub fn kind(&self) -> EventKind {
        match self {
            EscrowEvent::Deposited { .. } => EventKind::Deposited,
            EscrowEvent::Transferred { .. } => EventKind::Transferred,
            EscrowEvent::Released { .. } => EventKind::Released,
        }
    }

    /// The amount moved or received by this event
    pub fn amount(&self) -> Amount {
        match self {
            EscrowEvent::Deposited { amount, .. }
            | EscrowEvent::Transferred { amount, .. }
            | EscrowEvent::Released { amount, .. } => *amount,
        }
    }
}
