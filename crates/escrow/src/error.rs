//! Escrow errors

use thiserror::Error;
use trivault_core::{AccountId, Amount};

/// Errors that can occur in escrow operations.
///
/// Every error aborts the whole operation; no partial balance or approval
/// state survives a failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EscrowError {
    #[error("invalid signatory at index {index}: identity must be non-null")]
    InvalidSignatory { index: usize },

    #[error("caller {0} is not a signatory")]
    UnauthorizedCaller(AccountId),

    #[error("recipients and amounts differ in length: {recipients} recipients, {amounts} amounts")]
    MalformedProposal { recipients: usize, amounts: usize },

    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: Amount, available: Amount },

    #[error("amount arithmetic overflow")]
    AmountOverflow,
}
