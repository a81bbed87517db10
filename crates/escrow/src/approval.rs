//! Approval ledger - the unanimity state machine
//!
//! Both escrow variants gate fund movement on the same protocol: a proposal
//! collects approvals from distinct signatories, and the call that records
//! the third distinct approval of the identical proposal executes the payout
//! in the same step.
//!
//! A new or differing proposal replaces the pending one and discards its
//! approvals; the approval set is only ever meaningful for the proposal
//! currently pending.

use crate::error::EscrowError;
use crate::event::EscrowEvent;
use crate::registry::SignatoryRegistry;
use trivault_core::AccountId;

/// Progress reported by a recorded approval
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalProgress<P> {
    /// Fewer than three distinct signatories have approved the pending
    /// proposal; carries the current approval count
    Collecting(usize),

    /// All three distinct signatories have approved the identical proposal;
    /// carries the approved proposal for execution
    Unanimous(P),
}

/// Outcome of a transfer call: the approval count reached for the targeted
/// proposal, and any payout events performed by it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalReceipt {
    /// Distinct approvals standing for the proposal this call targeted
    pub approvals: usize,

    /// Events emitted by an execution; empty while approvals are pending
    pub events: Vec<EscrowEvent>,
}

impl ApprovalReceipt {
    /// Whether this call executed the payout
    pub fn executed(&self) -> bool {
        !self.events.is_empty()
    }
}

/// Per-proposal approval collection, owned by a single escrow instance.
///
/// Two logical states: empty (no pending proposal) and collecting (a
/// proposal holds one or more distinct approvals). The ledger never resets
/// itself on unanimity; the owning escrow calls [`clear`](Self::clear) once
/// execution succeeds, keeping execution and reset atomic within the
/// triggering call and leaving the proposal pending when execution aborts.
#[derive(Debug, Clone)]
pub struct ApprovalLedger<P> {
    current: Option<P>,
    approved_by: Vec<AccountId>,
}

impl<P> ApprovalLedger<P> {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            current: None,
            approved_by: Vec::new(),
        }
    }

    /// The pending proposal, if any
    pub fn pending(&self) -> Option<&P> {
        self.current.as_ref()
    }

    /// Number of distinct approvals for the pending proposal
    pub fn approvals(&self) -> usize {
        self.approved_by.len()
    }

    /// Signatories that have approved the pending proposal, in call order
    pub fn approvers(&self) -> &[AccountId] {
        &self.approved_by
    }

    /// True when no proposal is pending
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Drop the pending proposal and its approvals
    pub fn clear(&mut self) {
        self.current = None;
        self.approved_by.clear();
    }
}

impl<P: PartialEq> ApprovalLedger<P> {
    /// Record one signatory's approval of `proposal`.
    ///
    /// Fails with `UnauthorizedCaller` before any state change if `caller`
    /// is not in the registry. A proposal differing from the pending one
    /// replaces it and starts a fresh approval set. Re-approval by a
    /// signatory already counted is a no-op. Either the full transition
    /// happens or nothing does.
    pub fn approve(
        &mut self,
        registry: &SignatoryRegistry,
        caller: &AccountId,
        proposal: P,
    ) -> Result<ApprovalProgress<P>, EscrowError> {
        if !registry.is_signatory(caller) {
            return Err(EscrowError::UnauthorizedCaller(caller.clone()));
        }

        match &self.current {
            Some(current) if *current == proposal => {
                if !self.approved_by.iter().any(|approver| approver == caller) {
                    self.approved_by.push(caller.clone());
                }
                if self.approved_by.len() == SignatoryRegistry::SIZE {
                    return Ok(ApprovalProgress::Unanimous(proposal));
                }
            }
            _ => {
                self.current = Some(proposal);
                self.approved_by.clear();
                self.approved_by.push(caller.clone());
            }
        }

        Ok(ApprovalProgress::Collecting(self.approved_by.len()))
    }
}

impl<P> Default for ApprovalLedger<P> {
    fn default() -> Self {
        Self::new()
    }
}
