//! User escrow - single-depositor custody released in full
//!
//! Holds one depositor's funds. A proposal names a single destination; on
//! unanimity the entire current balance moves there and the balance drops
//! to zero.

use crate::approval::{ApprovalLedger, ApprovalProgress, ApprovalReceipt};
use crate::error::EscrowError;
use crate::event::EscrowEvent;
use crate::registry::SignatoryRegistry;
use crate::settlement::Settlement;
use trivault_core::{AccountId, Amount};

/// Single-depositor escrow account
#[derive(Debug, Clone)]
pub struct UserEscrow {
    id: String,
    registry: SignatoryRegistry,
    balance: Amount,
    depositor: Option<AccountId>,
    ledger: ApprovalLedger<AccountId>,
}

impl UserEscrow {
    /// Create an empty escrow guarded by exactly three signatories.
    ///
    /// Fails with `InvalidSignatory` if any identity is null; no instance
    /// is created in that case.
    pub fn new(signatories: [AccountId; 3]) -> Result<Self, EscrowError> {
        let registry = SignatoryRegistry::new(signatories)?;
        Ok(Self {
            id: crate::escrow_id(),
            registry,
            balance: Amount::ZERO,
            depositor: None,
            ledger: ApprovalLedger::new(),
        })
    }

    /// Receive funds from any caller.
    ///
    /// Always succeeds short of arithmetic overflow; a zero-value deposit
    /// still emits its event.
    pub fn deposit(
        &mut self,
        depositor: &AccountId,
        amount: Amount,
    ) -> Result<EscrowEvent, EscrowError> {
        self.balance = self
            .balance
            .checked_add(&amount)
            .ok_or(EscrowError::AmountOverflow)?;
        self.depositor = Some(depositor.clone());

        tracing::debug!(
            escrow = %self.id,
            depositor = %depositor,
            amount = %amount,
            "deposit received"
        );

        Ok(EscrowEvent::Deposited {
            depositor: depositor.clone(),
            amount,
        })
    }

    /// Approve (and on unanimity, execute) release of the full balance to
    /// `destination`.
    ///
    /// `caller` is the authenticated identity supplied by the platform's
    /// authentication layer. The call that records the third distinct
    /// approval transfers the entire balance, emits one `Transferred`
    /// event, and resets the approval state, all in one step. A zero
    /// balance still executes, with a zero-amount event.
    pub fn transfer_funds_to(
        &mut self,
        caller: &AccountId,
        destination: AccountId,
        settlement: &mut dyn Settlement,
    ) -> Result<ApprovalReceipt, EscrowError> {
        match self.ledger.approve(&self.registry, caller, destination)? {
            ApprovalProgress::Collecting(approvals) => {
                tracing::debug!(
                    escrow = %self.id,
                    caller = %caller,
                    approvals,
                    "approval recorded"
                );
                Ok(ApprovalReceipt {
                    approvals,
                    events: Vec::new(),
                })
            }
            ApprovalProgress::Unanimous(destination) => {
                let amount = self.balance;
                self.balance = Amount::ZERO;
                settlement.settle(&destination, amount);
                self.ledger.clear();

                tracing::info!(
                    escrow = %self.id,
                    destination = %destination,
                    amount = %amount,
                    "escrow released"
                );

                Ok(ApprovalReceipt {
                    approvals: SignatoryRegistry::SIZE,
                    events: vec![EscrowEvent::Transferred {
                        depositor: self.depositor.clone(),
                        destination,
                        amount,
                    }],
                })
            }
        }
    }

    /// Escrow instance identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current balance
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Indexed signatory read
    pub fn signatory(&self, index: usize) -> Option<&AccountId> {
        self.registry.member_at(index)
    }

    /// The full signatory registry
    pub fn signatories(&self) -> &SignatoryRegistry {
        &self.registry
    }

    /// Most recent depositor, if any funds have ever arrived
    pub fn depositor(&self) -> Option<&AccountId> {
        self.depositor.as_ref()
    }

    /// Destination of the pending proposal, if one is collecting approvals
    pub fn pending_destination(&self) -> Option<&AccountId> {
        self.ledger.pending()
    }

    /// Distinct approvals standing for the pending proposal
    pub fn approvals(&self) -> usize {
        self.ledger.approvals()
    }
}
