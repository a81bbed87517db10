//! Exchange escrow - pooled custody paid out as an itemized distribution
//!
//! Holds deposits from many users as one undifferentiated pool; who is owed
//! what is the proposer's bookkeeping, outside this core. A proposal is an
//! ordered list of (recipient, amount) pairs and executes as a single batch.

use crate::approval::{ApprovalLedger, ApprovalProgress, ApprovalReceipt};
use crate::error::EscrowError;
use crate::event::EscrowEvent;
use crate::registry::SignatoryRegistry;
use crate::settlement::Settlement;
use trivault_core::{AccountId, Amount};

/// An itemized payout proposal: ordered (recipient, amount) pairs.
///
/// Built from parallel recipient/amount slices interpreted positionally.
/// Equality is structural and order-sensitive: the same pairs in a
/// different order are a distinct proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    pairs: Vec<(AccountId, Amount)>,
}

impl Distribution {
    /// Pair up `recipients` and `amounts`.
    ///
    /// Fails with `MalformedProposal` when the slices differ in length.
    pub fn new(recipients: &[AccountId], amounts: &[Amount]) -> Result<Self, EscrowError> {
        if recipients.len() != amounts.len() {
            return Err(EscrowError::MalformedProposal {
                recipients: recipients.len(),
                amounts: amounts.len(),
            });
        }
        Ok(Self {
            pairs: recipients
                .iter()
                .cloned()
                .zip(amounts.iter().copied())
                .collect(),
        })
    }

    /// The (recipient, amount) pairs in proposal order
    pub fn pairs(&self) -> &[(AccountId, Amount)] {
        &self.pairs
    }

    /// Number of payout pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True for an empty distribution
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Checked sum of all amounts
    pub fn total(&self) -> Result<Amount, EscrowError> {
        self.pairs
            .iter()
            .try_fold(Amount::ZERO, |sum, (_, amount)| sum.checked_add(amount))
            .ok_or(EscrowError::AmountOverflow)
    }
}

/// Pooled multi-depositor escrow account
#[derive(Debug, Clone)]
pub struct ExchangeEscrow {
    id: String,
    registry: SignatoryRegistry,
    balance: Amount,
    ledger: ApprovalLedger<Distribution>,
}

impl ExchangeEscrow {
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
            ledger: ApprovalLedger::new(),
        })
    }

    /// Receive funds from any caller into the shared pool.
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

    /// Approve (and on unanimity, execute) an itemized payout.
    ///
    /// `recipients` and `amounts` are parallel slices; a length mismatch
    /// fails with `MalformedProposal` before any ledger state is touched.
    /// The call that records the third distinct approval pays each pair in
    /// order, decrements the balance by the full sum, and resets the
    /// approval state, all in one step.
    ///
    /// The balance is checked at execution time, not proposal time, since
    /// deposits may land between the two. On `InsufficientBalance` nothing
    /// moves and the proposal stays pending at three approvals; once the
    /// pool is topped up, one re-approval by any signatory retries the
    /// batch.
    pub fn transfer_funds_to(
        &mut self,
        caller: &AccountId,
        recipients: &[AccountId],
        amounts: &[Amount],
        settlement: &mut dyn Settlement,
    ) -> Result<ApprovalReceipt, EscrowError> {
        let proposal = Distribution::new(recipients, amounts)?;

        match self.ledger.approve(&self.registry, caller, proposal)? {
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
            ApprovalProgress::Unanimous(distribution) => {
                let total = distribution.total()?;
                self.balance = self.balance.checked_sub(&total).ok_or(
                    EscrowError::InsufficientBalance {
                        required: total,
                        available: self.balance,
                    },
                )?;

                let mut events = Vec::with_capacity(distribution.len());
                for (recipient, amount) in distribution.pairs() {
                    settlement.settle(recipient, *amount);
                    events.push(EscrowEvent::Released {
                        recipient: recipient.clone(),
                        amount: *amount,
                    });
                }
                self.ledger.clear();

                tracing::info!(
                    escrow = %self.id,
                    payouts = events.len(),
                    total = %total,
                    "distribution released"
                );

                Ok(ApprovalReceipt {
                    approvals: SignatoryRegistry::SIZE,
                    events,
                })
            }
        }
    }

    /// Escrow instance identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current pooled balance
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

    /// The pending distribution, if one is collecting approvals
    pub fn pending_distribution(&self) -> Option<&Distribution> {
        self.ledger.pending()
    }

    /// Distinct approvals standing for the pending proposal
    pub fn approvals(&self) -> usize {
        self.ledger.approvals()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::MemorySettlement;

    fn signatories() -> [AccountId; 3] {
        [
            AccountId::new("s0"),
            AccountId::new("s1"),
            AccountId::new("s2"),
        ]
    }

    fn escrow() -> ExchangeEscrow {
        ExchangeEscrow::new(signatories()).unwrap()
    }

    fn approve_all(
        escrow: &mut ExchangeEscrow,
        recipients: &[AccountId],
        amounts: &[Amount],
        settlement: &mut MemorySettlement,
    ) -> ApprovalReceipt {
        let mut receipt = None;
        for signatory in ["s0", "s1", "s2"] {
            receipt = Some(
                escrow
                    .transfer_funds_to(&AccountId::new(signatory), recipients, amounts, settlement)
                    .unwrap(),
            );
        }
        receipt.unwrap()
    }

    #[test]
    fn test_distribution_rejects_length_mismatch() {
        let result = Distribution::new(
            &[AccountId::new("u0"), AccountId::new("u1")],
            &[Amount::new(5)],
        );
        assert_eq!(
            result,
            Err(EscrowError::MalformedProposal {
                recipients: 2,
                amounts: 1,
            })
        );
    }

    #[test]
    fn test_distribution_order_matters() {
        let a = Distribution::new(
            &[AccountId::new("u0"), AccountId::new("u1")],
            &[Amount::new(5), Amount::new(8)],
        )
        .unwrap();
        let b = Distribution::new(
            &[AccountId::new("u1"), AccountId::new("u0")],
            &[Amount::new(8), Amount::new(5)],
        )
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_distribution_total() {
        let distribution = Distribution::new(
            &[AccountId::new("u0"), AccountId::new("u1")],
            &[Amount::new(5), Amount::new(8)],
        )
        .unwrap();
        assert_eq!(distribution.total(), Ok(Amount::new(13)));
    }

    #[test]
    fn test_distribution_total_overflow() {
        let distribution = Distribution::new(
            &[AccountId::new("u0"), AccountId::new("u1")],
            &[Amount::new(u128::MAX), Amount::new(1)],
        )
        .unwrap();
        assert_eq!(distribution.total(), Err(EscrowError::AmountOverflow));
    }

    #[test]
    fn test_malformed_proposal_touches_no_state() {
        let mut escrow = escrow();
        let mut settlement = MemorySettlement::new();

        escrow
            .transfer_funds_to(
                &AccountId::new("s0"),
                &[AccountId::new("u0")],
                &[Amount::new(5)],
                &mut settlement,
            )
            .unwrap();

        let result = escrow.transfer_funds_to(
            &AccountId::new("s1"),
            &[AccountId::new("u0"), AccountId::new("u1")],
            &[Amount::new(5)],
            &mut settlement,
        );
        assert_eq!(
            result,
            Err(EscrowError::MalformedProposal {
                recipients: 2,
                amounts: 1,
            })
        );
        // the pending proposal and its single approval are untouched
        assert_eq!(escrow.approvals(), 1);
    }

    #[test]
    fn test_pooled_payout_in_order() {
        let mut escrow = escrow();
        let mut settlement = MemorySettlement::new();
        let u0 = AccountId::new("u0");
        let u1 = AccountId::new("u1");

        escrow.deposit(&u0, Amount::new(5)).unwrap();
        escrow.deposit(&u1, Amount::new(8)).unwrap();
        assert_eq!(escrow.balance(), Amount::new(13));

        let recipients = [u0.clone(), u1.clone()];
        let amounts = [Amount::new(5), Amount::new(8)];
        let receipt = approve_all(&mut escrow, &recipients, &amounts, &mut settlement);

        assert!(receipt.executed());
        assert_eq!(
            receipt.events,
            vec![
                EscrowEvent::Released {
                    recipient: u0.clone(),
                    amount: Amount::new(5),
                },
                EscrowEvent::Released {
                    recipient: u1.clone(),
                    amount: Amount::new(8),
                },
            ]
        );
        assert_eq!(escrow.balance(), Amount::ZERO);
        assert_eq!(settlement.balance_of(&u0), Amount::new(5));
        assert_eq!(settlement.balance_of(&u1), Amount::new(8));
        assert_eq!(escrow.approvals(), 0);
        assert_eq!(escrow.pending_distribution(), None);
    }

    #[test]
    fn test_partial_approvals_move_nothing() {
        let mut escrow = escrow();
        let mut settlement = MemorySettlement::new();
        let u0 = AccountId::new("u0");

        escrow.deposit(&u0, Amount::new(10)).unwrap();

        for signatory in ["s0", "s1"] {
            let receipt = escrow
                .transfer_funds_to(
                    &AccountId::new(signatory),
                    &[u0.clone()],
                    &[Amount::new(10)],
                    &mut settlement,
                )
                .unwrap();
            assert!(!receipt.executed());
        }

        assert_eq!(escrow.balance(), Amount::new(10));
        assert_eq!(settlement.balance_of(&u0), Amount::ZERO);
    }

    #[test]
    fn test_reordered_pairs_do_not_accumulate() {
        let mut escrow = escrow();
        let mut settlement = MemorySettlement::new();
        let u0 = AccountId::new("u0");
        let u1 = AccountId::new("u1");

        escrow.deposit(&u0, Amount::new(13)).unwrap();

        escrow
            .transfer_funds_to(
                &AccountId::new("s0"),
                &[u0.clone(), u1.clone()],
                &[Amount::new(5), Amount::new(8)],
                &mut settlement,
            )
            .unwrap();
        escrow
            .transfer_funds_to(
                &AccountId::new("s1"),
                &[u0.clone(), u1.clone()],
                &[Amount::new(5), Amount::new(8)],
                &mut settlement,
            )
            .unwrap();

        // same pairs, different order: a distinct proposal replacing the first
        let receipt = escrow
            .transfer_funds_to(
                &AccountId::new("s2"),
                &[u1.clone(), u0.clone()],
                &[Amount::new(8), Amount::new(5)],
                &mut settlement,
            )
            .unwrap();
        assert!(!receipt.executed());
        assert_eq!(receipt.approvals, 1);
        assert_eq!(escrow.balance(), Amount::new(13));
    }

    #[test]
    fn test_insufficient_balance_keeps_proposal_pending() {
        let mut escrow = escrow();
        let mut settlement = MemorySettlement::new();
        let u0 = AccountId::new("u0");

        escrow.deposit(&u0, Amount::new(4)).unwrap();

        let recipients = [u0.clone()];
        let amounts = [Amount::new(10)];
        for signatory in ["s0", "s1"] {
            escrow
                .transfer_funds_to(
                    &AccountId::new(signatory),
                    &recipients,
                    &amounts,
                    &mut settlement,
                )
                .unwrap();
        }

        let result = escrow.transfer_funds_to(
            &AccountId::new("s2"),
            &recipients,
            &amounts,
            &mut settlement,
        );
        assert_eq!(
            result,
            Err(EscrowError::InsufficientBalance {
                required: Amount::new(10),
                available: Amount::new(4),
            })
        );
        assert_eq!(escrow.balance(), Amount::new(4));
        assert_eq!(settlement.balance_of(&u0), Amount::ZERO);
        assert_eq!(escrow.approvals(), 3);

        // top up the pool, then one re-approval retries the batch
        escrow
            .deposit(&AccountId::new("u1"), Amount::new(6))
            .unwrap();
        let receipt = escrow
            .transfer_funds_to(
                &AccountId::new("s0"),
                &recipients,
                &amounts,
                &mut settlement,
            )
            .unwrap();
        assert!(receipt.executed());
        assert_eq!(escrow.balance(), Amount::ZERO);
        assert_eq!(settlement.balance_of(&u0), Amount::new(10));
    }

    #[test]
    fn test_non_signatory_rejected_mid_sequence() {
        let mut escrow = escrow();
        let mut settlement = MemorySettlement::new();
        let u0 = AccountId::new("u0");

        escrow.deposit(&u0, Amount::new(10)).unwrap();

        let recipients = [u0.clone()];
        let amounts = [Amount::new(10)];
        for signatory in ["s0", "s1"] {
            escrow
                .transfer_funds_to(
                    &AccountId::new(signatory),
                    &recipients,
                    &amounts,
                    &mut settlement,
                )
                .unwrap();
        }

        let result = escrow.transfer_funds_to(
            &AccountId::new("mallory"),
            &recipients,
            &amounts,
            &mut settlement,
        );
        assert_eq!(
            result,
            Err(EscrowError::UnauthorizedCaller(AccountId::new("mallory")))
        );
        assert_eq!(escrow.balance(), Amount::new(10));
        assert_eq!(escrow.approvals(), 2);

        let receipt = escrow
            .transfer_funds_to(&AccountId::new("s2"), &recipients, &amounts, &mut settlement)
            .unwrap();
        assert!(receipt.executed());
        assert_eq!(settlement.balance_of(&u0), Amount::new(10));
    }
}
