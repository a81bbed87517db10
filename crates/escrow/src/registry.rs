//! Signatory registry - the fixed three-approver trust anchor
//!
//! The approver set is validated once at construction and can never change
//! afterwards. There is deliberately no mutation API.

use crate::error::EscrowError;
use serde::{Deserialize, Serialize};
use trivault_core::AccountId;

/// An immutable, ordered set of exactly three signatories.
///
/// # Examples
/// ```
/// use trivault_core::AccountId;
/// use trivault_escrow::SignatoryRegistry;
///
/// let registry = SignatoryRegistry::new([
///     AccountId::new("s0"),
///     AccountId::new("s1"),
///     AccountId::new("s2"),
/// ])
/// .unwrap();
///
/// assert!(registry.is_signatory(&AccountId::new("s1")));
/// assert!(!registry.is_signatory(&AccountId::new("mallory")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatoryRegistry {
    members: [AccountId; 3],
}

impl SignatoryRegistry {
    /// Number of signatories in every registry
    pub const SIZE: usize = 3;

    /// Create a registry from exactly three identities.
    ///
    /// Fails with `InvalidSignatory` if any identity is null.
    pub fn new(members: [AccountId; 3]) -> Result<Self, EscrowError> {
        for (index, member) in members.iter().enumerate() {
            if member.is_null() {
                return Err(EscrowError::InvalidSignatory { index });
            }
        }
        Ok(Self { members })
    }

    /// Pure membership test
    pub fn is_signatory(&self, id: &AccountId) -> bool {
        self.members.iter().any(|member| member == id)
    }

    /// Indexed read; `None` outside `[0, 3)`
    pub fn member_at(&self, index: usize) -> Option<&AccountId> {
        self.members.get(index)
    }

    /// All members, in construction order
    pub fn members(&self) -> &[AccountId; 3] {
        &self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signatories() -> [AccountId; 3] {
        [
            AccountId::new("s0"),
            AccountId::new("s1"),
            AccountId::new("s2"),
        ]
    }

    #[test]
    fn test_construction_with_valid_members() {
        let registry = SignatoryRegistry::new(signatories()).unwrap();
        assert_eq!(registry.member_at(0), Some(&AccountId::new("s0")));
        assert_eq!(registry.member_at(1), Some(&AccountId::new("s1")));
        assert_eq!(registry.member_at(2), Some(&AccountId::new("s2")));
    }

    #[test]
    fn test_construction_rejects_null_member() {
        for index in 0..SignatoryRegistry::SIZE {
            let mut members = signatories();
            members[index] = AccountId::null();
            let result = SignatoryRegistry::new(members);
            assert_eq!(result, Err(EscrowError::InvalidSignatory { index }));
        }
    }

    #[test]
    fn test_membership() {
        let registry = SignatoryRegistry::new(signatories()).unwrap();
        assert!(registry.is_signatory(&AccountId::new("s0")));
        assert!(registry.is_signatory(&AccountId::new("s2")));
        assert!(!registry.is_signatory(&AccountId::new("s3")));
        assert!(!registry.is_signatory(&AccountId::null()));
    }

    #[test]
    fn test_member_at_out_of_range() {
        let registry = SignatoryRegistry::new(signatories()).unwrap();
        assert_eq!(registry.member_at(3), None);
    }
}
