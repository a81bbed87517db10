//! Amount - Value in the native currency's smallest unit
//!
//! All escrowed value in Trivault is counted in whole smallest units.
//! Non-negativity is enforced at the type level.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative value in the smallest native unit.
///
/// # Example
/// ```
/// use trivault_core::Amount;
///
/// let amount = Amount::new(100);
/// assert_eq!(amount.value(), 100);
///
/// let short = Amount::new(30);
/// assert!(amount.checked_sub(&Amount::new(200)).is_none());
/// assert_eq!(amount.checked_sub(&short).unwrap(), Amount::new(70));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    /// Zero amount constant
    pub const ZERO: Self = Self(0);

    /// Create a new Amount from a raw unit count
    #[inline]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Get the raw unit count
    #[inline]
    pub const fn value(&self) -> u128 {
        self.0
    }

    /// Check if the amount is zero
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition - returns None on overflow
    pub fn checked_add(&self, other: &Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction - returns None if the result would be negative
    pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Saturating addition - clamps at the representable maximum
    pub fn saturating_add(&self, other: &Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<Amount> for u128 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}
