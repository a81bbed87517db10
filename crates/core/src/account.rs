//! AccountId - Opaque account identity
//!
//! Identities come from the surrounding platform's authentication layer;
//! this crate treats them as opaque strings. The empty string is the null
//! identity, used to model an unset or zero-valued address.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing account identities
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("account identity cannot be empty")]
    Empty,
}

/// Opaque identity of a depositor, signatory or recipient.
///
/// # Examples
/// ```
/// use trivault_core::AccountId;
///
/// let alice = AccountId::new("alice");
/// assert!(!alice.is_null());
///
/// // Strict parse rejects the null identity
/// let parsed: Result<AccountId, _> = "".parse();
/// assert!(parsed.is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Create an identity from any string, including the null identity
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The null identity
    pub fn null() -> Self {
        Self(String::new())
    }

    /// True for the null (unset/zero-valued) identity
    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_empty()
    }

    /// The identity as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AccountIdError::Empty);
        }
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
