use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of characters in an account number.
pub const ACCOUNT_NUMBER_LEN: usize = 10;

/// Number of characters in a public address.
pub const PUBLIC_ADDRESS_LEN: usize = 95;

/// Identifier of an account registered with the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountNumber(String);

/// Public address associated with an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicAddress(String);

/// Raised when a value does not have the required fixed length.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountFormatError {
    /// The account number is not exactly [`ACCOUNT_NUMBER_LEN`] characters.
    #[error("invalid account number: expected {ACCOUNT_NUMBER_LEN} characters, got {actual}")]
    AccountNumberLength {
        /// Character count of the rejected value.
        actual: usize,
    },
    /// The public address is not exactly [`PUBLIC_ADDRESS_LEN`] characters.
    #[error("invalid public address: expected {PUBLIC_ADDRESS_LEN} characters, got {actual}")]
    PublicAddressLength {
        /// Character count of the rejected value.
        actual: usize,
    },
}

impl AccountNumber {
    /// Validates and wraps an account number.
    ///
    /// # Errors
    ///
    /// Returns [`AccountFormatError::AccountNumberLength`] when `value` is not
    /// exactly [`ACCOUNT_NUMBER_LEN`] characters long.
    pub fn parse(value: impl Into<String>) -> Result<Self, AccountFormatError> {
        let text: String = value.into();
        let actual = text.chars().count();
        if actual == ACCOUNT_NUMBER_LEN {
            Ok(Self(text))
        } else {
            Err(AccountFormatError::AccountNumberLength { actual })
        }
    }

    /// Borrows the account number text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PublicAddress {
    /// Validates and wraps a public address.
    ///
    /// # Errors
    ///
    /// Returns [`AccountFormatError::PublicAddressLength`] when `value` is not
    /// exactly [`PUBLIC_ADDRESS_LEN`] characters long.
    pub fn parse(value: impl Into<String>) -> Result<Self, AccountFormatError> {
        let text: String = value.into();
        let actual = text.chars().count();
        if actual == PUBLIC_ADDRESS_LEN {
            Ok(Self(text))
        } else {
            Err(AccountFormatError::PublicAddressLength { actual })
        }
    }

    /// Borrows the address text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountNumber {
    type Error = AccountFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for PublicAddress {
    type Error = AccountFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AccountNumber> for String {
    fn from(value: AccountNumber) -> Self {
        value.0
    }
}

impl From<PublicAddress> for String {
    fn from(value: PublicAddress) -> Self {
        value.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl fmt::Display for PublicAddress {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
