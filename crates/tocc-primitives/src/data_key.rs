//! Data item identifier

use std::borrow::Borrow;
use std::fmt;
use thiserror::Error;

/// Data key error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataKeyError {
    /// Empty identifier
    #[error("data key must not be empty")]
    Empty,
    /// Character outside `[A-Za-z0-9_]`
    #[error("invalid character {ch:?} in data key {key:?}")]
    InvalidChar {
        /// Offending key
        key: String,
        /// First invalid character
        ch: char,
    },
}

/// Identifier of a data item (`x`, `y`, `account_1`, ...)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct DataKey(String);

impl DataKey {
    /// Create a data key, rejecting empty names and characters outside `[A-Za-z0-9_]`
    pub fn new(key: impl Into<String>) -> Result<Self, DataKeyError> {
        let key = key.into();
        if key.is_empty() {
            return Err(DataKeyError::Empty);
        }
        if let Some(ch) = key.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
            return Err(DataKeyError::InvalidChar { key, ch });
        }
        Ok(DataKey(key))
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DataKey {
    type Error = DataKeyError;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        Self::new(key)
    }
}

impl TryFrom<&str> for DataKey {
    type Error = DataKeyError;

    fn try_from(key: &str) -> Result<Self, Self::Error> {
        Self::new(key)
    }
}

impl From<DataKey> for String {
    fn from(key: DataKey) -> Self {
        key.0
    }
}

impl Borrow<str> for DataKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DataKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
