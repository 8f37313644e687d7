//! Transaction identifier

use std::fmt;
use std::num::NonZeroU32;
use thiserror::Error;

/// Transaction id error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxIdError {
    /// Ids start at 1
    #[error("transaction id must be positive, got 0")]
    Zero,
}

/// Transaction identifier
///
/// The id names a transaction across restarts; each restart is a new
/// incarnation of the same id with a fresh timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "u32", try_from = "u32")
)]
pub struct TxId(NonZeroU32);

impl TxId {
    /// Create a new transaction ID
    pub fn new(id: u32) -> Result<Self, TxIdError> {
        NonZeroU32::new(id).map(TxId).ok_or(TxIdError::Zero)
    }

    /// Get the raw ID value
    pub fn as_u32(&self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for TxId {
    type Error = TxIdError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<TxId> for u32 {
    fn from(id: TxId) -> Self {
        id.as_u32()
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_id() {
        let id1 = TxId::new(1).unwrap();
        let id2 = TxId::try_from(2u32).unwrap();

        assert_eq!(id1.as_u32(), 1);
        assert_eq!(u32::from(id2), 2);
        assert!(id1 < id2);
    }

    #[test]
    fn test_tx_id_zero_rejected() {
        assert_eq!(TxId::new(0), Err(TxIdError::Zero));
        assert!(TxId::try_from(0u32).is_err());
    }

    #[test]
    fn test_tx_id_display() {
        assert_eq!(TxId::new(7).unwrap().to_string(), "T7");
    }

    #[test]
    fn test_tx_id_max() {
        let id = TxId::new(u32::MAX).unwrap();
        assert_eq!(id.as_u32(), u32::MAX);
    }
}
