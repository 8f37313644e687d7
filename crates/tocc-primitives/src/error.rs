//! Common error types for primitives

use crate::data_key::DataKeyError;
use crate::operation::NotationError;
use crate::tx_id::TxIdError;
use thiserror::Error;

/// Primitive operation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// Transaction id error
    #[error("transaction id error: {0}")]
    TxId(#[from] TxIdError),

    /// Data key error
    #[error("data key error: {0}")]
    DataKey(#[from] DataKeyError),

    /// Notation error
    #[error("notation error: {0}")]
    Notation(#[from] NotationError),
}
