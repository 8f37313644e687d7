//! # tocc-primitives
//!
//! Primitive types for the tocc timestamp-ordering simulator.
//!
//! This crate provides the values an input history is made of:
//! - [`TxId`]: positive transaction identifier
//! - [`DataKey`]: data item identifier
//! - [`Operation`]: one read, write or commit step
//! - the textual notation (`r1(x)`, `w2(y)`, `c3`) used to write histories down

#![warn(missing_docs)]
#![warn(clippy::all)]

mod data_key;
mod error;
mod operation;
mod tx_id;

pub use data_key::{DataKey, DataKeyError};
pub use error::PrimitiveError;
pub use operation::{parse_history, NotationError, OpKind, Operation};
pub use tx_id::{TxId, TxIdError};

/// Transaction timestamp type
///
/// Timestamps are drawn from a counter starting at 1; 0 is the initial
/// RTS/WTS of a data item nobody has touched.
pub type Timestamp = u64;
