//! # tocc-scheduler
//!
//! Basic timestamp-ordering (TO) concurrency control.
//!
//! The scheduler replays an already interleaved sequence of operations and
//! decides, one operation at a time, whether it may proceed or forces its
//! transaction to abort. What survives is the final history.
//!
//! Features:
//! - Per-item read/write timestamps (RTS/WTS)
//! - Read and write rule checks, no Thomas Write Rule
//! - Full rollback of an aborted incarnation's history footprint
//! - Restart with a fresh timestamp on the id's next appearance
//! - Abort counts and scheduling statistics

#![warn(missing_docs)]
#![warn(clippy::all)]

mod data_item;
mod history;
mod outcome;
mod scheduler;
mod shared;
mod transaction;

pub use data_item::{DataItem, DataItemRegistry};
pub use history::History;
pub use outcome::{AbortInfo, RejectReason, ScheduleOutcome, Step};
pub use scheduler::{FinalHistory, ScheduleStats, TimestampScheduler};
pub use shared::SharedScheduler;
pub use transaction::{Transaction, TransactionTable, TxState};

pub use tocc_primitives::{parse_history, DataKey, OpKind, Operation, Timestamp, TxId};
