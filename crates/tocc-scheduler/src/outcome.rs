//! Scheduling outcomes

use thiserror::Error;
use tocc_primitives::{DataKey, Operation, Timestamp, TxId};

/// Why an operation was rejected
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RejectReason {
    /// Read of a value a newer transaction already overwrote
    #[error("read too late: TS={ts} < WTS({key})={wts}")]
    ReadTooLate {
        /// Item read
        key: DataKey,
        /// Reader's timestamp
        ts: Timestamp,
        /// Item write timestamp
        wts: Timestamp,
    },

    /// Write of a value a newer transaction already read
    #[error("write too late: TS={ts} < RTS({key})={rts}")]
    WriteAfterNewerRead {
        /// Item written
        key: DataKey,
        /// Writer's timestamp
        ts: Timestamp,
        /// Item read timestamp
        rts: Timestamp,
    },

    /// Write older than the item's current value
    #[error("write too late: TS={ts} < WTS({key})={wts}")]
    WriteAfterNewerWrite {
        /// Item written
        key: DataKey,
        /// Writer's timestamp
        ts: Timestamp,
        /// Item write timestamp
        wts: Timestamp,
    },
}

impl RejectReason {
    /// Item whose timestamps caused the rejection
    pub fn key(&self) -> &DataKey {
        match self {
            RejectReason::ReadTooLate { key, .. }
            | RejectReason::WriteAfterNewerRead { key, .. }
            | RejectReason::WriteAfterNewerWrite { key, .. } => key,
        }
    }
}

/// Details of an abort
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbortInfo {
    /// Aborted transaction
    pub tx: TxId,
    /// Timestamp of the aborted incarnation
    pub timestamp: Timestamp,
    /// Incarnation number that was aborted
    pub incarnation: u32,
    /// Rule that failed
    pub reason: RejectReason,
    /// Operations removed from the history, in history order
    pub purged: Vec<Operation>,
}

/// Result of scheduling one operation
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScheduleOutcome {
    /// Operation appended to the history
    Accepted,
    /// Operation rejected and its transaction aborted
    Aborted(AbortInfo),
}

impl ScheduleOutcome {
    /// Check if the operation was accepted
    pub fn is_accepted(&self) -> bool {
        matches!(self, ScheduleOutcome::Accepted)
    }

    /// Abort details, if the operation was rejected
    pub fn abort_info(&self) -> Option<&AbortInfo> {
        match self {
            ScheduleOutcome::Accepted => None,
            ScheduleOutcome::Aborted(info) => Some(info),
        }
    }
}

/// One processed step of a run
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// 1-based position in the input
    pub index: usize,
    /// Operation processed
    pub operation: Operation,
    /// What happened to it
    pub outcome: ScheduleOutcome,
}
