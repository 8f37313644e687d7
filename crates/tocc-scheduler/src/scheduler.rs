//! Main scheduler implementation
//!
//! Replays operations under the basic timestamp-ordering protocol.

use crate::data_item::{DataItem, DataItemRegistry};
use crate::history::History;
use crate::outcome::{AbortInfo, RejectReason, ScheduleOutcome, Step};
use crate::transaction::{Transaction, TransactionTable};
use std::collections::BTreeMap;
use tocc_primitives::{OpKind, Operation, Timestamp, TxId};

/// Counters over a run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleStats {
    /// Operations submitted
    pub processed: u64,
    /// Operations accepted when submitted (some may have been purged since)
    pub accepted: u64,
    /// Operations rejected, one abort each
    pub aborts: u64,
    /// Operations removed from the history by aborts
    pub purged: u64,
}

impl ScheduleStats {
    /// Fraction of submitted operations that were accepted
    ///
    /// Returns 1.0 for an empty run.
    pub fn acceptance_ratio(&self) -> f64 {
        if self.processed == 0 {
            return 1.0;
        }
        self.accepted as f64 / self.processed as f64
    }
}

/// Scheduler state at a point of the run
///
/// Items are ordered by key, transactions by id. Only live incarnations
/// appear in `transactions`; aborted ones show up in `abort_counts` only.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FinalHistory {
    /// Accepted operations that were never rolled back
    pub history: Vec<Operation>,
    /// Final RTS/WTS of every referenced item
    pub items: Vec<DataItem>,
    /// Live incarnations
    pub transactions: Vec<Transaction>,
    /// Aborts per transaction id
    pub abort_counts: BTreeMap<TxId, u32>,
    /// Run counters
    pub stats: ScheduleStats,
}

impl FinalHistory {
    /// Total aborts across all transaction ids
    pub fn total_aborts(&self) -> u64 {
        self.abort_counts.values().map(|&n| u64::from(n)).sum()
    }

    /// Look up an item's final timestamps
    pub fn item(&self, key: &str) -> Option<&DataItem> {
        self.items.iter().find(|item| item.key.as_str() == key)
    }
}

/// Basic timestamp-ordering scheduler
///
/// Owns the transaction table, data item registry, history and the global
/// timestamp counter. Operations are processed strictly in submission order.
#[derive(Clone, Debug, Default)]
pub struct TimestampScheduler {
    /// Live transaction incarnations
    transactions: TransactionTable,
    /// RTS/WTS per item
    items: DataItemRegistry,
    /// Final history so far
    history: History,
    /// Last timestamp handed out (0 = none yet)
    clock: Timestamp,
    /// Aborts per transaction id
    abort_counts: BTreeMap<TxId, u32>,
    stats: ScheduleStats,
}

impl TimestampScheduler {
    /// Create a scheduler with empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule one operation
    ///
    /// The first operation of an incarnation draws its timestamp. Reads are
    /// checked against WTS, writes against RTS then WTS; commits always pass,
    /// including repeated commits and operations after a commit. A rejected
    /// operation aborts its transaction.
    pub fn schedule(&mut self, op: Operation) -> ScheduleOutcome {
        self.stats.processed += 1;

        let txn = self.transactions.resolve(op.tx(), &mut self.clock);
        let ts = txn.timestamp();
        let incarnation = txn.incarnation();

        let verdict = match op.kind() {
            OpKind::Read(key) => {
                let item = self.items.get_or_create(key);
                item.check_read(ts).map(|()| {
                    item.record_read(ts);
                    tracing::trace!("RTS({}) = {}", item.key, item.rts);
                })
            }
            OpKind::Write(key) => {
                let item = self.items.get_or_create(key);
                item.check_write(ts).map(|()| {
                    item.record_write(ts);
                    tracing::trace!("WTS({}) = {}", item.key, item.wts);
                })
            }
            OpKind::Commit => {
                txn.commit();
                Ok(())
            }
        };

        match verdict {
            Ok(()) => {
                tracing::debug!("Accepted {} (TS={})", op, ts);
                txn.record(op.clone());
                self.history.push(op);
                self.stats.accepted += 1;
                ScheduleOutcome::Accepted
            }
            Err(reason) => {
                tracing::debug!("Rejected {}: {}", op, reason);
                ScheduleOutcome::Aborted(self.abort(op.tx(), ts, incarnation, reason))
            }
        }
    }

    /// Roll back the live incarnation of `tx`
    ///
    /// Removes all of its operations from the history and deletes its record,
    /// so the id's next operation starts a new incarnation. Item timestamps
    /// are left as they are.
    fn abort(
        &mut self,
        tx: TxId,
        timestamp: Timestamp,
        incarnation: u32,
        reason: RejectReason,
    ) -> AbortInfo {
        let purged = self.history.purge(tx);
        self.transactions.remove(tx);
        *self.abort_counts.entry(tx).or_insert(0) += 1;

        self.stats.aborts += 1;
        self.stats.purged += purged.len() as u64;

        tracing::info!(
            "Aborted {} (TS={}, incarnation {}): {}; removed {} operation(s) from history",
            tx,
            timestamp,
            incarnation,
            reason,
            purged.len()
        );

        AbortInfo {
            tx,
            timestamp,
            incarnation,
            reason,
            purged,
        }
    }

    /// Schedule every operation in order and return the resulting state
    pub fn run(&mut self, operations: impl IntoIterator<Item = Operation>) -> FinalHistory {
        self.run_with(operations, |_, _| {})
    }

    /// Like [`run`](Self::run), calling `observer` after every operation
    ///
    /// The observer sees the step and the scheduler state right after it.
    pub fn run_with<I, F>(&mut self, operations: I, mut observer: F) -> FinalHistory
    where
        I: IntoIterator<Item = Operation>,
        F: FnMut(&Step, &Self),
    {
        for (i, op) in operations.into_iter().enumerate() {
            let outcome = self.schedule(op.clone());
            let step = Step {
                index: i + 1,
                operation: op,
                outcome,
            };
            observer(&step, &*self);
        }

        tracing::debug!(
            "Run finished: {} processed, {} in history, {} abort(s)",
            self.stats.processed,
            self.history.len(),
            self.stats.aborts
        );

        self.snapshot()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> FinalHistory {
        FinalHistory {
            history: self.history.as_slice().to_vec(),
            items: self.items.iter().cloned().collect(),
            transactions: self.transactions.iter().cloned().collect(),
            abort_counts: self.abort_counts.clone(),
            stats: self.stats,
        }
    }

    /// Current history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Data item registry
    pub fn data_items(&self) -> &DataItemRegistry {
        &self.items
    }

    /// Look up one item
    pub fn data_item(&self, key: &str) -> Option<&DataItem> {
        self.items.get(key)
    }

    /// Transaction table
    pub fn transactions(&self) -> &TransactionTable {
        &self.transactions
    }

    /// Live incarnation of `tx`
    pub fn transaction(&self, tx: TxId) -> Option<&Transaction> {
        self.transactions.get(tx)
    }

    /// Aborts per transaction id
    pub fn abort_counts(&self) -> &BTreeMap<TxId, u32> {
        &self.abort_counts
    }

    /// Aborts of one transaction id
    pub fn abort_count(&self, tx: TxId) -> u32 {
        self.abort_counts.get(&tx).copied().unwrap_or(0)
    }

    /// Last timestamp assigned, 0 before the first operation
    pub fn current_timestamp(&self) -> Timestamp {
        self.clock
    }

    /// Run counters
    pub fn stats(&self) -> ScheduleStats {
        self.stats
    }

    /// Return to the freshly constructed state
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
