//! Transaction Table - live transaction incarnations

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use tocc_primitives::{Operation, Timestamp, TxId};

/// State of a live incarnation
///
/// There is no aborted state: an aborted incarnation is removed from the
/// table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TxState {
    /// Running
    Active,
    /// Commit accepted
    Committed,
}

impl std::fmt::Display for TxState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxState::Active => f.write_str("ACTIVE"),
            TxState::Committed => f.write_str("COMMITTED"),
        }
    }
}

/// One incarnation of a transaction id
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transaction {
    id: TxId,
    timestamp: Timestamp,
    incarnation: u32,
    state: TxState,
    accepted: Vec<Operation>,
}

impl Transaction {
    /// Create an active incarnation
    pub fn new(id: TxId, timestamp: Timestamp, incarnation: u32) -> Self {
        Self {
            id,
            timestamp,
            incarnation,
            state: TxState::Active,
            accepted: Vec::new(),
        }
    }

    /// Transaction id
    pub fn id(&self) -> TxId {
        self.id
    }

    /// Timestamp of this incarnation
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Incarnation number, starting at 1
    pub fn incarnation(&self) -> u32 {
        self.incarnation
    }

    /// Current state
    pub fn state(&self) -> TxState {
        self.state
    }

    /// Check if a commit was accepted
    pub fn is_committed(&self) -> bool {
        self.state == TxState::Committed
    }

    /// Operations this incarnation contributed to the history
    pub fn accepted(&self) -> &[Operation] {
        &self.accepted
    }

    pub(crate) fn record(&mut self, op: Operation) {
        self.accepted.push(op);
    }

    pub(crate) fn commit(&mut self) {
        self.state = TxState::Committed;
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(TS={})", self.id, self.timestamp)
    }
}

/// Live incarnations keyed by transaction id
///
/// Incarnation numbers are tracked separately from the live records so they
/// keep counting after an abort deletes the record.
#[derive(Clone, Debug, Default)]
pub struct TransactionTable {
    live: BTreeMap<TxId, Transaction>,
    incarnations: HashMap<TxId, u32>,
}

impl TransactionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the live incarnation of `id`, starting a new one if there is none
    ///
    /// A new incarnation takes the next value of `clock` as its timestamp.
    pub fn resolve(&mut self, id: TxId, clock: &mut Timestamp) -> &mut Transaction {
        match self.live.entry(id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                *clock += 1;
                let incarnation = self.incarnations.entry(id).or_insert(0);
                *incarnation += 1;
                tracing::debug!(
                    "New incarnation {} of {} with TS={}",
                    incarnation,
                    id,
                    clock
                );
                entry.insert(Transaction::new(id, *clock, *incarnation))
            }
        }
    }

    /// Get the live incarnation of `id`
    pub fn get(&self, id: TxId) -> Option<&Transaction> {
        self.live.get(&id)
    }

    /// Delete the live incarnation of `id`
    pub fn remove(&mut self, id: TxId) -> Option<Transaction> {
        self.live.remove(&id)
    }

    /// Number of incarnations started for `id` so far
    pub fn incarnations(&self, id: TxId) -> u32 {
        self.incarnations.get(&id).copied().unwrap_or(0)
    }

    /// Iterate over live incarnations in id order
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.live.values()
    }

    /// Number of live incarnations
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Check if no incarnation is live
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Forget every transaction, including incarnation counts
    pub fn clear(&mut self) {
        self.live.clear();
        self.incarnations.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: u32) -> TxId {
        TxId::new(id).unwrap()
    }

    #[test]
    fn test_resolve_creates_once() {
        let mut table = TransactionTable::new();
        let mut clock = 0;

        let txn = table.resolve(tx(1), &mut clock);
        assert_eq!(txn.timestamp(), 1);
        assert_eq!(txn.incarnation(), 1);
        assert_eq!(txn.state(), TxState::Active);
        assert!(txn.accepted().is_empty());

        // Same id resolves to the same record without ticking the clock
        let txn = table.resolve(tx(1), &mut clock);
        assert_eq!(txn.timestamp(), 1);
        assert_eq!(clock, 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_resolve_shares_clock() {
        let mut table = TransactionTable::new();
        let mut clock = 0;

        assert_eq!(table.resolve(tx(5), &mut clock).timestamp(), 1);
        assert_eq!(table.resolve(tx(2), &mut clock).timestamp(), 2);
        assert_eq!(table.resolve(tx(9), &mut clock).timestamp(), 3);
    }

    #[test]
    fn test_remove_starts_new_incarnation() {
        let mut table = TransactionTable::new();
        let mut clock = 0;

        table.resolve(tx(1), &mut clock);
        table.resolve(tx(2), &mut clock);

        let removed = table.remove(tx(1)).unwrap();
        assert_eq!(removed.timestamp(), 1);
        assert!(table.get(tx(1)).is_none());
        assert_eq!(table.incarnations(tx(1)), 1);

        let txn = table.resolve(tx(1), &mut clock);
        assert_eq!(txn.timestamp(), 3);
        assert_eq!(txn.incarnation(), 2);
        assert_eq!(table.incarnations(tx(1)), 2);
    }

    #[test]
    fn test_commit_keeps_record() {
        let mut table = TransactionTable::new();
        let mut clock = 0;

        let txn = table.resolve(tx(1), &mut clock);
        txn.record(Operation::commit(tx(1)));
        txn.commit();

        let txn = table.get(tx(1)).unwrap();
        assert!(txn.is_committed());
        assert_eq!(txn.accepted().len(), 1);
    }

    #[test]
    fn test_iter_in_id_order() {
        let mut table = TransactionTable::new();
        let mut clock = 0;
        for id in [3, 1, 2] {
            table.resolve(tx(id), &mut clock);
        }
        let ids: Vec<u32> = table.iter().map(|t| t.id().as_u32()).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn test_clear() {
        let mut table = TransactionTable::new();
        let mut clock = 0;
        table.resolve(tx(1), &mut clock);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.incarnations(tx(1)), 0);
    }

    #[test]
    fn test_display() {
        let txn = Transaction::new(tx(4), 7, 1);
        assert_eq!(txn.to_string(), "T4(TS=7)");
        assert_eq!(TxState::Committed.to_string(), "COMMITTED");
    }
}
