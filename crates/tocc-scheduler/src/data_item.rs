//! Data Item Registry - per-item read and write timestamps

use crate::outcome::RejectReason;
use std::collections::BTreeMap;
use tocc_primitives::{DataKey, Timestamp};

/// A data item and its timestamps
///
/// `rts` and `wts` hold the highest timestamp of any transaction that
/// successfully read or wrote the item. Both only ever grow; an abort does
/// not lower them even though the aborted operations leave the history.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataItem {
    /// Item identifier
    pub key: DataKey,
    /// Read timestamp
    pub rts: Timestamp,
    /// Write timestamp
    pub wts: Timestamp,
}

impl DataItem {
    /// Create an untouched item (RTS = WTS = 0)
    pub fn new(key: DataKey) -> Self {
        Self { key, rts: 0, wts: 0 }
    }

    /// Check the read rule for a transaction with timestamp `ts`
    ///
    /// A read is too late if a newer transaction already overwrote the value.
    pub fn check_read(&self, ts: Timestamp) -> Result<(), RejectReason> {
        if ts < self.wts {
            return Err(RejectReason::ReadTooLate {
                key: self.key.clone(),
                ts,
                wts: self.wts,
            });
        }
        Ok(())
    }

    /// Check the write rules for a transaction with timestamp `ts`
    ///
    /// The RTS rule is checked first, so a write violating both reports the
    /// newer read.
    pub fn check_write(&self, ts: Timestamp) -> Result<(), RejectReason> {
        if ts < self.rts {
            return Err(RejectReason::WriteAfterNewerRead {
                key: self.key.clone(),
                ts,
                rts: self.rts,
            });
        }
        if ts < self.wts {
            return Err(RejectReason::WriteAfterNewerWrite {
                key: self.key.clone(),
                ts,
                wts: self.wts,
            });
        }
        Ok(())
    }

    /// Record an accepted read
    pub fn record_read(&mut self, ts: Timestamp) {
        self.rts = self.rts.max(ts);
    }

    /// Record an accepted write
    ///
    /// Only called after [`check_write`](Self::check_write) passed, so `ts`
    /// is never below the current WTS.
    pub fn record_write(&mut self, ts: Timestamp) {
        debug_assert!(ts >= self.wts);
        self.wts = ts;
    }
}

impl std::fmt::Display for DataItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[RTS={}, WTS={}]", self.key, self.rts, self.wts)
    }
}

/// Registry of every data item referenced so far
///
/// Items are created lazily on first reference and never removed. Iteration
/// is ordered by key.
#[derive(Clone, Debug, Default)]
pub struct DataItemRegistry {
    items: BTreeMap<DataKey, DataItem>,
}

impl DataItemRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an item, creating it with zero timestamps if unseen
    pub fn get_or_create(&mut self, key: &DataKey) -> &mut DataItem {
        self.items
            .entry(key.clone())
            .or_insert_with(|| DataItem::new(key.clone()))
    }

    /// Look up an item by name
    pub fn get(&self, key: &str) -> Option<&DataItem> {
        self.items.get(key)
    }

    /// Iterate over items in key order
    pub fn iter(&self) -> impl Iterator<Item = &DataItem> {
        self.items.values()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if no item was referenced yet
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every item
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> DataKey {
        DataKey::new(name).unwrap()
    }

    #[test]
    fn test_new_item_is_untouched() {
        let item = DataItem::new(key("x"));
        assert_eq!(item.rts, 0);
        assert_eq!(item.wts, 0);
        assert_eq!(item.to_string(), "x[RTS=0, WTS=0]");
    }

    #[test]
    fn test_read_rule() {
        let mut item = DataItem::new(key("x"));
        item.wts = 3;

        assert!(item.check_read(3).is_ok());
        assert!(item.check_read(4).is_ok());
        assert_eq!(
            item.check_read(2),
            Err(RejectReason::ReadTooLate {
                key: key("x"),
                ts: 2,
                wts: 3
            })
        );
    }

    #[test]
    fn test_write_rule_rts() {
        let mut item = DataItem::new(key("y"));
        item.rts = 2;

        assert!(matches!(
            item.check_write(1),
            Err(RejectReason::WriteAfterNewerRead { ts: 1, rts: 2, .. })
        ));
        assert!(item.check_write(2).is_ok());
    }

    #[test]
    fn test_write_rule_wts() {
        let mut item = DataItem::new(key("z"));
        item.wts = 3;

        assert!(matches!(
            item.check_write(2),
            Err(RejectReason::WriteAfterNewerWrite { ts: 2, wts: 3, .. })
        ));
        assert!(item.check_write(3).is_ok());
    }

    #[test]
    fn test_write_rule_reports_rts_first() {
        let mut item = DataItem::new(key("z"));
        item.rts = 5;
        item.wts = 4;

        assert!(matches!(
            item.check_write(1),
            Err(RejectReason::WriteAfterNewerRead { .. })
        ));
    }

    #[test]
    fn test_record_read_keeps_max() {
        let mut item = DataItem::new(key("x"));
        item.record_read(3);
        item.record_read(1);
        assert_eq!(item.rts, 3);
        item.record_read(5);
        assert_eq!(item.rts, 5);
    }

    #[test]
    fn test_record_write() {
        let mut item = DataItem::new(key("x"));
        item.record_write(2);
        assert_eq!(item.wts, 2);
        item.record_write(2);
        assert_eq!(item.wts, 2);
    }

    #[test]
    fn test_registry_lazy_creation() {
        let mut registry = DataItemRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("x").is_none());

        registry.get_or_create(&key("x")).record_read(1);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("x").unwrap().rts, 1);

        // Second lookup returns the same item
        registry.get_or_create(&key("x")).record_write(2);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("x").unwrap().wts, 2);
    }

    #[test]
    fn test_registry_iterates_in_key_order() {
        let mut registry = DataItemRegistry::new();
        for name in ["z", "a", "m"] {
            registry.get_or_create(&key(name));
        }
        let names: Vec<&str> = registry.iter().map(|item| item.key.as_str()).collect();
        assert_eq!(names, ["a", "m", "z"]);
    }

    #[test]
    fn test_registry_clear() {
        let mut registry = DataItemRegistry::new();
        registry.get_or_create(&key("x"));
        registry.clear();
        assert!(registry.is_empty());
    }
}
