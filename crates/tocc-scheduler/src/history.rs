//! History - accepted operations in acceptance order

use tocc_primitives::{Operation, TxId};

/// Ordered sequence of accepted operations
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    ops: Vec<Operation>,
}

impl History {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an accepted operation
    pub fn push(&mut self, op: Operation) {
        self.ops.push(op);
    }

    /// Remove every operation of `tx`, returning them in history order
    pub fn purge(&mut self, tx: TxId) -> Vec<Operation> {
        let (purged, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.ops)
            .into_iter()
            .partition(|op| op.tx() == tx);
        self.ops = kept;
        purged
    }

    /// Check if any operation of `tx` is in the history
    pub fn contains_tx(&self, tx: TxId) -> bool {
        self.ops.iter().any(|op| op.tx() == tx)
    }

    /// Accepted operations
    pub fn as_slice(&self) -> &[Operation] {
        &self.ops
    }

    /// Iterate over accepted operations
    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.ops.iter()
    }

    /// Number of operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Drop every operation
    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl std::fmt::Display for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
