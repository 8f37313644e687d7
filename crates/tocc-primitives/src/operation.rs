//! Operations of an input history and their textual notation
//!
//! A history is written as a sequence of tokens:
//!
//! ```text
//! r1(x)   T1 reads x
//! w2(y)   T2 writes y
//! c3      T3 commits
//! ```
//!
//! Tokens are case-insensitive and may be separated by whitespace or commas.

use crate::data_key::{DataKey, DataKeyError};
use crate::tx_id::{TxId, TxIdError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Notation parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    /// Blank token
    #[error("empty operation")]
    EmptyToken,

    /// Token does not start with `r`, `w` or `c`
    #[error("unknown operation kind {kind:?} in {token:?}, expected r, w or c")]
    UnknownKind {
        /// Offending token
        token: String,
        /// Leading character
        kind: char,
    },

    /// Missing or non-numeric transaction id
    #[error("invalid transaction id in {token:?}")]
    InvalidTxId {
        /// Offending token
        token: String,
    },

    /// Transaction id 0
    #[error("{source} in {token:?}")]
    ZeroTxId {
        /// Offending token
        token: String,
        /// Underlying error
        source: TxIdError,
    },

    /// Read/write without `(key)`
    #[error("expected (key) after transaction id in {token:?}")]
    MissingKey {
        /// Offending token
        token: String,
    },

    /// Commit written with a key
    #[error("commit takes no data key: {token:?}")]
    UnexpectedKey {
        /// Offending token
        token: String,
    },

    /// Characters after the closing parenthesis
    #[error("unexpected characters after ')' in {token:?}")]
    TrailingInput {
        /// Offending token
        token: String,
    },

    /// Invalid key between the parentheses
    #[error("{source} in {token:?}")]
    InvalidKey {
        /// Offending token
        token: String,
        /// Underlying error
        source: DataKeyError,
    },
}

/// Kind of an operation
///
/// Reads and writes carry the key they touch; a commit touches nothing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Read of a data item
    Read(DataKey),
    /// Write of a data item
    Write(DataKey),
    /// Transaction commit
    Commit,
}

impl OpKind {
    /// Notation prefix (`r`, `w`, `c`)
    pub fn prefix(&self) -> char {
        match self {
            OpKind::Read(_) => 'r',
            OpKind::Write(_) => 'w',
            OpKind::Commit => 'c',
        }
    }

    /// Data key touched by this kind, if any
    pub fn key(&self) -> Option<&DataKey> {
        match self {
            OpKind::Read(key) | OpKind::Write(key) => Some(key),
            OpKind::Commit => None,
        }
    }
}

/// One step of an input history
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct Operation {
    tx: TxId,
    kind: OpKind,
}

impl Operation {
    /// Create an operation from its parts
    pub fn new(tx: TxId, kind: OpKind) -> Self {
        Self { tx, kind }
    }

    /// Read of `key` by `tx`
    pub fn read(tx: TxId, key: DataKey) -> Self {
        Self::new(tx, OpKind::Read(key))
    }

    /// Write of `key` by `tx`
    pub fn write(tx: TxId, key: DataKey) -> Self {
        Self::new(tx, OpKind::Write(key))
    }

    /// Commit of `tx`
    pub fn commit(tx: TxId) -> Self {
        Self::new(tx, OpKind::Commit)
    }

    /// Issuing transaction
    pub fn tx(&self) -> TxId {
        self.tx
    }

    /// Operation kind
    pub fn kind(&self) -> &OpKind {
        &self.kind
    }

    /// Data key, `None` for commits
    pub fn key(&self) -> Option<&DataKey> {
        self.kind.key()
    }

    /// Check if this is a commit
    pub fn is_commit(&self) -> bool {
        matches!(self.kind, OpKind::Commit)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.tx.as_u32();
        match &self.kind {
            OpKind::Read(key) => write!(f, "r{}({})", id, key),
            OpKind::Write(key) => write!(f, "w{}({})", id, key),
            OpKind::Commit => write!(f, "c{}", id),
        }
    }
}

impl FromStr for Operation {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        let mut chars = token.chars();
        let kind = chars.next().ok_or(NotationError::EmptyToken)?;
        let rest = chars.as_str();

        match kind {
            'c' => {
                if rest.contains('(') {
                    return Err(NotationError::UnexpectedKey { token });
                }
                let tx = parse_tx_id(rest, &token)?;
                Ok(Operation::commit(tx))
            }
            'r' | 'w' => {
                let open = rest
                    .find('(')
                    .ok_or_else(|| NotationError::MissingKey { token: token.clone() })?;
                let tx = parse_tx_id(&rest[..open], &token)?;

                let after_open = &rest[open + 1..];
                let close = after_open
                    .find(')')
                    .ok_or_else(|| NotationError::MissingKey { token: token.clone() })?;
                if close + 1 != after_open.len() {
                    return Err(NotationError::TrailingInput { token });
                }

                let key = DataKey::new(&after_open[..close]).map_err(|source| {
                    NotationError::InvalidKey {
                        token: token.clone(),
                        source,
                    }
                })?;

                Ok(if kind == 'r' {
                    Operation::read(tx, key)
                } else {
                    Operation::write(tx, key)
                })
            }
            other => Err(NotationError::UnknownKind {
                kind: other,
                token,
            }),
        }
    }
}

impl TryFrom<String> for Operation {
    type Error = NotationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Operation> for String {
    fn from(op: Operation) -> Self {
        op.to_string()
    }
}

fn parse_tx_id(digits: &str, token: &str) -> Result<TxId, NotationError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NotationError::InvalidTxId {
            token: token.to_string(),
        });
    }
    let raw: u32 = digits.parse().map_err(|_| NotationError::InvalidTxId {
        token: token.to_string(),
    })?;
    TxId::new(raw).map_err(|source| NotationError::ZeroTxId {
        token: token.to_string(),
        source,
    })
}

/// Parse a whole history such as `"r1(x) w1(x), c1"`
///
/// Tokens are separated by whitespace and/or commas. An empty string is an
/// empty history.
pub fn parse_history(input: &str) -> Result<Vec<Operation>, NotationError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}
