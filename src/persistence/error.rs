//! Every failure the store can hand back to a caller.
//!
//! Each variant carries the operation that produced it (`Store.<op>`) so
//! the rendered message reads as a trail: operation, table, cause. The
//! engine's own error stays reachable through [`std::error::Error::source`].

use std::path::PathBuf;

use thiserror::Error;

/// The cause behind a [`StoreError::Schema`].
#[derive(Debug, Error)]
pub enum SchemaFault {
    #[error(transparent)]
    Engine(#[from] rusqlite::Error),

    #[error("illegal identifier '{name}': {reason}")]
    IllegalName { name: String, reason: &'static str },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{op}: store is closed")]
    Closed { op: &'static str },

    #[error("{op}: cannot open '{}': {source}", .path.display())]
    Connection {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{op}: table '{table}': {source}")]
    Schema {
        op: &'static str,
        table: String,
        #[source]
        source: SchemaFault,
    },

    #[error("{op}: {reason}")]
    Validation { op: &'static str, reason: String },

    #[error("{op}: key {key} already exists in table '{table}'")]
    Conflict {
        op: &'static str,
        table: String,
        key: u64,
    },

    #[error("{op}: no entry at key {key} in table '{table}'")]
    NotFound {
        op: &'static str,
        table: String,
        key: u64,
    },

    #[error("Store.check_order: gap in table '{table}', key {expected} is missing")]
    OrderGap { table: String, expected: u64 },
}

/// A flat classification of [`StoreError`], handy for matching in callers
/// and tests without destructuring payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Closed,
    Connection,
    Schema,
    Validation,
    Conflict,
    NotFound,
    OrderGap,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Closed { .. } => ErrorKind::Closed,
            StoreError::Connection { .. } => ErrorKind::Connection,
            StoreError::Schema { .. } => ErrorKind::Schema,
            StoreError::Validation { .. } => ErrorKind::Validation,
            StoreError::Conflict { .. } => ErrorKind::Conflict,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::OrderGap { .. } => ErrorKind::OrderGap,
        }
    }

    pub fn next_key(&self) -> Option<u64> {
        //! The key a caller should insert next to heal an order gap.
        //!
        //! Returns [`None`] for every other kind of failure.

        match self {
            StoreError::OrderGap { expected, .. } => Some(*expected),
            _ => None,
        }
    }

    pub(crate) fn engine(op: &'static str, table: &str, source: rusqlite::Error) -> StoreError {
        StoreError::Schema {
            op,
            table: table.to_string(),
            source: SchemaFault::Engine(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_carries_operation_and_table() {
        let err = StoreError::Conflict {
            op: "Store.insert",
            table: "blocks".to_string(),
            key: 3,
        };

        assert_eq!(
            err.to_string(),
            "Store.insert: key 3 already exists in table 'blocks'"
        );
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.next_key(), None);
    }

    #[test]
    fn order_gap_exposes_expected_key() {
        let err = StoreError::OrderGap {
            table: "blocks".to_string(),
            expected: 3,
        };

        assert_eq!(err.next_key(), Some(3));
        assert_eq!(err.kind(), ErrorKind::OrderGap);
    }

    #[test]
    fn schema_error_keeps_engine_source() {
        let err = StoreError::engine(
            "Store.list_keys",
            "missing",
            rusqlite::Error::QueryReturnedNoRows,
        );

        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("Store.list_keys: table 'missing'"));
    }
}
