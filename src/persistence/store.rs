use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use log::{debug, info, trace, warn};
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use serde::de::DeserializeOwned;

use crate::config::StoreConfig;
use crate::marshal::{self, StoreValue};

use super::error::StoreError;
use super::order::next_in_sequence;
use super::table_name::{self, TableName};

/// An open handle to one database file.
///
/// A [`Store`] holds exactly one engine connection behind a [`Mutex`]. Every
/// operation takes the lock for its whole round trip, which is all the
/// coordination the store does: the engine serialises writers at the file
/// level and nothing here queues or retries.
///
/// Every table in a store has the same two columns:
/// - `key`, an unsigned integer primary key
/// - `value`, a non-empty string
///
/// Once [`Store::close`] has run the connection slot is `None` and every
/// further operation fails with [`StoreError::Closed`].
pub struct Store {
    name: String,
    path: PathBuf,
    connection: Mutex<Option<Connection>>,
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> Result<Store, StoreError> {
        //! Open the database file at `path`, creating it if it is absent.
        //!
        //! The file's contents are not inspected here; a file that is not a
        //! database surfaces on the first query instead.

        let path = path.as_ref().to_path_buf();
        let connection = Connection::open(&path).map_err(|source| StoreError::Connection {
            op: "Store.open",
            path: path.clone(),
            source,
        })?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        info!("opened store '{}' at {}", name, path.display());

        Ok(Store {
            name,
            path,
            connection: Mutex::new(Some(connection)),
        })
    }

    pub fn open_named(config: &StoreConfig, name: &str) -> Result<Store, StoreError> {
        //! Open the store called `name` inside the configured data directory,
        //! i.e. `<data_dir>/<name>.db`.
        //!
        //! `name` becomes a file name, so it follows the same rules as a
        //! table name.

        table_name::check(name).map_err(|reason| StoreError::Validation {
            op: "Store.open",
            reason: format!("illegal store name '{}': {}", name, reason),
        })?;

        Store::open(config.resolve(name))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    pub fn close(&self) {
        //! Release the connection. Closing an already closed store does
        //! nothing.

        let Some(connection) = self.lock().take() else {
            return;
        };

        match connection.close() {
            Ok(()) => info!("closed store '{}'", self.name),
            Err((_, error)) => warn!(
                "store '{}' did not close cleanly, dropping the connection: {}",
                self.name, error
            ),
        }
    }

    pub fn create_table(&self, table: &str) -> Result<(), StoreError> {
        //! Create `table` unless it already exists.

        const OP: &str = "Store.create_table";

        self.with_connection(OP, |connection| {
            let name = TableName::parse(OP, table)?;
            let query = format!(
                "CREATE TABLE IF NOT EXISTS {} (key INTEGER PRIMARY KEY, value TEXT NOT NULL)",
                name.quoted()
            );

            connection
                .execute(&query, [])
                .map_err(|source| StoreError::engine(OP, table, source))?;

            debug!("{}: '{}' ready", OP, name);
            Ok(())
        })
    }

    pub fn clear_table(&self, table: &str) -> Result<(), StoreError> {
        //! Delete every entry in `table`, keeping the table itself.

        const OP: &str = "Store.clear_table";

        self.with_connection(OP, |connection| {
            let name = TableName::parse(OP, table)?;
            let query = format!("DELETE FROM {}", name.quoted());

            let removed = connection
                .execute(&query, [])
                .map_err(|source| StoreError::engine(OP, table, source))?;

            debug!("{}: removed {} entries from '{}'", OP, removed, name);
            Ok(())
        })
    }

    pub fn insert(&self, table: &str, key: u64, value: &str) -> Result<(), StoreError> {
        //! Insert `value` at `key`. Existing entries are never overwritten.
        //!
        //! Fails with [`StoreError::Validation`] on an empty value and with
        //! [`StoreError::Conflict`] when `key` is already taken.

        const OP: &str = "Store.insert";

        self.with_connection(OP, |connection| {
            let name = TableName::parse(OP, table)?;
            if value.is_empty() {
                return Err(StoreError::Validation {
                    op: OP,
                    reason: "empty string is not accepted as a value".to_string(),
                });
            }
            let engine_key = engine_key(OP, key)?;
            let query = format!("INSERT INTO {} (key, value) VALUES (?1, ?2)", name.quoted());

            connection
                .execute(&query, params![engine_key, value])
                .map_err(|source| match source {
                    rusqlite::Error::SqliteFailure(failure, _)
                        if failure.code == ErrorCode::ConstraintViolation =>
                    {
                        StoreError::Conflict {
                            op: OP,
                            table: table.to_string(),
                            key,
                        }
                    }
                    source => StoreError::engine(OP, table, source),
                })?;

            debug!("{}: '{}' key {}", OP, name, key);
            Ok(())
        })
    }

    pub fn insert_value<V>(&self, table: &str, key: u64, value: &V) -> Result<(), StoreError>
    where
        V: StoreValue + ?Sized,
    {
        //! Encode `value` through [`StoreValue`] and insert the result.

        let encoded = value.encode().map_err(|error| StoreError::Validation {
            op: "Store.insert",
            reason: error.to_string(),
        })?;

        self.insert(table, key, &encoded)
    }

    pub fn get(&self, table: &str, key: u64) -> Result<String, StoreError> {
        //! Look up the value stored at `key`.

        const OP: &str = "Store.get";

        self.with_connection(OP, |connection| {
            let name = TableName::parse(OP, table)?;
            let query = format!("SELECT value FROM {} WHERE key = ?1", name.quoted());

            // Keys past the engine range can never have been stored.
            let value = match i64::try_from(key) {
                Ok(engine_key) => connection
                    .query_row(&query, params![engine_key], |row| row.get::<_, String>(0))
                    .optional()
                    .map_err(|source| StoreError::engine(OP, table, source))?,
                Err(_) => None,
            };

            trace!("{}: '{}' key {} found={}", OP, name, key, value.is_some());
            value.ok_or_else(|| StoreError::NotFound {
                op: OP,
                table: table.to_string(),
                key,
            })
        })
    }

    pub fn get_json<T: DeserializeOwned>(&self, table: &str, key: u64) -> Result<T, StoreError> {
        //! Look up the value at `key` and decode it from JSON.

        let stored = self.get(table, key)?;

        marshal::decode_json(&stored).map_err(|error| StoreError::Validation {
            op: "Store.get",
            reason: format!("key {} in table '{}': {}", key, table, error),
        })
    }

    pub fn delete(&self, table: &str, key: u64) -> Result<(), StoreError> {
        //! Delete the entry at `key`. Deleting an absent key succeeds.

        const OP: &str = "Store.delete";

        self.with_connection(OP, |connection| {
            let name = TableName::parse(OP, table)?;
            let Ok(engine_key) = i64::try_from(key) else {
                trace!("{}: '{}' key {} is past the engine range", OP, name, key);
                return Ok(());
            };
            let query = format!("DELETE FROM {} WHERE key = ?1", name.quoted());

            let removed = connection
                .execute(&query, params![engine_key])
                .map_err(|source| StoreError::engine(OP, table, source))?;

            debug!("{}: '{}' key {} removed={}", OP, name, key, removed);
            Ok(())
        })
    }

    pub fn list_keys(&self, table: &str) -> Result<Vec<u64>, StoreError> {
        //! Every key in `table`, ascending.
        //!
        //! The scan is fully collected before returning; a failure part way
        //! through discards what was read so far.

        const OP: &str = "Store.list_keys";

        self.with_connection(OP, |connection| scan_keys(connection, OP, table))
    }

    pub fn max_key(&self, table: &str) -> Result<u64, StoreError> {
        //! The largest key in `table`.
        //!
        //! An empty table yields `0` rather than an error. That `0` is
        //! indistinguishable from a stored key `0`; use [`Store::len`] when
        //! the difference matters.

        const OP: &str = "Store.max_key";

        self.with_connection(OP, |connection| {
            let name = TableName::parse(OP, table)?;
            let query = format!("SELECT COALESCE(MAX(key), 0) FROM {}", name.quoted());

            connection
                .query_row(&query, [], |row| stored_key(row.get::<_, i64>(0)?))
                .map_err(|source| StoreError::engine(OP, table, source))
        })
    }

    pub fn len(&self, table: &str) -> Result<u64, StoreError> {
        //! Number of entries in `table`.

        const OP: &str = "Store.len";

        self.with_connection(OP, |connection| {
            let name = TableName::parse(OP, table)?;
            let query = format!("SELECT COUNT(*) FROM {}", name.quoted());

            connection
                .query_row(&query, [], |row| stored_key(row.get::<_, i64>(0)?))
                .map_err(|source| StoreError::engine(OP, table, source))
        })
    }

    pub fn check_order(&self, table: &str) -> Result<u64, StoreError> {
        //! Verify the keys of `table` run `1, 2, 3, ...` with no holes,
        //! ignoring key `0`.
        //!
        //! Returns the next free key when the run is unbroken. Otherwise
        //! returns [`StoreError::OrderGap`] carrying the first missing key,
        //! which is also where the caller should insert next
        //! (see [`StoreError::next_key`]).

        const OP: &str = "Store.check_order";

        self.with_connection(OP, |connection| {
            let keys = scan_keys(connection, OP, table)?;

            next_in_sequence(&keys).map_err(|expected| {
                warn!("table '{}' is missing key {}", table, expected);
                StoreError::OrderGap {
                    table: table.to_string(),
                    expected,
                }
            })
        })
    }

    fn lock(&self) -> MutexGuard<'_, Option<Connection>> {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn with_connection<T, F>(&self, op: &'static str, operation: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let guard = self.lock();
        let connection = guard.as_ref().ok_or(StoreError::Closed { op })?;
        operation(connection)
    }
}

fn scan_keys(
    connection: &Connection,
    op: &'static str,
    table: &str,
) -> Result<Vec<u64>, StoreError> {
    let name = TableName::parse(op, table)?;
    let query = format!("SELECT key FROM {} ORDER BY key ASC", name.quoted());

    let keys = connection
        .prepare(&query)
        .and_then(|mut statement| {
            let rows = statement
                .query_map([], |row| stored_key(row.get::<_, i64>(0)?))?
                .collect::<Result<Vec<u64>, _>>();
            rows
        })
        .map_err(|source| StoreError::engine(op, table, source))?;

    trace!("{}: '{}' holds {} keys", op, name, keys.len());
    Ok(keys)
}

fn engine_key(op: &'static str, key: u64) -> Result<i64, StoreError> {
    i64::try_from(key).map_err(|_| StoreError::Validation {
        op,
        reason: format!("key {} is above the engine limit of {}", key, i64::MAX),
    })
}

fn stored_key(key: i64) -> rusqlite::Result<u64> {
    u64::try_from(key).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_shareable<T: Send + Sync>() {}

    #[test]
    fn store_is_send_and_sync() {
        _assert_shareable::<Store>();
    }

    #[test]
    fn engine_key_limits() {
        assert_eq!(engine_key("Store.insert", 42).unwrap(), 42);
        assert!(engine_key("Store.insert", u64::MAX).is_err());
    }

    #[test]
    fn negative_stored_keys_are_rejected() {
        assert_eq!(stored_key(5).unwrap(), 5);
        assert!(stored_key(-1).is_err());
    }
}
