use std::fmt::Display;

use super::error::{SchemaFault, StoreError};

const MAX_NAME_LENGTH: usize = 64;
const RESERVED_PREFIX: &str = "sqlite_";

/// A table identifier that is safe to splice into a statement.
///
/// The engine cannot bind identifiers as parameters, so names are held to
/// `[A-Za-z_][A-Za-z0-9_]*`, at most 64 characters, and are always emitted
/// double-quoted. Keys and values never go through here; they are bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    pub fn parse(op: &'static str, name: &str) -> Result<TableName, StoreError> {
        //! Validate `name` as an identifier for operation `op`.
        //!
        //! Returns a [`StoreError::Schema`] with an illegal-name fault when the
        //! name falls outside the allowed character set.

        match check(name) {
            Ok(()) => Ok(TableName(name.to_string())),
            Err(reason) => Err(StoreError::Schema {
                op,
                table: name.to_string(),
                source: SchemaFault::IllegalName {
                    name: name.to_string(),
                    reason,
                },
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub(crate) fn check(name: &str) -> Result<(), &'static str> {
    let mut chars = name.chars();

    match chars.next() {
        None => return Err("name is empty"),
        Some(first) if !(first.is_ascii_alphabetic() || first == '_') => {
            return Err("must start with a letter or underscore");
        }
        _ => {}
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err("longer than 64 characters");
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("only letters, digits and underscores are allowed");
    }
    if name.to_ascii_lowercase().starts_with(RESERVED_PREFIX) {
        return Err("prefix 'sqlite_' is reserved by the engine");
    }

    Ok(())
}
