//! Persistence as ordered key-value tables inside one database file:
//! - Store (one open connection, explicitly closed)
//! - TableName (identifiers safe to splice into statements)
//! - Order check (keys are expected to run 1, 2, 3, ... with no holes)
//! - StoreError (one variant per way an operation can fail)
//!

//  All modules of this lib
mod error;
mod order;
mod store;
mod table_name;

//  External API
pub use error::{ErrorKind, SchemaFault, StoreError};
pub use order::next_in_sequence;
pub use store::Store;
pub use table_name::TableName;
