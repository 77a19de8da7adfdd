//! An ordered key-value table store over an embedded SQLite file.
//!
//! Every table holds `(key, value)` pairs where keys are unsigned integers
//! and values are non-empty strings. Tables are expected to fill keys
//! `1, 2, 3, ...` in order, and [`persistence::Store::check_order`] reports
//! the first hole when they do not.

pub mod cli;
pub mod config;
pub mod marshal;
pub mod persistence;
pub mod sessions;
