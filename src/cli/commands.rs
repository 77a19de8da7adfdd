//! This module is where all the commands are executed.
//!
//! Wiz command line syntax:
//!
//! - wiz-store --help | Command Line Help
//! - wiz-store --store ledger <command> | Run one command and exit.
//! - wiz-store | Run the REPL.
//!
//! Inside the REPL, the store commands are the same as on the command line
//! with a few session commands on top:
//!
//! - open <store>; use <store>; close [store]; stores
//! - create <table>; clear <table>; count <table>
//! - insert <table> <key> <value*>; get <table> <key>; delete <table> <key>
//! - keys <table>; max <table>; check <table>
//! - history [n]; help; quit
//!
//! Here * means the rest of the line, stored exactly as typed.

use std::fmt::Display;

use thiserror::Error;

use crate::cli::messages::highlight_argument;
use crate::cli::parsers::{ReplCommand, StoreCommand, repl_help};
use crate::config::ConfigError;
use crate::persistence::{Store, StoreError};
use crate::sessions::Session;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("a store is required; pass --store <NAME>")]
    MissingStore,

    #[error("no active store; use 'open <name>' first")]
    NoActiveStore,

    #[error("{0}")]
    Session(String),
}

/// The executor that runs a [`StoreCommand`] against one [`Store`].
///
/// Every command is a single blocking call into the store; the executor
/// only picks the call and packs the answer into a [`StoreResult`].
pub struct StoreExecutor<'a> {
    command: &'a StoreCommand,
}

/// What a store command produced, ready to be displayed.
#[derive(Debug, PartialEq, Eq)]
pub enum StoreResult {
    Created(String),
    Cleared(String),
    Inserted { table: String, key: u64 },
    Deleted { table: String, key: u64 },
    Value(String),
    Keys(Vec<u64>),
    MaxKey(u64),
    Count(u64),
    NextKey(u64),
}

impl Display for StoreResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created(table) => write!(f, "table {} is ready", highlight_argument(table)),
            Self::Cleared(table) => write!(f, "table {} cleared", highlight_argument(table)),
            Self::Inserted { table, key } => write!(
                f,
                "inserted key {} into {}",
                highlight_argument(&key.to_string()),
                highlight_argument(table)
            ),
            Self::Deleted { table, key } => write!(
                f,
                "deleted key {} from {}",
                highlight_argument(&key.to_string()),
                highlight_argument(table)
            ),
            Self::Value(value) => write!(f, "{}", value),
            Self::Keys(keys) => {
                let keys = serde_json::to_string(keys).map_err(|_| std::fmt::Error)?;
                write!(f, "{}", keys)
            }
            Self::MaxKey(key) => write!(f, "{}", key),
            Self::Count(count) => write!(f, "{}", count),
            Self::NextKey(key) => write!(
                f,
                "keys are in order, next key is {}",
                highlight_argument(&key.to_string())
            ),
        }
    }
}

impl<'a> StoreExecutor<'a> {
    pub fn new(command: &'a StoreCommand) -> StoreExecutor<'a> {
        StoreExecutor { command }
    }

    pub fn execute(&self, store: &Store) -> Result<StoreResult, StoreError> {
        let result = match self.command {
            StoreCommand::Create { table } => {
                store.create_table(table)?;
                StoreResult::Created(table.clone())
            }
            StoreCommand::Clear { table } => {
                store.clear_table(table)?;
                StoreResult::Cleared(table.clone())
            }
            StoreCommand::Insert { table, key, value } => {
                store.insert(table, *key, &value.join(" "))?;
                StoreResult::Inserted {
                    table: table.clone(),
                    key: *key,
                }
            }
            StoreCommand::Get { table, key } => StoreResult::Value(store.get(table, *key)?),
            StoreCommand::Delete { table, key } => {
                store.delete(table, *key)?;
                StoreResult::Deleted {
                    table: table.clone(),
                    key: *key,
                }
            }
            StoreCommand::Keys { table } => StoreResult::Keys(store.list_keys(table)?),
            StoreCommand::Max { table } => StoreResult::MaxKey(store.max_key(table)?),
            StoreCommand::Check { table } => StoreResult::NextKey(store.check_order(table)?),
            StoreCommand::Count { table } => StoreResult::Count(store.len(table)?),
        };

        Ok(result)
    }
}

/// What the REPL should do after a command ran.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplOutcome {
    Store(StoreResult),
    Message(String),
    Quit,
}

pub fn execute_repl(session: &mut Session, command: &ReplCommand) -> Result<ReplOutcome, CliError> {
    //! Run one REPL command against the session.
    //!
    //! Store commands go to the active store; session commands change which
    //! stores are open.

    let outcome = match command {
        ReplCommand::Open { name } => {
            let store = session.open_store(name)?;
            ReplOutcome::Message(format!(
                "store {} is active ({})",
                highlight_argument(name),
                store.path().display()
            ))
        }
        ReplCommand::Use { name } => {
            session.use_store(name).map_err(CliError::Session)?;
            ReplOutcome::Message(format!("store {} is active", highlight_argument(name)))
        }
        ReplCommand::Close { name } => {
            let name = match name {
                Some(name) => name.clone(),
                None => session
                    .active_store_name()
                    .map(str::to_string)
                    .ok_or(CliError::NoActiveStore)?,
            };

            if !session.close_store(&name) {
                return Err(CliError::Session(format!(
                    "store '{}' is not open in this session",
                    name
                )));
            }
            ReplOutcome::Message(format!("store {} closed", highlight_argument(&name)))
        }
        ReplCommand::Stores => {
            let active = session.active_store_name();
            let lines: Vec<String> = session
                .store_names()
                .iter()
                .map(|name| {
                    let marker = if Some(name.as_str()) == active { "*" } else { " " };
                    format!("{} {}", marker, name)
                })
                .collect();

            if lines.is_empty() {
                ReplOutcome::Message("no stores are open".to_string())
            } else {
                ReplOutcome::Message(lines.join("\n"))
            }
        }
        ReplCommand::History { count } => {
            let history = session.command_history();
            let limit = count.unwrap_or(history.len());
            let lines: Vec<String> = history
                .iter()
                .rev()
                .take(limit)
                .enumerate()
                .map(|(index, command)| format!("{:3} | {}", index + 1, command))
                .collect();

            ReplOutcome::Message(lines.join("\n"))
        }
        ReplCommand::Help => ReplOutcome::Message(repl_help()),
        ReplCommand::Quit => ReplOutcome::Quit,
        ReplCommand::Store(store_command) => {
            let store = session.active_store().ok_or(CliError::NoActiveStore)?;
            ReplOutcome::Store(StoreExecutor::new(store_command).execute(store)?)
        }
    };

    Ok(outcome)
}
