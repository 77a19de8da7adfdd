//! The only point of truth for everything related to the current user
//! session on the command line. A session holds the command history, the
//! stores opened during the session and which one of them is active.
//!
//! Stores are kept in an [`IndexMap`] so they list in the order they were
//! opened. At the end of a session every store it opened is closed.

use std::{fmt::Display, time::SystemTime};

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use log::debug;

use crate::config::StoreConfig;
use crate::persistence::{Store, StoreError};

pub struct CommandHistory {
    command: String,
    command_time: SystemTime,
}

impl CommandHistory {
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn command_time_string(&self) -> String {
        let datetime: DateTime<Local> = self.command_time.into();
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl Display for CommandHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.command_time_string(), self.command)
    }
}

pub struct Session {
    config: StoreConfig,
    command_history: Vec<CommandHistory>,
    start_time: SystemTime,
    stores: IndexMap<String, Store>,
    active_store: Option<String>,
}

impl Session {
    pub fn new(config: StoreConfig) -> Session {
        Session {
            config,
            command_history: vec![],
            start_time: SystemTime::now(),
            stores: IndexMap::new(),
            active_store: None,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn open_store(&mut self, name: &str) -> Result<&Store, StoreError> {
        //! Open the store called `name` and make it the active one.
        //!
        //! A store that is already open in this session is reused.

        if !self.stores.contains_key(name) {
            let store = Store::open_named(&self.config, name)?;
            self.stores.insert(name.to_string(), store);
        }

        self.active_store = Some(name.to_string());
        debug!("session: active store is '{}'", name);
        Ok(&self.stores[name])
    }

    pub fn use_store(&mut self, name: &str) -> Result<(), String> {
        //! Switch the active store to one already opened in this session.

        if self.stores.contains_key(name) {
            self.active_store = Some(name.to_string());
            Ok(())
        } else {
            Err(format!("store '{}' is not open in this session", name))
        }
    }

    pub fn close_store(&mut self, name: &str) -> bool {
        //! Close the store called `name` and forget it.
        //!
        //! Returns `false` when no such store was open.

        let Some(store) = self.stores.shift_remove(name) else {
            return false;
        };
        store.close();

        if self.active_store.as_deref() == Some(name) {
            self.active_store = None;
        }
        true
    }

    pub fn close_all(&mut self) {
        for (_, store) in self.stores.drain(..) {
            store.close();
        }
        self.active_store = None;
    }

    pub fn active_store(&self) -> Option<&Store> {
        //! The currently active store, otherwise [`None`].

        self.active_store
            .as_ref()
            .and_then(|name| self.stores.get(name))
    }

    pub fn active_store_name(&self) -> Option<&str> {
        self.active_store.as_deref()
    }

    pub fn store_names(&self) -> Vec<String> {
        self.stores.keys().cloned().collect()
    }

    pub fn add_to_command_history(&mut self, command: &str) {
        self.command_history.push(CommandHistory {
            command: command.to_string(),
            command_time: SystemTime::now(),
        });
    }

    pub fn command_history(&self) -> &[CommandHistory] {
        &self.command_history
    }

    pub fn start_time_string(&self) -> String {
        //! Convert the session start into a readable timestamp.

        let datetime: DateTime<Local> = self.start_time.into();
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn get_last_command(&self, nth_back: usize) -> Option<&str> {
        //! Get the `nth_back`th most recent command, `1` being the latest.

        if nth_back == 0 {
            return None;
        }

        self.command_history
            .iter()
            .nth_back(nth_back - 1)
            .map(|cmd| cmd.command.as_str())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close_all();
    }
}
