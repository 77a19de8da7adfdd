//! The place where the command line and the REPL line parsers are defined.
//!
//! Both sit on `clap`: store commands are a single [`StoreCommand`]
//! subcommand enum that is reused as-is inside the REPL grammar.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wiz-store")]
#[command(about = "An ordered key-value table store on SQLite", long_about = None)]
#[command(version)]
pub struct CliParser {
    /// Directory holding the `<store>.db` files, overrides WIZ_STORE_DIR.
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace), overrides WIZ_STORE_LOG.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Store to open; required when a command is given.
    #[arg(long, short, value_name = "NAME")]
    pub store: Option<String>,

    /// Run a single command and exit. Starts the REPL when omitted.
    #[command(subcommand)]
    pub command: Option<StoreCommand>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum StoreCommand {
    /// Create a table unless it already exists.
    Create { table: String },

    /// Delete every entry of a table.
    Clear { table: String },

    /// Insert a value at a key; never overwrites. In the REPL the value is
    /// the rest of the line exactly as typed.
    Insert {
        table: String,
        key: u64,
        #[arg(
            required = true,
            num_args = 1..,
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        value: Vec<String>,
    },

    /// Print the value stored at a key.
    Get { table: String, key: u64 },

    /// Delete the entry at a key, if any.
    Delete { table: String, key: u64 },

    /// List every key of a table in ascending order.
    Keys { table: String },

    /// Print the largest key of a table, 0 when empty.
    Max { table: String },

    /// Check that keys run 1, 2, 3, ... and print the next free key.
    Check { table: String },

    /// Print the number of entries in a table.
    Count { table: String },
}

#[derive(Parser)]
#[command(
    name = "wiz",
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct ReplParser {
    #[command(subcommand)]
    command: ReplCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ReplCommand {
    /// Open a store and make it active.
    Open { name: String },

    /// Switch to a store opened earlier in this session.
    Use { name: String },

    /// Close a store, the active one when no name is given.
    Close { name: Option<String> },

    /// List the stores opened in this session.
    Stores,

    /// Show the command history, optionally only the latest entries.
    History { count: Option<usize> },

    /// List all available commands.
    Help,

    /// End the session.
    #[command(alias = "exit")]
    Quit,

    #[command(flatten)]
    Store(StoreCommand),
}

pub fn parse_repl_line(line: &str) -> Result<ReplCommand, String> {
    //! Parse one REPL line into a command.
    //!
    //! Returns the rendered clap error on failure so the REPL can print it
    //! and carry on.

    let command = ReplParser::try_parse_from(line.split_whitespace())
        .map(|parsed| parsed.command)
        .map_err(|error| error.render().to_string().trim_end().to_string())?;

    match command {
        ReplCommand::Store(StoreCommand::Insert { table, key, value }) => {
            let value = rest_after_tokens(line, 3)
                .map(|raw| vec![raw.to_string()])
                .unwrap_or(value);
            Ok(ReplCommand::Store(StoreCommand::Insert { table, key, value }))
        }
        command => Ok(command),
    }
}

fn rest_after_tokens(line: &str, skip: usize) -> Option<&str> {
    //! The text of `line` after its first `skip` whitespace-separated
    //! tokens, with inner whitespace and quotes kept as typed.

    let mut rest = line.trim_start();
    for _ in 0..skip {
        let end = rest.find(char::is_whitespace)?;
        rest = rest[end..].trim_start();
    }

    let rest = rest.trim_end();
    (!rest.is_empty()).then_some(rest)
}

pub fn repl_help() -> String {
    use clap::CommandFactory;

    ReplParser::command()
        .render_long_help()
        .to_string()
        .trim_end()
        .to_string()
}
