use std::{
    io::{self, Write},
    str::FromStr,
};

use colored::Colorize;
use log::LevelFilter;

use crate::{
    cli::{
        colors::WIZ_VIOLET,
        commands::{ReplOutcome, StoreExecutor, execute_repl},
        messages::{highlight_argument, system_message, warning_message},
        parsers::parse_repl_line,
    },
    config::{ConfigError, StoreConfig},
    persistence::{Store, StoreError},
    sessions::Session,
};

mod colors;
pub mod commands;
mod logger;
mod messages;
pub mod parsers;
mod splash_screen;

pub use commands::{CliError, StoreResult};
pub use parsers::{CliParser, ReplCommand, StoreCommand};

const DEFAULT_LAST_COMMAND_DELIMITER: &str = "!";

pub fn run(cli: CliParser) -> Result<(), CliError> {
    //! Entry point of the binary: resolve the configuration, install the
    //! logger and either run one command or start the REPL.

    let mut config = StoreConfig::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config = config.with_data_dir(data_dir);
    }
    if let Some(level) = cli.log_level {
        let level = LevelFilter::from_str(level.trim()).map_err(|_| ConfigError::LogLevel {
            var: "--log-level",
            value: level.clone(),
        })?;
        config = config.with_log_level(level);
    }

    if logger::init(config.log_level).is_err() {
        eprintln!(
            "{}",
            warning_message("system", "a logger was already installed".to_string())
        );
    }

    match cli.command {
        Some(command) => run_once(&config, cli.store.as_deref(), &command),
        None => {
            run_client(config, cli.store.as_deref());
            Ok(())
        }
    }
}

fn run_once(
    config: &StoreConfig,
    store_name: Option<&str>,
    command: &StoreCommand,
) -> Result<(), CliError> {
    let store_name = store_name.ok_or(CliError::MissingStore)?;
    let store = Store::open_named(config, store_name)?;

    let result = StoreExecutor::new(command).execute(&store);
    store.close();

    println!("{}", result?);
    Ok(())
}

pub fn run_client(config: StoreConfig, store_name: Option<&str>) {
    splash_screen::splash_screen();

    let mut session = Session::new(config);

    if let Some(name) = store_name {
        match session.open_store(name) {
            Ok(store) => println!(
                "{}",
                system_message(
                    "system",
                    format!("Store '{}' opened.", highlight_argument(store.name()))
                )
            ),
            Err(error) => print_error(&CliError::Store(error)),
        }
    }

    start_repl(&mut session);
}

fn print_error(error: &CliError) {
    match error {
        CliError::Store(store_error @ StoreError::OrderGap { .. }) => {
            let next_key = store_error.next_key().unwrap_or_default();
            println!(
                "{}",
                warning_message(
                    "order",
                    format!(
                        "{}; insert at key {} to heal it",
                        store_error,
                        highlight_argument(&next_key.to_string())
                    )
                )
            );
        }
        error => println!("{}", warning_message("error", error.to_string())),
    }
}

fn start_repl(session: &mut Session) {
    println!(
        "{}",
        system_message(
            "system",
            format!(
                "Use '{}' to leave and '{}' to know all commands available.",
                highlight_argument("quit"),
                highlight_argument("help"),
            ),
        )
    );
    println!(
        "{}",
        system_message(
            "system",
            format!(
                "New session initiated at '{}'.",
                highlight_argument(&session.start_time_string())
            ),
        )
    );

    loop {
        println!();
        let prompt = session.active_store_name().unwrap_or("wiz").to_string();
        print!("{:6} > ", prompt.color(WIZ_VIOLET).bold());
        if io::stdout().flush().is_err() {
            break;
        }

        let mut buffer = String::new();
        match io::stdin().read_line(&mut buffer) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                print_error(&CliError::Session(format!("cannot read input: {}", error)));
                break;
            }
        }

        if buffer.trim().starts_with(DEFAULT_LAST_COMMAND_DELIMITER) {
            let last = buffer.matches(DEFAULT_LAST_COMMAND_DELIMITER).count();

            match session.get_last_command(last) {
                Some(command) => buffer = command.to_string(),
                None => {
                    println!(
                        "{}",
                        system_message(
                            "system",
                            format!(
                                "No command {} steps back.",
                                highlight_argument(&last.to_string())
                            ),
                        )
                    );
                    continue;
                }
            }
        }

        let line = buffer.trim();
        if line.is_empty() {
            continue;
        }
        session.add_to_command_history(line);

        let command = match parse_repl_line(line) {
            Ok(command) => command,
            Err(error) => {
                println!("{}", error);
                continue;
            }
        };

        match execute_repl(session, &command) {
            Ok(ReplOutcome::Quit) => break,
            Ok(ReplOutcome::Message(message)) => println!("{}", message),
            Ok(ReplOutcome::Store(result)) => println!("{}", result),
            Err(error) => print_error(&error),
        }
    }

    session.close_all();
    println!("Goodbye!")
}
