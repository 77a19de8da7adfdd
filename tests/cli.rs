#[cfg(test)]
mod parsers {
    use clap::Parser;
    use wiz_store::cli::parsers::parse_repl_line;
    use wiz_store::cli::{CliParser, ReplCommand, StoreCommand};

    #[test]
    fn repl_insert_keeps_rest_of_line_verbatim() {
        let command = parse_repl_line("insert blocks 3 hello   big\tworld").unwrap();

        assert_eq!(
            command,
            ReplCommand::Store(StoreCommand::Insert {
                table: "blocks".to_string(),
                key: 3,
                value: vec!["hello   big\tworld".to_string()],
            })
        );
    }

    #[test]
    fn repl_insert_keeps_quotes_and_separator_runs() {
        let command = parse_repl_line("insert \t blocks   7   \"quoted\"  'too' ").unwrap();

        assert_eq!(
            command,
            ReplCommand::Store(StoreCommand::Insert {
                table: "blocks".to_string(),
                key: 7,
                value: vec!["\"quoted\"  'too'".to_string()],
            })
        );
    }

    #[test]
    fn repl_insert_accepts_hyphenated_values() {
        let command = parse_repl_line("insert blocks 1 -5 degrees").unwrap();

        assert!(matches!(
            command,
            ReplCommand::Store(StoreCommand::Insert { ref value, .. }) if value[0] == "-5 degrees"
        ));
    }

    #[test]
    fn repl_session_commands() {
        assert_eq!(
            parse_repl_line("open ledger").unwrap(),
            ReplCommand::Open {
                name: "ledger".to_string()
            }
        );
        assert_eq!(
            parse_repl_line("close").unwrap(),
            ReplCommand::Close { name: None }
        );
        assert_eq!(
            parse_repl_line("history 3").unwrap(),
            ReplCommand::History { count: Some(3) }
        );
        assert_eq!(parse_repl_line("exit").unwrap(), ReplCommand::Quit);
        assert_eq!(parse_repl_line("help").unwrap(), ReplCommand::Help);
    }

    #[test]
    fn repl_rejects_bad_key() {
        assert!(parse_repl_line("get blocks minus-one").is_err());
        assert!(parse_repl_line("insert blocks 1").is_err());
        assert!(parse_repl_line("frobnicate").is_err());
    }

    #[test]
    fn command_line_one_shot() {
        let cli = CliParser::try_parse_from([
            "wiz-store",
            "--store",
            "ledger",
            "--log-level",
            "debug",
            "check",
            "blocks",
        ])
        .unwrap();

        assert_eq!(cli.store.as_deref(), Some("ledger"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(
            cli.command,
            Some(StoreCommand::Check {
                table: "blocks".to_string()
            })
        );
    }

    #[test]
    fn command_line_without_command_starts_repl() {
        let cli = CliParser::try_parse_from(["wiz-store"]).unwrap();
        assert!(cli.command.is_none());
    }
}

#[cfg(test)]
mod session {
    use tempfile::TempDir;
    use wiz_store::config::StoreConfig;
    use wiz_store::sessions::Session;

    fn _prepare_session() -> (TempDir, Session) {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::default().with_data_dir(dir.path());
        (dir, Session::new(config))
    }

    #[test]
    fn open_store_becomes_active_and_is_reused() {
        let (_dir, mut session) = _prepare_session();

        session.open_store("ledger").unwrap();
        session.open_store("archive").unwrap();
        session.open_store("ledger").unwrap();

        assert_eq!(session.store_names(), vec!["ledger", "archive"]);
        assert_eq!(session.active_store_name(), Some("ledger"));
    }

    #[test]
    fn use_store_requires_open_store() {
        let (_dir, mut session) = _prepare_session();
        session.open_store("ledger").unwrap();

        assert!(session.use_store("archive").is_err());
        assert!(session.use_store("ledger").is_ok());
    }

    #[test]
    fn close_store_clears_active() {
        let (_dir, mut session) = _prepare_session();
        session.open_store("ledger").unwrap();

        assert!(session.close_store("ledger"));
        assert!(!session.close_store("ledger"));
        assert!(session.active_store().is_none());
        assert!(session.store_names().is_empty());
    }

    #[test]
    fn history_counts_back_from_latest() {
        let (_dir, mut session) = _prepare_session();
        session.add_to_command_history("open ledger");
        session.add_to_command_history("keys blocks");

        assert_eq!(session.get_last_command(1), Some("keys blocks"));
        assert_eq!(session.get_last_command(2), Some("open ledger"));
        assert_eq!(session.get_last_command(3), None);
        assert_eq!(session.get_last_command(0), None);
        assert_eq!(session.command_history().len(), 2);
    }
}

#[cfg(test)]
mod commands {
    use tempfile::TempDir;
    use wiz_store::cli::commands::{CliError, ReplOutcome, execute_repl};
    use wiz_store::cli::parsers::parse_repl_line;
    use wiz_store::cli::StoreResult;
    use wiz_store::config::StoreConfig;
    use wiz_store::persistence::ErrorKind;
    use wiz_store::sessions::Session;

    fn _run(session: &mut Session, line: &str) -> Result<ReplOutcome, CliError> {
        let command = parse_repl_line(line).unwrap();
        execute_repl(session, &command)
    }

    fn _prepare_session() -> (TempDir, Session) {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::default().with_data_dir(dir.path());
        let mut session = Session::new(config);
        _run(&mut session, "open ledger").unwrap();
        _run(&mut session, "create blocks").unwrap();
        (dir, session)
    }

    #[test]
    fn store_command_needs_active_store() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::new(StoreConfig::default().with_data_dir(dir.path()));

        let result = _run(&mut session, "keys blocks");
        assert!(matches!(result, Err(CliError::NoActiveStore)));
    }

    #[test]
    fn insert_get_and_keys() {
        let (_dir, mut session) = _prepare_session();

        _run(&mut session, "insert blocks 2 second block").unwrap();
        _run(&mut session, "insert blocks 1 first").unwrap();

        assert_eq!(
            _run(&mut session, "get blocks 2").unwrap(),
            ReplOutcome::Store(StoreResult::Value("second block".to_string()))
        );
        assert_eq!(
            _run(&mut session, "keys blocks").unwrap(),
            ReplOutcome::Store(StoreResult::Keys(vec![1, 2]))
        );
        assert_eq!(
            _run(&mut session, "check blocks").unwrap(),
            ReplOutcome::Store(StoreResult::NextKey(3))
        );
        assert_eq!(
            _run(&mut session, "count blocks").unwrap(),
            ReplOutcome::Store(StoreResult::Count(2))
        );
    }

    #[test]
    fn insert_stores_spacing_as_typed() {
        let (_dir, mut session) = _prepare_session();

        _run(&mut session, "insert blocks 1 a  b\tc").unwrap();

        assert_eq!(
            _run(&mut session, "get blocks 1").unwrap(),
            ReplOutcome::Store(StoreResult::Value("a  b\tc".to_string()))
        );
    }

    #[test]
    fn check_reports_gap_as_error() {
        let (_dir, mut session) = _prepare_session();
        _run(&mut session, "insert blocks 1 one").unwrap();
        _run(&mut session, "insert blocks 3 three").unwrap();

        match _run(&mut session, "check blocks") {
            Err(CliError::Store(error)) => {
                assert_eq!(error.kind(), ErrorKind::OrderGap);
                assert_eq!(error.next_key(), Some(2));
            }
            _ => panic!("expected an order gap"),
        }
    }

    #[test]
    fn keys_display_as_json() {
        assert_eq!(StoreResult::Keys(vec![1, 2, 5]).to_string(), "[1,2,5]");
        assert_eq!(StoreResult::Keys(vec![]).to_string(), "[]");
    }

    #[test]
    fn close_without_name_closes_active() {
        let (_dir, mut session) = _prepare_session();

        assert!(matches!(
            _run(&mut session, "close").unwrap(),
            ReplOutcome::Message(_)
        ));
        assert!(session.active_store().is_none());
        assert!(matches!(
            _run(&mut session, "close"),
            Err(CliError::NoActiveStore)
        ));
    }

    #[test]
    fn quit_ends_session() {
        let (_dir, mut session) = _prepare_session();
        assert_eq!(_run(&mut session, "quit").unwrap(), ReplOutcome::Quit);
    }
}
