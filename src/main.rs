use std::process::ExitCode;

use clap::Parser;
use wiz_store::cli::{self, CliParser};

fn main() -> ExitCode {
    let parser = CliParser::parse();

    match cli::run(parser) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("err: {}", error);
            ExitCode::FAILURE
        }
    }
}
