//! General message formatting functions for prettifying the CLI.
//!
//! - Highlight Text (make the text violet but not bold)
//! - System message formatting functions that produce the same
//! format messages.
//! - Warning messages for recoverable problems like order gaps.

use colored::Colorize;

use crate::cli::colors::{WIZ_AMBER, WIZ_VIOLET};

pub fn highlight_argument(argument: &str) -> String {
    //! Highlight a piece of text in the theme color to make it obvious.
    //!
    //! Returns a formatted string.

    format!("{}", argument.color(WIZ_VIOLET))
}

pub fn system_message(source_name: &str, message: String) -> String {
    //! Write a system message on the command line, properly
    //! formatted, according to the command line theme.
    //!
    //! Takes in a source name (like 'system') and the message as a
    //! formatted text; output of [`format!`].

    let source_formatted = format!("{:6}", source_name.color(WIZ_VIOLET).bold());
    format!("[{}] {}", source_formatted, message)
}

pub fn warning_message(source_name: &str, message: String) -> String {
    let source_formatted = format!("{:6}", source_name.color(WIZ_AMBER).bold());
    format!("[{}] {}", source_formatted, message)
}
