//! The module contains function for displaying CLI splash screen.
//!
//! - Title
//! - Short Description
//! - Version Information

use colored::*;

use crate::cli::colors::WIZ_VIOLET;

pub fn splash_screen() {
    show_splash_screen();
    show_version_info();
}

fn show_splash_screen() {
    print!(
        r#"
    {}
        "#,
        r"
    ██╗    ██╗██╗███████╗
    ██║    ██║██║╚══███╔╝
    ██║ █╗ ██║██║  ███╔╝
    ██║███╗██║██║ ███╔╝
    ╚███╔███╔╝██║███████╗
     ╚══╝╚══╝ ╚═╝╚══════╝
        "
        .color(WIZ_VIOLET)
    )
}

fn show_version_info() {
    println!(
        r"
    {}

    Version {}
        ",
        env!("CARGO_PKG_DESCRIPTION").color(WIZ_VIOLET),
        env!("CARGO_PKG_VERSION").color(WIZ_VIOLET).italic(),
    )
}
