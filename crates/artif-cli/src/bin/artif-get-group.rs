//! `artif-get-group`: show a group.

use std::process::ExitCode;

use artif_cli::commands::security;

fn main() -> ExitCode {
    artif_cli::tool::main(security::get_group)
}
