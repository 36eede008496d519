//! `artif-list-groups`: list groups.

use std::process::ExitCode;

use artif_cli::commands::security;

fn main() -> ExitCode {
    artif_cli::tool::main(security::list_groups)
}
