//! `artif-delete-user`: delete a user.

use std::process::ExitCode;

use artif_cli::commands::security;

fn main() -> ExitCode {
    artif_cli::tool::main(security::delete_user)
}
