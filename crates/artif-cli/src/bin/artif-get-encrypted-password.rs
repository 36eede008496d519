//! `artif-get-encrypted-password`: print the caller's encrypted password.

use std::process::ExitCode;

use artif_cli::commands::security;

fn main() -> ExitCode {
    artif_cli::tool::main(security::get_encrypted_password)
}
