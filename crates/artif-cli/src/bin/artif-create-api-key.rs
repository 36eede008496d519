//! `artif-create-api-key`: generate an API key.

use std::process::ExitCode;

use artif_cli::commands::security;

fn main() -> ExitCode {
    artif_cli::tool::main(security::create_api_key)
}
