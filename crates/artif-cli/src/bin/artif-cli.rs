//! `artif-cli`: print the server version.

use std::process::ExitCode;

use artif_cli::commands::system;

fn main() -> ExitCode {
    artif_cli::tool::main(system::server_version)
}
