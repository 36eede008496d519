//! `artif-get-license`: print the license details.

use std::process::ExitCode;

use artif_cli::commands::system;

fn main() -> ExitCode {
    artif_cli::tool::main(system::get_license)
}
