//! `artif-get-permission-target`: show a permission target.

use std::process::ExitCode;

use artif_cli::commands::security;

fn main() -> ExitCode {
    artif_cli::tool::main(security::get_permission_target)
}
