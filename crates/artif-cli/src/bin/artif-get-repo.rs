//! `artif-get-repo`: show a repository.

use std::process::ExitCode;

use artif_cli::commands::repos;

fn main() -> ExitCode {
    artif_cli::tool::main(repos::get_repo)
}
