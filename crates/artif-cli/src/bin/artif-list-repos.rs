//! `artif-list-repos`: list repositories.

use std::process::ExitCode;

use artif_cli::commands::repos;

fn main() -> ExitCode {
    artif_cli::tool::main(repos::list_repos)
}
