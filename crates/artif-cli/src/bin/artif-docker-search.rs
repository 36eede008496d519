//! `artif-docker-search`: find Docker images.

use std::process::ExitCode;

use artif_cli::commands::search;

fn main() -> ExitCode {
    artif_cli::tool::main(search::docker_search)
}
