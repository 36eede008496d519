//! `artif-search-gavc`: find artifacts by Maven coordinates.

use std::process::ExitCode;

use artif_cli::commands::search;

fn main() -> ExitCode {
    artif_cli::tool::main(search::search_gavc)
}
