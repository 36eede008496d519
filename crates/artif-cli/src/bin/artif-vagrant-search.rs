//! `artif-vagrant-search`: find Vagrant boxes.

use std::process::ExitCode;

use artif_cli::commands::search;

fn main() -> ExitCode {
    artif_cli::tool::main(search::vagrant_search)
}
