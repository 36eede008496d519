//! `artif-list-files`: list a folder.

use std::process::ExitCode;

use artif_cli::commands::storage;

fn main() -> ExitCode {
    artif_cli::tool::main(storage::list_files)
}
