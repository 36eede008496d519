//! `artif-deploy-artifact`: upload a file.

use std::process::ExitCode;

use artif_cli::commands::storage;

fn main() -> ExitCode {
    artif_cli::tool::main(storage::deploy_artifact)
}
