//! `manta` binary entrypoint.

use std::process::ExitCode;
use std::rc::Rc;

use triton_cli::app;
use triton_cli::keys::MANTA_NAMESPACE;
use triton_cli::SdkClients;

fn main() -> ExitCode {
    triton_kernel::run_process(app::manta(Rc::new(SdkClients)), MANTA_NAMESPACE)
}
