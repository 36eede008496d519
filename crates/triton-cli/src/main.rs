//! `triton` binary entrypoint.

use std::process::ExitCode;
use std::rc::Rc;

use triton_cli::app;
use triton_cli::keys::TRITON_NAMESPACE;
use triton_cli::SdkClients;

fn main() -> ExitCode {
    triton_kernel::run_process(app::triton(Rc::new(SdkClients)), TRITON_NAMESPACE)
}
