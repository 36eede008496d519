//! Command implementations.
//!
//! Each submodule provides the [`triton_kernel::Command`] objects for one
//! subtree:
//! - [`root`] - `triton` and `manta` roots with the persistent flags
//! - [`account`] - account profile
//! - [`catalog`] - datacenters and services
//! - [`instances`] - instance lifecycle
//! - [`keys`] - SSH keys
//! - [`packages`] - instance sizes
//! - [`storage`] - Manta directory listing
//! - [`doc`] - man pages, markdown and shell completion
//! - [`version`] - user-agent string

pub mod account;
pub mod catalog;
pub mod doc;
pub mod instances;
pub mod keys;
pub mod packages;
pub mod root;
pub mod storage;
pub mod version;

#[cfg(test)]
pub(crate) mod stub;

use triton_kernel::CliError;
use triton_sdk::SdkError;

/// Wraps an SDK failure, keeping its message.
pub(crate) fn remote(err: SdkError) -> CliError {
    CliError::remote(err)
}
