//! Command implementations, grouped by Artifactory API area:
//! - [`system`] - server version and license
//! - [`security`] - users, groups, permission targets and credentials
//! - [`repos`] - repository listing and configuration
//! - [`storage`] - deploying and listing files
//! - [`search`] - Docker, Vagrant and GAVC searches

pub mod repos;
pub mod search;
pub mod security;
pub mod storage;
pub mod system;

#[cfg(test)]
pub(crate) mod stub;

use triton_kernel::CliError;

use crate::error::ArtifError;

/// Wraps an Artifactory failure, keeping its message.
pub(crate) fn remote(err: ArtifError) -> CliError {
    CliError::remote(err)
}
