//! Service client construction from the configuration store.
//!
//! Handlers ask a [`Clients`] factory for the API they need. The
//! production factory reads credentials from `general.<service>.*`; tests
//! substitute stubs.

use triton_kernel::{CliError, ConfigStore, Result};
use triton_sdk::{
    AccountApi, AccountClient, ClientConfig, ComputeApi, ComputeClient, NetworkApi, NetworkClient,
    StorageApi, StorageClient,
};

use crate::keys;
use crate::version;

/// Prefix for compute client construction failures.
pub const COMPUTE_CLIENT_ERROR: &str = "Error Creating Triton Compute Client";
/// Prefix for account client construction failures.
pub const ACCOUNT_CLIENT_ERROR: &str = "Error Creating Triton Account Client";
/// Prefix for network client construction failures.
pub const NETWORK_CLIENT_ERROR: &str = "Error Creating Triton Network Client";
/// Prefix for storage client construction failures.
pub const STORAGE_CLIENT_ERROR: &str = "Error Creating Manta Client";

/// Builds service clients for a command invocation.
pub trait Clients {
    /// CloudAPI compute operations.
    fn compute(&self, config: &ConfigStore) -> Result<Box<dyn ComputeApi>>;

    /// CloudAPI account operations.
    fn account(&self, config: &ConfigStore) -> Result<Box<dyn AccountApi>>;

    /// CloudAPI network operations.
    fn network(&self, config: &ConfigStore) -> Result<Box<dyn NetworkApi>>;

    /// Manta storage operations.
    fn storage(&self, config: &ConfigStore) -> Result<Box<dyn StorageApi>>;
}

/// Credentials bundle for one service.
#[derive(Debug, Clone, Copy)]
struct Credentials {
    account: &'static str,
    url: &'static str,
    key_id: &'static str,
    key_material: &'static str,
}

const TRITON: Credentials = Credentials {
    account: keys::TRITON_ACCOUNT,
    url: keys::TRITON_URL,
    key_id: keys::TRITON_KEY_ID,
    key_material: keys::TRITON_KEY_MATERIAL,
};

const MANTA: Credentials = Credentials {
    account: keys::MANTA_ACCOUNT,
    url: keys::MANTA_URL,
    key_id: keys::MANTA_KEY_ID,
    key_material: keys::MANTA_KEY_MATERIAL,
};

impl Credentials {
    fn read(self, config: &ConfigStore, user_agent: String) -> Result<ClientConfig> {
        Ok(ClientConfig::new(
            config.get_string(self.url)?,
            config.get_string(self.account)?,
            config.get_string(self.key_id)?,
            config.get_string(self.key_material)?,
        )
        .with_user_agent(user_agent))
    }
}

/// Factory for the reqwest-backed SDK clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct SdkClients;

impl Clients for SdkClients {
    fn compute(&self, config: &ConfigStore) -> Result<Box<dyn ComputeApi>> {
        let settings = TRITON.read(config, version::triton_user_agent())?;
        let client = ComputeClient::new(&settings).map_err(|e| CliError::client(COMPUTE_CLIENT_ERROR, e))?;
        Ok(Box::new(client))
    }

    fn account(&self, config: &ConfigStore) -> Result<Box<dyn AccountApi>> {
        let settings = TRITON.read(config, version::triton_user_agent())?;
        let client = AccountClient::new(&settings).map_err(|e| CliError::client(ACCOUNT_CLIENT_ERROR, e))?;
        Ok(Box::new(client))
    }

    fn network(&self, config: &ConfigStore) -> Result<Box<dyn NetworkApi>> {
        let settings = TRITON.read(config, version::triton_user_agent())?;
        let client = NetworkClient::new(&settings).map_err(|e| CliError::client(NETWORK_CLIENT_ERROR, e))?;
        Ok(Box::new(client))
    }

    fn storage(&self, config: &ConfigStore) -> Result<Box<dyn StorageApi>> {
        let settings = MANTA.read(config, version::manta_user_agent())?;
        let client = StorageClient::new(&settings).map_err(|e| CliError::client(STORAGE_CLIENT_ERROR, e))?;
        Ok(Box::new(client))
    }
}
