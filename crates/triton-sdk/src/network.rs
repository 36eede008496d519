//! Fabric and public network lookup.

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::client::{ClientConfig, HttpClient};
use crate::error::Result;

/// A network instances can attach to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    /// UUID.
    pub id: String,
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Whether the network is public.
    #[serde(default)]
    pub public: bool,
    /// Whether the network is a fabric.
    #[serde(default)]
    pub fabric: bool,
    /// Description.
    #[serde(default)]
    pub description: String,
}

/// Network operations.
pub trait NetworkApi: Send + Sync {
    /// Lists networks visible to the account.
    fn list_networks(&self) -> BoxFuture<'_, Result<Vec<Network>>>;
}

/// Resolves each of `wanted` (a network name or UUID) to a UUID.
///
/// Entries matching no known network are passed through unchanged so the
/// service can reject them.
#[must_use]
pub fn resolve_networks(known: &[Network], wanted: &[String]) -> Vec<String> {
    wanted
        .iter()
        .map(|w| {
            known
                .iter()
                .find(|n| &n.id == w || &n.name == w)
                .map_or_else(|| w.clone(), |n| n.id.clone())
        })
        .collect()
}

/// CloudAPI-backed [`NetworkApi`].
#[derive(Debug, Clone)]
pub struct NetworkClient {
    http: HttpClient,
}

impl NetworkClient {
    /// Creates a client.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }
}

impl NetworkApi for NetworkClient {
    fn list_networks(&self) -> BoxFuture<'_, Result<Vec<Network>>> {
        async move {
            let path = format!("/{}/networks", self.http.account());
            self.http.get_json(&path, &[]).await
        }
        .boxed()
    }
}
