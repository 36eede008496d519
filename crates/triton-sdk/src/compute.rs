//! CloudAPI compute resources: instances, images, packages, datacenters
//! and services.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::client::{ClientConfig, HttpClient, header_count};
use crate::error::{Result, SdkError};

/// Header carrying the number of matching resources on `HEAD` requests.
pub const RESOURCE_COUNT_HEADER: &str = "x-resource-count";

/// A virtual machine or container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// UUID.
    pub id: String,
    /// Alias.
    #[serde(default)]
    pub name: String,
    /// `virtualmachine` or `smartmachine`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Zone brand, e.g. `kvm`, `lx`, `joyent`.
    #[serde(default)]
    pub brand: String,
    /// Lifecycle state, e.g. `running`.
    #[serde(default)]
    pub state: String,
    /// Image UUID.
    #[serde(default)]
    pub image: String,
    /// Memory in MiB.
    #[serde(default)]
    pub memory: u64,
    /// Disk in MiB.
    #[serde(default)]
    pub disk: u64,
    /// Customer metadata.
    #[serde(default)]
    pub metadata: BTreeMap<String, Json>,
    /// Tags.
    #[serde(default)]
    pub tags: BTreeMap<String, Json>,
    /// Creation time.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
    /// Whether the instance is a Docker container.
    #[serde(default)]
    pub docker: bool,
    /// IP addresses.
    #[serde(default)]
    pub ips: Vec<String>,
    /// Attached network UUIDs.
    #[serde(default)]
    pub networks: Vec<String>,
    /// Primary IP address.
    #[serde(rename = "primaryIp", default)]
    pub primary_ip: String,
    /// Whether the cloud firewall is enabled.
    #[serde(default)]
    pub firewall_enabled: bool,
    /// Server UUID.
    #[serde(default)]
    pub compute_node: String,
    /// Package name.
    #[serde(default)]
    pub package: String,
}

/// A machine image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// UUID.
    pub id: String,
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Version string.
    #[serde(default)]
    pub version: String,
    /// Operating system.
    #[serde(default)]
    pub os: String,
    /// Image type.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// State.
    #[serde(default)]
    pub state: String,
    /// Publication time.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// An instance size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// UUID.
    pub id: String,
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Memory in MiB.
    #[serde(default)]
    pub memory: u64,
    /// Disk in MiB.
    #[serde(default)]
    pub disk: u64,
    /// Swap in MiB.
    #[serde(default)]
    pub swap: u64,
    /// Virtual CPUs.
    #[serde(default)]
    pub vcpus: u64,
    /// Lightweight process limit.
    #[serde(default)]
    pub lwps: u64,
    /// Version.
    #[serde(default)]
    pub version: String,
    /// Group.
    #[serde(default)]
    pub group: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Whether this is the default package.
    #[serde(default)]
    pub default: bool,
}

/// A named endpoint: datacenters and services share the shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Name.
    pub name: String,
    /// URL.
    pub url: String,
}

/// Filters for [`ComputeApi::list_instances`] and
/// [`ComputeApi::count_instances`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListInstancesInput {
    /// Exact alias.
    pub name: String,
    /// Lifecycle state.
    pub state: String,
    /// Zone brand.
    pub brand: String,
    /// Tags that must all match.
    pub tags: BTreeMap<String, String>,
}

impl ListInstancesInput {
    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        for (key, value) in [("name", &self.name), ("state", &self.state), ("brand", &self.brand)] {
            if !value.is_empty() {
                query.push((key.to_string(), value.clone()));
            }
        }
        for (key, value) in &self.tags {
            query.push((format!("tag.{key}"), value.clone()));
        }
        query
    }
}

/// Parameters for [`ComputeApi::create_instance`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateInstanceInput {
    /// Alias; the service picks one when empty.
    pub name: String,
    /// Package UUID or name.
    pub package: String,
    /// Image UUID.
    pub image: String,
    /// Network UUIDs.
    pub networks: Vec<String>,
    /// Affinity rules such as `instance!=web*`.
    pub affinity: Vec<String>,
    /// Customer metadata.
    pub metadata: BTreeMap<String, String>,
    /// Tags.
    pub tags: BTreeMap<String, String>,
    /// `user-script` metadata.
    pub user_data: String,
    /// Enable the cloud firewall.
    pub firewall_enabled: bool,
}

impl CreateInstanceInput {
    /// Request body in CloudAPI's flattened form.
    #[must_use]
    pub fn to_body(&self) -> Json {
        let mut body = Map::new();
        if !self.name.is_empty() {
            body.insert("name".into(), Json::from(self.name.clone()));
        }
        body.insert("package".into(), Json::from(self.package.clone()));
        body.insert("image".into(), Json::from(self.image.clone()));
        if !self.networks.is_empty() {
            body.insert("networks".into(), Json::from(self.networks.clone()));
        }
        if !self.affinity.is_empty() {
            body.insert("affinity".into(), Json::from(self.affinity.clone()));
        }
        if self.firewall_enabled {
            body.insert("firewall_enabled".into(), Json::Bool(true));
        }
        for (key, value) in &self.metadata {
            body.insert(format!("metadata.{key}"), Json::from(value.clone()));
        }
        if !self.user_data.is_empty() {
            body.insert("metadata.user-script".into(), Json::from(self.user_data.clone()));
        }
        for (key, value) in &self.tags {
            body.insert(format!("tag.{key}"), Json::from(value.clone()));
        }
        Json::Object(body)
    }
}

/// Filters for [`ComputeApi::list_packages`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPackagesInput {
    /// Name.
    pub name: String,
    /// Memory in MiB, 0 for any.
    pub memory: i64,
    /// Disk in MiB, 0 for any.
    pub disk: i64,
    /// Swap in MiB, 0 for any.
    pub swap: i64,
    /// Virtual CPUs, 0 for any.
    pub vcpus: i64,
}

impl ListPackagesInput {
    fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if !self.name.is_empty() {
            query.push(("name".to_string(), self.name.clone()));
        }
        for (key, value) in [
            ("memory", self.memory),
            ("disk", self.disk),
            ("swap", self.swap),
            ("vcpus", self.vcpus),
        ] {
            if value > 0 {
                query.push((key.to_string(), value.to_string()));
            }
        }
        query
    }
}

/// Instance actions taking no arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceAction {
    /// Reboot.
    Reboot,
    /// Boot a stopped instance.
    Start,
    /// Shut down.
    Stop,
}

impl InstanceAction {
    /// Query value for `?action=`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reboot => "reboot",
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }

    /// State the instance settles in afterwards.
    #[must_use]
    pub const fn target_state(self) -> &'static str {
        match self {
            Self::Reboot | Self::Start => "running",
            Self::Stop => "stopped",
        }
    }
}

/// Compute operations.
pub trait ComputeApi: Send + Sync {
    /// Lists instances matching `input`.
    fn list_instances<'a>(&'a self, input: &'a ListInstancesInput) -> BoxFuture<'a, Result<Vec<Instance>>>;

    /// Counts instances matching `input`.
    fn count_instances<'a>(&'a self, input: &'a ListInstancesInput) -> BoxFuture<'a, Result<u64>>;

    /// Fetches one instance by UUID.
    fn get_instance<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Instance>>;

    /// Provisions an instance.
    fn create_instance<'a>(&'a self, input: &'a CreateInstanceInput) -> BoxFuture<'a, Result<Instance>>;

    /// Destroys an instance.
    fn delete_instance<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Reboots, starts or stops an instance.
    fn instance_action<'a>(&'a self, id: &'a str, action: InstanceAction) -> BoxFuture<'a, Result<()>>;

    /// Lists images.
    fn list_images(&self) -> BoxFuture<'_, Result<Vec<Image>>>;

    /// Fetches one image by UUID.
    fn get_image<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Image>>;

    /// Lists packages matching `input`.
    fn list_packages<'a>(&'a self, input: &'a ListPackagesInput) -> BoxFuture<'a, Result<Vec<Package>>>;

    /// Fetches one package by UUID or name.
    fn get_package<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Package>>;

    /// Lists datacenters.
    fn list_datacenters(&self) -> BoxFuture<'_, Result<Vec<Endpoint>>>;

    /// Lists services.
    fn list_services(&self) -> BoxFuture<'_, Result<Vec<Endpoint>>>;
}

/// Finds an instance by alias.
pub async fn find_instance_by_name(api: &dyn ComputeApi, name: &str) -> Result<Instance> {
    let input = ListInstancesInput {
        name: name.to_string(),
        ..ListInstancesInput::default()
    };
    api.list_instances(&input)
        .await?
        .into_iter()
        .find(|i| i.name == name)
        .ok_or_else(|| SdkError::not_found("instance", name))
}

/// CloudAPI-backed [`ComputeApi`].
#[derive(Debug, Clone)]
pub struct ComputeClient {
    http: HttpClient,
}

impl ComputeClient {
    /// Creates a client.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    fn path(&self, rest: &str) -> String {
        format!("/{}{rest}", self.http.account())
    }
}

fn endpoints(map: BTreeMap<String, String>) -> Vec<Endpoint> {
    map.into_iter().map(|(name, url)| Endpoint { name, url }).collect()
}

impl ComputeApi for ComputeClient {
    fn list_instances<'a>(&'a self, input: &'a ListInstancesInput) -> BoxFuture<'a, Result<Vec<Instance>>> {
        async move { self.http.get_json(&self.path("/machines"), &input.query()).await }.boxed()
    }

    fn count_instances<'a>(&'a self, input: &'a ListInstancesInput) -> BoxFuture<'a, Result<u64>> {
        async move {
            let headers = self.http.head(&self.path("/machines"), &input.query()).await?;
            Ok(header_count(&headers, RESOURCE_COUNT_HEADER))
        }
        .boxed()
    }

    fn get_instance<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Instance>> {
        async move { self.http.get_json(&self.path(&format!("/machines/{id}")), &[]).await }.boxed()
    }

    fn create_instance<'a>(&'a self, input: &'a CreateInstanceInput) -> BoxFuture<'a, Result<Instance>> {
        async move {
            self.http
                .post_json(&self.path("/machines"), &[], &input.to_body())
                .await
        }
        .boxed()
    }

    fn delete_instance<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<()>> {
        async move { self.http.delete(&self.path(&format!("/machines/{id}"))).await }.boxed()
    }

    fn instance_action<'a>(&'a self, id: &'a str, action: InstanceAction) -> BoxFuture<'a, Result<()>> {
        async move {
            let query = [("action".to_string(), action.as_str().to_string())];
            self.http
                .post_empty(&self.path(&format!("/machines/{id}")), &query)
                .await
        }
        .boxed()
    }

    fn list_images(&self) -> BoxFuture<'_, Result<Vec<Image>>> {
        async move { self.http.get_json(&self.path("/images"), &[]).await }.boxed()
    }

    fn get_image<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Image>> {
        async move { self.http.get_json(&self.path(&format!("/images/{id}")), &[]).await }.boxed()
    }

    fn list_packages<'a>(&'a self, input: &'a ListPackagesInput) -> BoxFuture<'a, Result<Vec<Package>>> {
        async move { self.http.get_json(&self.path("/packages"), &input.query()).await }.boxed()
    }

    fn get_package<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Package>> {
        async move { self.http.get_json(&self.path(&format!("/packages/{id}")), &[]).await }.boxed()
    }

    fn list_datacenters(&self) -> BoxFuture<'_, Result<Vec<Endpoint>>> {
        async move {
            let map = self.http.get_json(&self.path("/datacenters"), &[]).await?;
            Ok(endpoints(map))
        }
        .boxed()
    }

    fn list_services(&self) -> BoxFuture<'_, Result<Vec<Endpoint>>> {
        async move {
            let map = self.http.get_json(&self.path("/services"), &[]).await?;
            Ok(endpoints(map))
        }
        .boxed()
    }
}
