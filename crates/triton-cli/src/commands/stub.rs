//! In-memory service stubs and a dispatcher harness for handler tests.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::BoxFuture;
use triton_kernel::{BufferTerminal, CliError, ConfigStore, Dispatcher, Result};
use triton_sdk::{
    Account, AccountApi, ApiError, ComputeApi, CreateInstanceInput, DirectoryEntry, Endpoint,
    Image, Instance, InstanceAction, Key, ListDirectoryOutput, ListInstancesInput,
    ListPackagesInput, Network, NetworkApi, Package, SdkError, StorageApi, UpdateAccountInput,
};

use crate::clients::{self, Clients};

/// Canned responses plus a log of every call made.
#[derive(Debug, Default)]
pub struct State {
    pub instances: Vec<Instance>,
    pub images: Vec<Image>,
    pub packages: Vec<Package>,
    pub datacenters: Vec<Endpoint>,
    pub services: Vec<Endpoint>,
    pub count: u64,
    pub account: Account,
    pub keys: Vec<Key>,
    pub networks: Vec<Network>,
    pub entries: Vec<DirectoryEntry>,
    pub result_set_size: u64,
    pub created: Option<CreateInstanceInput>,
    pub updated: Option<UpdateAccountInput>,
    pub calls: Vec<String>,
    pub fail_construction: bool,
}

/// Shared stub backing every service trait.
#[derive(Debug, Clone, Default)]
pub struct Stub {
    state: Arc<Mutex<State>>,
}

fn not_found(what: &str) -> SdkError {
    ApiError::new(404, "ResourceNotFound", format!("{what} not found")).into()
}

impl Stub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, f: impl FnOnce(&mut State)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn record(&self, call: impl Into<String>) {
        self.state.lock().unwrap().calls.push(call.into());
    }

    fn read<T>(&self, call: &str, f: impl FnOnce(&State) -> T) -> T {
        self.record(call);
        f(&self.state.lock().unwrap())
    }

    pub fn dispatcher(&self, tree: fn(Rc<dyn Clients>) -> triton_kernel::CommandNode, ns: triton_kernel::Namespace) -> Dispatcher {
        Dispatcher::new(tree(Rc::new(self.clone())), ns).unwrap()
    }
}

/// Runs `argv` against `dispatcher` with an empty environment.
pub async fn run(dispatcher: &Dispatcher, argv: &[&str]) -> (i32, BufferTerminal) {
    let env: HashMap<&str, &str> = HashMap::new();
    let mut term = BufferTerminal::new();
    let code = dispatcher.dispatch(argv.iter().copied(), &env, &mut term).await;
    (code, term)
}

impl Clients for Stub {
    fn compute(&self, _config: &ConfigStore) -> Result<Box<dyn ComputeApi>> {
        if self.state.lock().unwrap().fail_construction {
            return Err(CliError::client(
                clients::COMPUTE_CLIENT_ERROR,
                SdkError::config("endpoint URL is required"),
            ));
        }
        Ok(Box::new(self.clone()))
    }

    fn account(&self, _config: &ConfigStore) -> Result<Box<dyn AccountApi>> {
        Ok(Box::new(self.clone()))
    }

    fn network(&self, _config: &ConfigStore) -> Result<Box<dyn NetworkApi>> {
        Ok(Box::new(self.clone()))
    }

    fn storage(&self, _config: &ConfigStore) -> Result<Box<dyn StorageApi>> {
        Ok(Box::new(self.clone()))
    }
}

impl ComputeApi for Stub {
    fn list_instances<'a>(&'a self, input: &'a ListInstancesInput) -> BoxFuture<'a, triton_sdk::Result<Vec<Instance>>> {
        let found = self.read("list_instances", |s| {
            s.instances
                .iter()
                .filter(|i| input.name.is_empty() || i.name == input.name)
                .filter(|i| input.state.is_empty() || i.state == input.state)
                .cloned()
                .collect()
        });
        async move { Ok(found) }.boxed()
    }

    fn count_instances<'a>(&'a self, _input: &'a ListInstancesInput) -> BoxFuture<'a, triton_sdk::Result<u64>> {
        let count = self.read("count_instances", |s| s.count);
        async move { Ok(count) }.boxed()
    }

    fn get_instance<'a>(&'a self, id: &'a str) -> BoxFuture<'a, triton_sdk::Result<Instance>> {
        let found = self.read(&format!("get_instance {id}"), |s| {
            s.instances.iter().find(|i| i.id == id).cloned()
        });
        async move { found.ok_or_else(|| not_found("instance")) }.boxed()
    }

    fn create_instance<'a>(&'a self, input: &'a CreateInstanceInput) -> BoxFuture<'a, triton_sdk::Result<Instance>> {
        self.record("create_instance");
        let instance = Instance {
            id: "9f1c2d3e-0000-4000-8000-000000000001".into(),
            name: input.name.clone(),
            state: "running".into(),
            image: input.image.clone(),
            ..Instance::default()
        };
        {
            let mut state = self.state.lock().unwrap();
            state.created = Some(input.clone());
            state.instances.push(instance.clone());
        }
        async move { Ok(instance) }.boxed()
    }

    fn delete_instance<'a>(&'a self, id: &'a str) -> BoxFuture<'a, triton_sdk::Result<()>> {
        self.record(format!("delete_instance {id}"));
        async move { Ok(()) }.boxed()
    }

    fn instance_action<'a>(&'a self, id: &'a str, action: InstanceAction) -> BoxFuture<'a, triton_sdk::Result<()>> {
        self.record(format!("{} {id}", action.as_str()));
        {
            let mut state = self.state.lock().unwrap();
            if let Some(instance) = state.instances.iter_mut().find(|i| i.id == id) {
                instance.state = action.target_state().to_string();
            }
        }
        async move { Ok(()) }.boxed()
    }

    fn list_images(&self) -> BoxFuture<'_, triton_sdk::Result<Vec<Image>>> {
        let images = self.read("list_images", |s| s.images.clone());
        async move { Ok(images) }.boxed()
    }

    fn get_image<'a>(&'a self, id: &'a str) -> BoxFuture<'a, triton_sdk::Result<Image>> {
        let found = self.read("get_image", |s| s.images.iter().find(|i| i.id == id).cloned());
        async move { found.ok_or_else(|| not_found("image")) }.boxed()
    }

    fn list_packages<'a>(&'a self, input: &'a ListPackagesInput) -> BoxFuture<'a, triton_sdk::Result<Vec<Package>>> {
        let found = self.read("list_packages", |s| {
            s.packages
                .iter()
                .filter(|p| input.name.is_empty() || p.name == input.name)
                .cloned()
                .collect()
        });
        async move { Ok(found) }.boxed()
    }

    fn get_package<'a>(&'a self, id: &'a str) -> BoxFuture<'a, triton_sdk::Result<Package>> {
        let found = self.read(&format!("get_package {id}"), |s| {
            s.packages.iter().find(|p| p.id == id || p.name == id).cloned()
        });
        async move { found.ok_or_else(|| not_found("package")) }.boxed()
    }

    fn list_datacenters(&self) -> BoxFuture<'_, triton_sdk::Result<Vec<Endpoint>>> {
        let found = self.read("list_datacenters", |s| s.datacenters.clone());
        async move { Ok(found) }.boxed()
    }

    fn list_services(&self) -> BoxFuture<'_, triton_sdk::Result<Vec<Endpoint>>> {
        let found = self.read("list_services", |s| s.services.clone());
        async move { Ok(found) }.boxed()
    }
}

impl AccountApi for Stub {
    fn get_account(&self) -> BoxFuture<'_, triton_sdk::Result<Account>> {
        let account = self.read("get_account", |s| s.account.clone());
        async move { Ok(account) }.boxed()
    }

    fn update_account<'a>(&'a self, input: &'a UpdateAccountInput) -> BoxFuture<'a, triton_sdk::Result<Account>> {
        self.record("update_account");
        let account = {
            let mut state = self.state.lock().unwrap();
            state.updated = Some(input.clone());
            if !input.email.is_empty() {
                state.account.email = input.email.clone();
            }
            state.account.clone()
        };
        async move { Ok(account) }.boxed()
    }

    fn list_keys(&self) -> BoxFuture<'_, triton_sdk::Result<Vec<Key>>> {
        let keys = self.read("list_keys", |s| s.keys.clone());
        async move { Ok(keys) }.boxed()
    }

    fn get_key<'a>(&'a self, name: &'a str) -> BoxFuture<'a, triton_sdk::Result<Key>> {
        let found = self.read(&format!("get_key {name}"), |s| {
            s.keys.iter().find(|k| k.name == name || k.fingerprint == name).cloned()
        });
        async move { found.ok_or_else(|| not_found("key")) }.boxed()
    }

    fn delete_key<'a>(&'a self, name: &'a str) -> BoxFuture<'a, triton_sdk::Result<()>> {
        self.record(format!("delete_key {name}"));
        async move { Ok(()) }.boxed()
    }

    fn create_key<'a>(&'a self, name: &'a str, public_key: &'a str) -> BoxFuture<'a, triton_sdk::Result<Key>> {
        self.record(format!("create_key {name}"));
        let key = Key {
            name: name.to_string(),
            fingerprint: "00:11:22".into(),
            key: public_key.to_string(),
        };
        async move { Ok(key) }.boxed()
    }
}

impl NetworkApi for Stub {
    fn list_networks(&self) -> BoxFuture<'_, triton_sdk::Result<Vec<Network>>> {
        let found = self.read("list_networks", |s| s.networks.clone());
        async move { Ok(found) }.boxed()
    }
}

impl StorageApi for Stub {
    fn list_directory<'a>(&'a self, path: &'a str) -> BoxFuture<'a, triton_sdk::Result<ListDirectoryOutput>> {
        let output = self.read(&format!("list_directory {path}"), |s| ListDirectoryOutput {
            entries: s.entries.clone(),
            result_set_size: s.result_set_size,
        });
        async move { Ok(output) }.boxed()
    }
}
