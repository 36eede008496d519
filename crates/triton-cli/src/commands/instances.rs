//! `triton instances`: list, inspect and drive the instance lifecycle.
//!
//! Commands that act on a single instance take exactly one of `--id` or
//! `--name`; names are resolved with a filtered listing. Lifecycle
//! commands accept `--wait` and poll until the instance reaches its
//! target state.

use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use chrono::Utc;
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use tracing::debug;
use triton_kernel::value::parse_pair;
use triton_kernel::{
    CliError, Command, CommandNode, ConfigStore, Context, Declarations, Flag, Normalizer, Result,
    SetupError, exactly_one_of,
};
use triton_sdk::{
    ComputeApi, CreateInstanceInput, Instance, InstanceAction, ListInstancesInput, SdkError,
    find_instance_by_name, resolve_networks,
};
use uuid::Uuid;

use super::remote;
use crate::clients::Clients;
use crate::keys;
use crate::output::{instance_table, instance_view};

/// Delay between state polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Polls before giving up, roughly ten minutes.
pub const POLL_ATTEMPTS: u32 = 200;

/// Builds the `instances` subtree.
pub fn node(clients: &Rc<dyn Clients>) -> CommandNode {
    let c = || Rc::clone(clients);
    CommandNode::group("instances")
        .alias("insts")
        .short("Instance operations")
        .long("Create, list and manage Triton instances.")
        .child(
            CommandNode::new("list", ListInstances { clients: c() })
                .alias("ls")
                .short("List instances")
                .example("  triton instances list --state running --search-tags role=web"),
        )
        .child(
            CommandNode::new("create", CreateInstance { clients: c() })
                .short("Create a new instance")
                .example(
                    "  triton instances create --image-name base-64-lts --package-name g4-highcpu-1G \\\n    --name-prefix web --tag role=web --networks public --wait",
                ),
        )
        .child(
            CommandNode::new("delete", DeleteInstance { clients: c() })
                .alias("rm")
                .short("Delete an instance")
                .example("  triton instances delete --name web-1"),
        )
        .child(
            CommandNode::new("get", GetInstance { clients: c() })
                .short("Show an instance")
                .example("  triton instances get --id 4fbe0e6c"),
        )
        .child(
            CommandNode::new("count", CountInstances { clients: c() })
                .short("Count instances")
                .example("  triton instances count --state stopped"),
        )
        .child(action_node(c(), InstanceAction::Reboot, "reboot", "Reboot an instance"))
        .child(action_node(c(), InstanceAction::Start, "start", "Start a stopped instance"))
        .child(action_node(c(), InstanceAction::Stop, "stop", "Stop an instance"))
        .child(
            CommandNode::new("ip", InstanceIp { clients: c() })
                .short("Show the primary IP of an instance")
                .example("  triton instances ip --name web-1"),
        )
}

fn action_node(
    clients: Rc<dyn Clients>,
    action: InstanceAction,
    name: &'static str,
    short: &'static str,
) -> CommandNode {
    CommandNode::new(name, ActOnInstance { clients, action }).short(short)
}

fn declare_identity(decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
    decl.bind_flag(keys::INSTANCE_ID, Flag::string("id").short('i').help("Instance id"))?;
    decl.bind_flag(
        keys::INSTANCE_NAME,
        Flag::string("name").short('n').help("Instance name"),
    )
}

fn check_identity(config: &ConfigStore) -> Result<()> {
    exactly_one_of(config, (keys::INSTANCE_ID, "id"), (keys::INSTANCE_NAME, "name"))
}

fn declare_wait(decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
    decl.bind_flag(
        keys::INSTANCE_WAIT,
        Flag::bool("wait")
            .short('w')
            .help("Block until the instance reaches its target state"),
    )
}

fn declare_filters(decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
    decl.bind_flag(keys::INSTANCE_NAME, Flag::string("name").short('n').help("Filter by name"))?;
    decl.bind_flag(keys::INSTANCE_STATE, Flag::string("state").help("Filter by state"))?;
    decl.bind_flag(keys::INSTANCE_BRAND, Flag::string("brand").help("Filter by brand"))?;
    decl.bind_flag(
        keys::INSTANCE_SEARCH_TAGS,
        Flag::map("search-tags").help("Filter by tag, as key=value"),
    )
}

fn filters(config: &ConfigStore) -> Result<ListInstancesInput> {
    Ok(ListInstancesInput {
        name: config.get_string(keys::INSTANCE_NAME)?,
        state: config.get_string(keys::INSTANCE_STATE)?,
        brand: config.get_string(keys::INSTANCE_BRAND)?,
        tags: config.get_string_map(keys::INSTANCE_SEARCH_TAGS)?,
    })
}

/// Fetches the instance named by `--id` or `--name`.
async fn resolve(api: &dyn ComputeApi, config: &ConfigStore) -> Result<Instance> {
    let id = config.get_string(keys::INSTANCE_ID)?;
    if id.is_empty() {
        let name = config.get_string(keys::INSTANCE_NAME)?;
        return find_instance_by_name(api, &name).await.map_err(remote);
    }
    api.get_instance(&id).await.map_err(remote)
}

/// Polls `id` until it reports `state`.
pub async fn wait_for_state(api: &dyn ComputeApi, id: &str, state: &str) -> Result<Instance> {
    for attempt in 0..POLL_ATTEMPTS {
        let instance = api.get_instance(id).await.map_err(remote)?;
        if instance.state == state {
            return Ok(instance);
        }
        debug!(id, attempt, current = %instance.state, wanted = state, "waiting for instance");
        tokio::time::sleep(POLL_INTERVAL).await;
    }
    Err(remote(SdkError::Timeout {
        what: format!("instance {id} to become {state}"),
    }))
}

/// Past-tense verb for progress messages.
const fn past_tense(action: InstanceAction) -> &'static str {
    match action {
        InstanceAction::Reboot => "Rebooted",
        InstanceAction::Start => "Started",
        InstanceAction::Stop => "Stopped",
    }
}

/// Lists instances.
pub struct ListInstances {
    clients: Rc<dyn Clients>,
}

impl Command for ListInstances {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        declare_filters(decl)
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let api = self.clients.compute(config)?;
            let instances = api.list_instances(&filters(config)?).await.map_err(remote)?;
            let images = api.list_images().await.map_err(remote)?;
            ctx.write(&instance_table(&instances, &images, Utc::now()).to_string());
            Ok(())
        }
        .boxed_local()
    }
}

/// Counts instances.
pub struct CountInstances {
    clients: Rc<dyn Clients>,
}

impl Command for CountInstances {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        declare_filters(decl)
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let api = self.clients.compute(config)?;
            let count = api.count_instances(&filters(config)?).await.map_err(remote)?;
            ctx.println(format!("Found {count} instances"));
            Ok(())
        }
        .boxed_local()
    }
}

/// Shows one instance.
pub struct GetInstance {
    clients: Rc<dyn Clients>,
}

impl Command for GetInstance {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        declare_identity(decl)
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        check_identity(ctx.config())
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let api = self.clients.compute(config)?;
            let instance = resolve(api.as_ref(), config).await?;
            ctx.write(&instance_view(&instance, config.get_bool(keys::UTC)?).to_string());
            Ok(())
        }
        .boxed_local()
    }
}

/// Prints the primary IP of one instance.
pub struct InstanceIp {
    clients: Rc<dyn Clients>,
}

impl Command for InstanceIp {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        declare_identity(decl)
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        check_identity(ctx.config())
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let api = self.clients.compute(config)?;
            let instance = resolve(api.as_ref(), config).await?;
            ctx.println(&instance.primary_ip);
            Ok(())
        }
        .boxed_local()
    }
}

/// Deletes one instance.
pub struct DeleteInstance {
    clients: Rc<dyn Clients>,
}

impl Command for DeleteInstance {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        declare_identity(decl)
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        check_identity(ctx.config())
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let api = self.clients.compute(config)?;
            let instance = resolve(api.as_ref(), config).await?;
            api.delete_instance(&instance.id).await.map_err(remote)?;
            ctx.println(format!("Deleted instance \"{}\"", instance.name));
            Ok(())
        }
        .boxed_local()
    }
}

/// Reboots, starts or stops one instance.
pub struct ActOnInstance {
    clients: Rc<dyn Clients>,
    action: InstanceAction,
}

impl Command for ActOnInstance {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        declare_identity(decl)?;
        declare_wait(decl)
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        check_identity(ctx.config())
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let api = self.clients.compute(config)?;
            let instance = resolve(api.as_ref(), config).await?;
            api.instance_action(&instance.id, self.action)
                .await
                .map_err(remote)?;
            if config.get_bool(keys::INSTANCE_WAIT)? {
                wait_for_state(api.as_ref(), &instance.id, self.action.target_state()).await?;
            }
            ctx.println(format!("{} instance \"{}\"", past_tense(self.action), instance.name));
            Ok(())
        }
        .boxed_local()
    }
}

/// Provisions an instance.
pub struct CreateInstance {
    clients: Rc<dyn Clients>,
}

/// `--name`, or `<prefix>-<8 hex>` when only a prefix was given.
fn instance_name(config: &ConfigStore) -> Result<String> {
    let name = config.get_string(keys::INSTANCE_NAME)?;
    let prefix = config.get_string(keys::INSTANCE_NAME_PREFIX)?;
    if !name.is_empty() || prefix.is_empty() {
        return Ok(name);
    }
    let suffix = Uuid::new_v4().simple().to_string();
    Ok(format!("{prefix}-{}", &suffix[..8]))
}

fn tags(config: &ConfigStore) -> Result<BTreeMap<String, String>> {
    config
        .get_string_slice(keys::INSTANCE_TAG)?
        .iter()
        .map(|tag| parse_pair(tag).map_err(|e| CliError::validation(format!("invalid tag: {e}"))))
        .collect()
}

impl CreateInstance {
    async fn image_id(&self, api: &dyn ComputeApi, config: &ConfigStore) -> Result<String> {
        let id = config.get_string(keys::IMAGE_ID)?;
        if !id.is_empty() {
            return Ok(id);
        }
        let name = config.get_string(keys::IMAGE_NAME)?;
        let images = api.list_images().await.map_err(remote)?;
        images
            .into_iter()
            .filter(|img| img.name == name)
            .max_by_key(|img| img.published_at)
            .map(|img| img.id)
            .ok_or_else(|| remote(SdkError::not_found("image", name)))
    }

    async fn networks(&self, config: &ConfigStore) -> Result<Vec<String>> {
        let wanted = config.get_string_slice(keys::INSTANCE_NETWORKS)?;
        if wanted.is_empty() {
            return Ok(wanted);
        }
        let api = self.clients.network(config)?;
        let known = api.list_networks().await.map_err(remote)?;
        Ok(resolve_networks(&known, &wanted))
    }
}

impl Command for CreateInstance {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        decl.bind_flag(keys::INSTANCE_NAME, Flag::string("name").short('n').help("Instance name"))?;
        decl.bind_flag(
            keys::INSTANCE_NAME_PREFIX,
            Flag::string("name-prefix").help("Generate a name with this prefix"),
        )?;
        decl.bind_flag(keys::IMAGE_ID, Flag::string("image-id").help("Image id"))?;
        decl.bind_flag(keys::IMAGE_NAME, Flag::string("image-name").help("Image name"))?;
        decl.bind_flag(keys::PACKAGE_ID, Flag::string("package-id").help("Package id"))?;
        decl.bind_flag(keys::PACKAGE_NAME, Flag::string("package-name").help("Package name"))?;
        decl.bind_flag(
            keys::INSTANCE_NETWORKS,
            Flag::list("networks").help("Network names or ids"),
        )?;
        decl.bind_flag(keys::INSTANCE_TAG, Flag::list("tags").help("Tags, as key=value"))?;
        decl.bind_flag(
            keys::INSTANCE_METADATA,
            Flag::map("metadata").short('m').help("Metadata, as key=value"),
        )?;
        decl.bind_flag(
            keys::INSTANCE_AFFINITY,
            Flag::list("affinity").help("Affinity rules, e.g. instance!=web*"),
        )?;
        decl.bind_flag(
            keys::INSTANCE_USERDATA,
            Flag::string("userdata").help("Contents of the user-script"),
        )?;
        decl.bind_flag(
            keys::INSTANCE_FIREWALL,
            Flag::bool("firewall").help("Enable the cloud firewall"),
        )?;
        declare_wait(decl)?;
        decl.normalize(Normalizer::new().map("tag", "tags").map("network", "networks"));
        Ok(())
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        let config = ctx.config();
        exactly_one_of(config, (keys::IMAGE_ID, "image-id"), (keys::IMAGE_NAME, "image-name"))?;
        exactly_one_of(
            config,
            (keys::PACKAGE_ID, "package-id"),
            (keys::PACKAGE_NAME, "package-name"),
        )?;
        tags(config).map(|_| ())
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let api = self.clients.compute(config)?;
            let package = match config.get_string(keys::PACKAGE_ID)? {
                id if id.is_empty() => config.get_string(keys::PACKAGE_NAME)?,
                id => id,
            };
            let input = CreateInstanceInput {
                name: instance_name(config)?,
                package,
                image: self.image_id(api.as_ref(), config).await?,
                networks: self.networks(config).await?,
                affinity: config.get_string_slice(keys::INSTANCE_AFFINITY)?,
                metadata: config.get_string_map(keys::INSTANCE_METADATA)?,
                tags: tags(config)?,
                user_data: config.get_string(keys::INSTANCE_USERDATA)?,
                firewall_enabled: config.get_bool(keys::INSTANCE_FIREWALL)?,
            };
            let mut instance = api.create_instance(&input).await.map_err(remote)?;
            if config.get_bool(keys::INSTANCE_WAIT)? {
                instance = wait_for_state(api.as_ref(), &instance.id, "running").await?;
            }
            ctx.println(format!("Created instance \"{}\" ({})", instance.name, instance.id));
            Ok(())
        }
        .boxed_local()
    }
}
