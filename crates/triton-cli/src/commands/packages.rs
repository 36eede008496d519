//! `triton packages {list,get}`.

use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use triton_kernel::{
    Command, CommandNode, ConfigStore, Context, Declarations, Flag, Result, SetupError,
    exactly_one_of,
};
use triton_sdk::ListPackagesInput;

use super::remote;
use crate::clients::Clients;
use crate::keys;
use crate::output::{package_table, pretty_json};

/// Builds the `packages` subtree.
pub fn node(clients: &Rc<dyn Clients>) -> CommandNode {
    CommandNode::group("packages")
        .alias("pkgs")
        .short("Instance packages")
        .long("Packages describe the memory, disk and CPU an instance is provisioned with.")
        .child(
            CommandNode::new("list", ListPackages { clients: Rc::clone(clients) })
                .alias("ls")
                .short("List packages")
                .example("  triton packages list --memory 1024"),
        )
        .child(
            CommandNode::new("get", GetPackage { clients: Rc::clone(clients) })
                .short("Show a package")
                .example("  triton packages get --name g4-highcpu-1G"),
        )
}

const SIZE_FILTERS: [(&str, &str, &str); 4] = [
    (keys::PACKAGE_MEMORY, "memory", "Memory in MiB"),
    (keys::PACKAGE_DISK, "disk", "Disk in MiB"),
    (keys::PACKAGE_SWAP, "swap", "Swap in MiB"),
    (keys::PACKAGE_VCPU, "vcpu", "Number of vCPUs"),
];

fn filters(config: &ConfigStore) -> Result<ListPackagesInput> {
    Ok(ListPackagesInput {
        name: config.get_string(keys::PACKAGE_NAME)?,
        memory: config.get_int(keys::PACKAGE_MEMORY)?,
        disk: config.get_int(keys::PACKAGE_DISK)?,
        swap: config.get_int(keys::PACKAGE_SWAP)?,
        vcpus: config.get_int(keys::PACKAGE_VCPU)?,
    })
}

/// Lists packages matching the filters.
pub struct ListPackages {
    clients: Rc<dyn Clients>,
}

impl Command for ListPackages {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        decl.bind_flag(keys::PACKAGE_NAME, Flag::string("name").help("Package name"))?;
        for (key, long, help) in SIZE_FILTERS {
            decl.bind_flag(key, Flag::int(long).help(help).default_value(0_i64))?;
        }
        Ok(())
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let input = filters(config)?;
            let api = self.clients.compute(config)?;
            let packages = api.list_packages(&input).await.map_err(remote)?;
            ctx.write(&package_table(&packages).to_string());
            Ok(())
        }
        .boxed_local()
    }
}

/// Shows one package as JSON.
pub struct GetPackage {
    clients: Rc<dyn Clients>,
}

impl Command for GetPackage {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        decl.bind_flag(keys::PACKAGE_ID, Flag::string("id").help("Package UUID"))?;
        decl.bind_flag(keys::PACKAGE_NAME, Flag::string("name").help("Package name"))
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        exactly_one_of(
            ctx.config(),
            (keys::PACKAGE_ID, "id"),
            (keys::PACKAGE_NAME, "name"),
        )
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let mut id = config.get_string(keys::PACKAGE_ID)?;
            if id.is_empty() {
                id = config.get_string(keys::PACKAGE_NAME)?;
            }
            let api = self.clients.compute(config)?;
            let package = api.get_package(&id).await.map_err(remote)?;
            ctx.println(pretty_json(&package)?);
            Ok(())
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use triton_sdk::Package;

    use crate::app;
    use crate::commands::stub::{Stub, run};
    use crate::keys::TRITON_NAMESPACE;

    fn stub() -> Stub {
        Stub::new().with(|s| {
            s.packages = vec![Package {
                id: "7b17343c-94af-6266-e0e8-893a3b9993d0".into(),
                name: "g4-highcpu-1G".into(),
                memory: 1024,
                disk: 25600,
                swap: 4096,
                vcpus: 1,
                lwps: 4000,
                ..Package::default()
            }];
        })
    }

    #[tokio::test]
    async fn list_renders_table() {
        let stub = stub();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);
        let (code, term) = run(&d, &["triton", "packages", "ls", "--memory", "1024"]).await;
        assert_eq!(code, 0, "{}", term.errors());
        assert_eq!(
            term.output(),
            "| SHORTID   NAME           MEMORY  DISK   SWAP  VCPUS  LWPS |\n\
             | 7b17343c  g4-highcpu-1G  1024    25600  4096  1      4000 |\n"
        );
    }

    #[tokio::test]
    async fn get_prints_json() {
        let stub = stub();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);
        let (code, term) = run(&d, &["triton", "pkgs", "get", "--name", "g4-highcpu-1G"]).await;
        assert_eq!(code, 0, "{}", term.errors());
        let parsed: serde_json::Value = serde_json::from_str(term.output()).unwrap();
        assert_eq!(parsed["memory"], 1024);
        assert!(term.output().contains("\n    \"name\": \"g4-highcpu-1G\""));
        assert_eq!(stub.calls(), ["get_package g4-highcpu-1G"]);
    }

    #[tokio::test]
    async fn get_requires_an_identity() {
        let stub = stub();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);
        let (code, term) = run(&d, &["triton", "packages", "get"]).await;
        assert_eq!(code, 1);
        assert_eq!(
            term.errors().lines().next(),
            Some("Error: Either `id` or `name` must be specified")
        );
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn get_rejects_both_identities() {
        let stub = stub();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);
        let (code, term) = run(&d, &["triton", "packages", "get", "--id", "x", "--name", "y"]).await;
        assert_eq!(code, 1);
        assert!(term.errors().starts_with("Error: Only 1 of `id` or `name` must be specified\n"));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_package_surfaces_remote_error() {
        let stub = stub();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);
        let (code, term) = run(&d, &["triton", "packages", "get", "--id", "nope"]).await;
        assert_eq!(code, 1);
        assert!(term.errors().contains("package not found"));
    }
}
