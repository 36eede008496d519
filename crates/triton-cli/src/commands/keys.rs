//! `triton keys`: SSH public keys registered with the account.

use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use triton_kernel::validate::required;
use triton_kernel::{
    Command, CommandNode, ConfigStore, Context, Declarations, Flag, Result, SetupError,
    exactly_one_of,
};

use super::remote;
use crate::clients::Clients;
use crate::keys;
use crate::output::{key_table, key_view};

/// Builds the `keys` subtree.
pub fn node(clients: &Rc<dyn Clients>) -> CommandNode {
    let c = || Rc::clone(clients);
    CommandNode::group("keys")
        .short("SSH key operations")
        .long("List, inspect, upload and remove the account's SSH public keys.")
        .child(
            CommandNode::new("list", ListKeys { clients: c() })
                .alias("ls")
                .short("List keys"),
        )
        .child(
            CommandNode::new("get", GetKey { clients: c() })
                .short("Show a key")
                .example("  triton keys get --keyname laptop"),
        )
        .child(
            CommandNode::new("delete", DeleteKey { clients: c() })
                .alias("rm")
                .short("Delete a key")
                .example("  triton keys delete --fingerprint 3b:de:6e:1a:94:f3:5f:3a:0c:1b:0d:75:bb:f2:c8:a1"),
        )
        .child(
            CommandNode::new("create", CreateKey { clients: c() })
                .short("Upload a key")
                .example("  triton keys create --keyname laptop --publickey \"$(cat ~/.ssh/id_ed25519.pub)\""),
        )
}

fn declare_identity(decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
    decl.bind_flag(keys::KEY_FINGERPRINT, Flag::string("fingerprint").help("Key fingerprint"))?;
    decl.bind_flag(keys::KEY_NAME, Flag::string("keyname").help("Key name"))
}

fn check_identity(config: &ConfigStore) -> Result<()> {
    exactly_one_of(
        config,
        (keys::KEY_FINGERPRINT, "fingerprint"),
        (keys::KEY_NAME, "keyname"),
    )
}

/// The key path segment: the fingerprint when given, else the name.
fn identity(config: &ConfigStore) -> Result<String> {
    let fingerprint = config.get_string(keys::KEY_FINGERPRINT)?;
    if fingerprint.is_empty() {
        return Ok(config.get_string(keys::KEY_NAME)?);
    }
    Ok(fingerprint)
}

/// Lists keys.
pub struct ListKeys {
    clients: Rc<dyn Clients>,
}

impl Command for ListKeys {
    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let api = self.clients.account(ctx.config())?;
            let keys = api.list_keys().await.map_err(remote)?;
            ctx.write(&key_table(&keys).to_string());
            Ok(())
        }
        .boxed_local()
    }
}

/// Shows one key.
pub struct GetKey {
    clients: Rc<dyn Clients>,
}

impl Command for GetKey {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        declare_identity(decl)
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        check_identity(ctx.config())
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let api = self.clients.account(config)?;
            let key = api.get_key(&identity(config)?).await.map_err(remote)?;
            ctx.write(&key_view(&key).to_string());
            Ok(())
        }
        .boxed_local()
    }
}

/// Deletes one key.
pub struct DeleteKey {
    clients: Rc<dyn Clients>,
}

impl Command for DeleteKey {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        declare_identity(decl)
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        check_identity(ctx.config())
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let api = self.clients.account(config)?;
            let id = identity(config)?;
            let key = api.get_key(&id).await.map_err(remote)?;
            api.delete_key(&id).await.map_err(remote)?;
            ctx.println(format!("Deleted key \"{}\"", key.name));
            Ok(())
        }
        .boxed_local()
    }
}

/// Uploads a public key.
pub struct CreateKey {
    clients: Rc<dyn Clients>,
}

impl Command for CreateKey {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        decl.bind_flag(keys::KEY_NAME, Flag::string("keyname").help("Key name"))?;
        decl.bind_flag(
            keys::KEY_PUBLIC_KEY,
            Flag::string("publickey").help("OpenSSH public key"),
        )
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        let config = ctx.config();
        required(config, keys::KEY_NAME, "keyname")?;
        required(config, keys::KEY_PUBLIC_KEY, "publickey")
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let api = self.clients.account(config)?;
            let name = config.get_string(keys::KEY_NAME)?;
            let material = config.get_string(keys::KEY_PUBLIC_KEY)?;
            let key = api.create_key(&name, material.trim()).await.map_err(remote)?;
            ctx.println(format!("Created key \"{}\"", key.name));
            Ok(())
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;
    use triton_sdk::Key;

    use crate::app;
    use crate::commands::stub::{Stub, run};
    use crate::keys::TRITON_NAMESPACE;

    fn stub() -> Stub {
        Stub::new().with(|s| {
            s.keys = vec![Key {
                name: "laptop".into(),
                fingerprint: "3b:de:6e".into(),
                key: "ssh-ed25519 AAAA laptop".into(),
            }];
        })
    }

    #[tokio::test]
    async fn delete_rejects_both_identities() {
        let stub = stub();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);
        let (code, term) = run(
            &d,
            &["triton", "keys", "delete", "--fingerprint", "X", "--keyname", "Y"],
        )
        .await;
        assert_eq!(code, 1);
        assert!(term.errors().contains("Only 1 of `fingerprint` or `keyname` must be specified"));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn get_requires_an_identity() {
        let stub = stub();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);
        let (code, term) = run(&d, &["triton", "keys", "get"]).await;
        assert_eq!(code, 1);
        assert!(term.errors().contains("Either `fingerprint` or `keyname` must be specified"));
    }

    #[test_case("get"; "get")]
    #[test_case("delete"; "delete")]
    #[tokio::test]
    async fn lookups_need_exactly_one_identity(command: &str) {
        let stub = stub();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);

        let (code, term) = run(&d, &["triton", "keys", command]).await;
        assert_eq!(code, 1);
        assert_eq!(
            term.errors().lines().next(),
            Some("Error: Either `fingerprint` or `keyname` must be specified")
        );

        let (code, term) = run(
            &d,
            &["triton", "keys", command, "--fingerprint", "3b:de:6e", "--keyname", "laptop"],
        )
        .await;
        assert_eq!(code, 1);
        assert_eq!(
            term.errors().lines().next(),
            Some("Error: Only 1 of `fingerprint` or `keyname` must be specified")
        );
        assert!(stub.calls().is_empty());

        let (code, term) = run(&d, &["triton", "keys", command, "--keyname", "laptop"]).await;
        assert_eq!(code, 0, "{}", term.errors());
        assert_eq!(stub.calls()[0], "get_key laptop");
    }

    #[tokio::test]
    async fn delete_of_unknown_key_removes_nothing() {
        let stub = stub();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);
        let (code, term) = run(&d, &["triton", "keys", "delete", "--keyname", "nope"]).await;
        assert_eq!(code, 1);
        assert!(term.errors().contains("key not found"));
        assert_eq!(stub.calls(), ["get_key nope"]);
    }

    #[tokio::test]
    async fn get_by_name() {
        let stub = stub();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);
        let (code, term) = run(&d, &["triton", "keys", "get", "--keyname", "laptop"]).await;
        assert_eq!(code, 0, "{}", term.errors());
        assert_eq!(
            term.output(),
            "name: laptop\nfingerprint: 3b:de:6e\nkey: ssh-ed25519 AAAA laptop\n"
        );
    }

    #[tokio::test]
    async fn delete_and_create_report_action() {
        let stub = stub();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);
        let (_, term) = run(&d, &["triton", "keys", "delete", "--fingerprint", "3b:de:6e"]).await;
        assert_eq!(term.output(), "Deleted key \"laptop\"\n");
        let (code, term) = run(
            &d,
            &["triton", "keys", "create", "--keyname", "ci", "--publickey", "ssh-ed25519 BBBB ci\n"],
        )
        .await;
        assert_eq!(code, 0, "{}", term.errors());
        assert_eq!(term.output(), "Created key \"ci\"\n");
        assert_eq!(stub.calls(), ["get_key 3b:de:6e", "delete_key 3b:de:6e", "create_key ci"]);
    }

    #[tokio::test]
    async fn create_requires_material() {
        let stub = stub();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);
        let (code, term) = run(&d, &["triton", "keys", "create", "--keyname", "ci"]).await;
        assert_eq!(code, 1);
        assert!(term.errors().starts_with("Error: `publickey` must be specified\n"));
    }

    #[tokio::test]
    async fn list_renders_table() {
        let stub = stub();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);
        let (_, term) = run(&d, &["triton", "keys", "ls"]).await;
        assert_eq!(term.output(), "| NAME    FINGERPRINT |\n| laptop  3b:de:6e    |\n");
    }
}
