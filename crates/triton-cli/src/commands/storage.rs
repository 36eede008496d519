//! `manta ls`.

use std::fmt::Write as _;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use tracing::debug;
use triton_kernel::{ArgSpec, Command, CommandNode, Context, Result};
use triton_sdk::{ListDirectoryOutput, resolve_path};

use super::remote;
use crate::clients::Clients;
use crate::keys;

/// Builds the `ls` leaf.
pub fn node(clients: &Rc<dyn Clients>) -> CommandNode {
    CommandNode::new("ls", ListDirectory { clients: Rc::clone(clients) })
        .short("List a directory")
        .long("List the entries of a Manta directory. Defaults to the account's stor directory.")
        .args(ArgSpec::MaxN(1))
        .arg_name("PATH")
        .example("  manta ls /stor/logs")
}

/// Renders a listing: a count line, then one `name/` line per entry.
fn render(listing: &ListDirectoryOutput) -> String {
    let mut out = format!("Found {} directory entries", listing.result_set_size);
    for entry in &listing.entries {
        let _ = write!(out, "\n{}/", entry.name);
    }
    out.push('\n');
    out
}

/// Lists one directory.
pub struct ListDirectory {
    clients: Rc<dyn Clients>,
}

impl Command for ListDirectory {
    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let account = config.get_string(keys::MANTA_ACCOUNT)?;
            let path = resolve_path(&account, ctx.arg(0).unwrap_or_default());
            debug!(%path, "listing directory");
            let api = self.clients.storage(config)?;
            let listing = api.list_directory(&path).await.map_err(remote)?;
            ctx.write(&render(&listing));
            Ok(())
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use triton_sdk::DirectoryEntry;

    use crate::app;
    use crate::commands::stub::{Stub, run};
    use crate::keys::MANTA_NAMESPACE;

    fn entry(name: &str) -> DirectoryEntry {
        DirectoryEntry {
            name: name.into(),
            kind: "directory".into(),
            ..DirectoryEntry::default()
        }
    }

    fn stub() -> Stub {
        Stub::new().with(|s| {
            s.entries = vec![entry("a"), entry("b")];
            s.result_set_size = 2;
        })
    }

    #[tokio::test]
    async fn lists_entries_with_count() {
        let stub = stub();
        let d = stub.dispatcher(app::manta, MANTA_NAMESPACE);
        let (code, term) = run(&d, &["manta", "--account", "acme", "ls", "/stor"]).await;
        assert_eq!(code, 0, "{}", term.errors());
        assert!(term.output().starts_with("Found 2 directory entries\na/\nb/"));
        assert_eq!(stub.calls(), ["list_directory /acme/stor"]);
    }

    #[tokio::test]
    async fn defaults_to_stor() {
        let stub = stub();
        let d = stub.dispatcher(app::manta, MANTA_NAMESPACE);
        let (code, _) = run(&d, &["manta", "ls", "--account", "acme"]).await;
        assert_eq!(code, 0);
        assert_eq!(stub.calls(), ["list_directory /acme/stor"]);
    }

    #[tokio::test]
    async fn rejects_extra_paths() {
        let stub = stub();
        let d = stub.dispatcher(app::manta, MANTA_NAMESPACE);
        let (code, term) = run(&d, &["manta", "ls", "/stor", "/public"]).await;
        assert_eq!(code, 1);
        assert!(term.errors().contains("accepts at most 1 arg(s), received 2"));
        assert!(stub.calls().is_empty());
    }
}
