//! Command trees for the `triton` and `manta` binaries.

use std::rc::Rc;

use triton_kernel::CommandNode;

use crate::clients::Clients;
use crate::commands::root::{MantaRoot, TritonRoot};
use crate::commands::{account, catalog, doc, instances, keys, packages, storage, version};
use crate::version::{manta_user_agent, triton_user_agent};

/// The `triton` tree.
pub fn triton(clients: Rc<dyn Clients>) -> CommandNode {
    let [datacenters, services] = catalog::nodes(&clients);
    CommandNode::new("triton", TritonRoot)
        .short("Manage Triton cloud resources")
        .long(
            "triton manages instances, packages, keys and the account profile \
             on a Triton cloud through CloudAPI.",
        )
        .child(account::node(&clients))
        .child(datacenters)
        .child(services)
        .child(instances::node(&clients))
        .child(keys::node(&clients))
        .child(packages::node(&clients))
        .child(doc::node("Triton", true))
        .child(doc::shell_node())
        .child(version::node(triton_user_agent))
}

/// The `manta` tree.
pub fn manta(clients: Rc<dyn Clients>) -> CommandNode {
    CommandNode::new("manta", MantaRoot)
        .short("Manage Manta object storage")
        .long("manta browses objects and directories in Manta object storage.")
        .child(storage::node(&clients))
        .child(doc::node("Manta", false))
        .child(doc::shell_node())
        .child(version::node(manta_user_agent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::stub::{Stub, run};
    use crate::keys::{MANTA_NAMESPACE, TRITON_NAMESPACE};

    #[test]
    fn trees_declare_cleanly() {
        let triton = Stub::new().dispatcher(triton, TRITON_NAMESPACE);
        let names: Vec<_> = triton.tree().root().children().iter().map(CommandNode::name).collect();
        assert_eq!(
            names,
            [
                "account", "datacenters", "services", "instances", "keys", "packages", "doc",
                "shell", "version"
            ]
        );
        let manta = Stub::new().dispatcher(manta, MANTA_NAMESPACE);
        let names: Vec<_> = manta.tree().root().children().iter().map(CommandNode::name).collect();
        assert_eq!(names, ["ls", "doc", "shell", "version"]);
    }

    #[tokio::test]
    async fn unknown_subcommand_fails_with_usage() {
        let d = Stub::new().dispatcher(triton, TRITON_NAMESPACE);
        let (code, term) = run(&d, &["triton", "instances", "frobnicate"]).await;
        assert_eq!(code, 1);
        assert!(term.errors().starts_with("Error: "));
    }

    #[tokio::test]
    async fn help_exits_cleanly() {
        let d = Stub::new().dispatcher(triton, TRITON_NAMESPACE);
        let (code, term) = run(&d, &["triton", "--help"]).await;
        assert_eq!(code, 0, "{}", term.errors());
        assert!(term.output().contains("instances"));
    }
}
