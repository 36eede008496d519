//! `triton datacenters` and `triton services`.

use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use triton_kernel::{Command, CommandNode, Context, Result};

use super::remote;
use crate::clients::Clients;
use crate::output::endpoint_table;

/// Which endpoint catalog to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    /// Datacenters in the cloud.
    Datacenters,
    /// Services in the current datacenter.
    Services,
}

/// Builds the `datacenters` and `services` leaves.
pub fn nodes(clients: &Rc<dyn Clients>) -> [CommandNode; 2] {
    [
        CommandNode::new(
            "datacenters",
            ListEndpoints {
                clients: Rc::clone(clients),
                catalog: Catalog::Datacenters,
            },
        )
        .alias("dcs")
        .short("List datacenters")
        .example("  triton datacenters"),
        CommandNode::new(
            "services",
            ListEndpoints {
                clients: Rc::clone(clients),
                catalog: Catalog::Services,
            },
        )
        .short("List services")
        .example("  triton services"),
    ]
}

/// Lists a name/url catalog.
pub struct ListEndpoints {
    clients: Rc<dyn Clients>,
    catalog: Catalog,
}

impl Command for ListEndpoints {
    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let api = self.clients.compute(ctx.config())?;
            let endpoints = match self.catalog {
                Catalog::Datacenters => api.list_datacenters().await,
                Catalog::Services => api.list_services().await,
            }
            .map_err(remote)?;
            ctx.write(&endpoint_table(&endpoints).to_string());
            Ok(())
        }
        .boxed_local()
    }
}
