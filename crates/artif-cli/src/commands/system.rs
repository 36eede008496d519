//! `artif-cli` and `artif-get-license`.

use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use triton_kernel::{Command, CommandNode, Context, Result};

use super::remote;
use crate::render::{license_view, version_view};
use crate::tool::{Connector, tool};

/// `artif-cli`: prints the server version and revision.
pub fn server_version(connector: Rc<dyn Connector>) -> CommandNode {
    tool("artif-cli", ServerVersion { connector })
        .short("Show the Artifactory server version")
        .long(
            "Connects with the ARTIFACTORY_* environment variables and prints the \
             server's version and revision.",
        )
}

/// `artif-get-license`.
pub fn get_license(connector: Rc<dyn Connector>) -> CommandNode {
    tool("artif-get-license", GetLicense { connector }).short("Show license details")
}

/// Prints the server version.
pub struct ServerVersion {
    connector: Rc<dyn Connector>,
}

impl Command for ServerVersion {
    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let api = self.connector.connect()?;
            let version = api.version().await.map_err(remote)?;
            ctx.write(&version_view(&version).to_string());
            Ok(())
        }
        .boxed_local()
    }
}

/// Prints license details.
pub struct GetLicense {
    connector: Rc<dyn Connector>,
}

impl Command for GetLicense {
    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let api = self.connector.connect()?;
            let license = api.license().await.map_err(remote)?;
            ctx.write(&license_view(&license).to_string());
            Ok(())
        }
        .boxed_local()
    }
}
