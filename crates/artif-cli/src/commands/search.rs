//! Property and coordinate searches.

use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use tracing::debug;
use triton_kernel::validate::required;
use triton_kernel::{
    CliError, Command, CommandNode, ConfigStore, Context, Declarations, Flag, Result, SetupError,
};

use super::remote;
use crate::keys;
use crate::models::GavcQuery;
use crate::render::{docker_table, file_views, vagrant_table};
use crate::tool::{Connector, tool};

/// `artif-docker-search`.
pub fn docker_search(connector: Rc<dyn Connector>) -> CommandNode {
    tool("artif-docker-search", DockerSearch { connector })
        .short("Find Docker images by name")
        .example("  artif-docker-search --image acme/api --labels")
}

/// `artif-vagrant-search`.
pub fn vagrant_search(connector: Rc<dyn Connector>) -> CommandNode {
    tool("artif-vagrant-search", VagrantSearch { connector })
        .short("Find Vagrant boxes by name")
        .example("  artif-vagrant-search --name base --provider virtualbox")
}

/// `artif-search-gavc`.
pub fn search_gavc(connector: Rc<dyn Connector>) -> CommandNode {
    tool("artif-search-gavc", SearchGavc { connector })
        .short("Find artifacts by Maven coordinates")
        .long(
            "Searches by group id, artifact id, version and classifier. At least \
             one coordinate is needed; --repo narrows the search to the named repositories.",
        )
        .example("  artif-search-gavc --groupid org.acme --artifactid app --repo libs-release")
}

/// Searches `docker.repoName` properties.
pub struct DockerSearch {
    connector: Rc<dyn Connector>,
}

impl Command for DockerSearch {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        decl.bind_flag(keys::SEARCH_IMAGE, Flag::string("image").short('i').help("Image name, `*` wildcards allowed"))?;
        decl.bind_flag(keys::SEARCH_LABELS, Flag::bool("labels").help("Show image labels"))
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        required(ctx.config(), keys::SEARCH_IMAGE, "image")
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let image = config.get_string(keys::SEARCH_IMAGE)?;
            let labels = config.get_bool(keys::SEARCH_LABELS)?;
            let api = self.connector.connect()?;
            let images = api.docker_search(&image).await.map_err(remote)?;
            debug!(%image, hits = images.len(), "docker search");
            ctx.write(&docker_table(&images, labels).to_string());
            Ok(())
        }
        .boxed_local()
    }
}

/// Searches `box_name` properties.
pub struct VagrantSearch {
    connector: Rc<dyn Connector>,
}

impl Command for VagrantSearch {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        decl.bind_flag(keys::SEARCH_NAME, Flag::string("name").short('n').help("Box name, `*` wildcards allowed"))?;
        decl.bind_flag(keys::SEARCH_PROVIDER, Flag::string("provider").short('p').help("Box provider"))
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        required(ctx.config(), keys::SEARCH_NAME, "name")
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let name = config.get_string(keys::SEARCH_NAME)?;
            let provider = config.get_string(keys::SEARCH_PROVIDER)?;
            let api = self.connector.connect()?;
            let boxes = api.vagrant_search(&name, &provider).await.map_err(remote)?;
            ctx.write(&vagrant_table(&boxes).to_string());
            Ok(())
        }
        .boxed_local()
    }
}

fn gavc_query(config: &ConfigStore) -> Result<GavcQuery> {
    Ok(GavcQuery {
        group_id: config.get_string(keys::SEARCH_GROUP_ID)?,
        artifact_id: config.get_string(keys::SEARCH_ARTIFACT_ID)?,
        version: config.get_string(keys::SEARCH_VERSION)?,
        classifier: config.get_string(keys::SEARCH_CLASSIFIER)?,
        repos: config.get_string_slice(keys::SEARCH_REPO)?,
    })
}

/// Searches by Maven coordinates.
pub struct SearchGavc {
    connector: Rc<dyn Connector>,
}

impl Command for SearchGavc {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        decl.bind_flag(keys::SEARCH_GROUP_ID, Flag::string("groupid").short('g').help("Group id"))?;
        decl.bind_flag(keys::SEARCH_ARTIFACT_ID, Flag::string("artifactid").short('a').help("Artifact id"))?;
        decl.bind_flag(keys::SEARCH_VERSION, Flag::string("version").short('v').help("Version"))?;
        decl.bind_flag(keys::SEARCH_CLASSIFIER, Flag::string("classifier").short('c').help("Classifier"))?;
        decl.bind_flag(keys::SEARCH_REPO, Flag::list("repo").short('r').help("Repository to search, repeatable"))
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        if gavc_query(ctx.config())?.is_empty() {
            return Err(CliError::validation(
                "at least one of `groupid`, `artifactid`, `version` or `classifier` must be specified",
            ));
        }
        Ok(())
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let query = gavc_query(ctx.config())?;
            let api = self.connector.connect()?;
            let hits = api.search_gavc(&query).await.map_err(remote)?;
            ctx.write(&file_views(&hits));
            Ok(())
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::commands::stub::{Stub, run};
    use crate::models::{DockerImage, FileInfo, VagrantBox};

    fn props(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[tokio::test]
    async fn docker_search_lists_tags() {
        let stub = Stub::new().with(|s| {
            s.images = vec![DockerImage {
                repo: "docker-local".into(),
                path: "acme/api/1.2".into(),
                modified: "2024-03-01".into(),
                modified_by: "ci".into(),
                properties: props(&[
                    ("docker.repoName", "acme/api"),
                    ("docker.manifest", "1.2"),
                    ("docker.label.maintainer", "ops"),
                ]),
            }];
        });
        let d = stub.dispatcher(docker_search);
        let (code, term) = run(&d, &["artif-docker-search", "--image", "acme/*"]).await;
        assert_eq!(code, 0, "{}", term.errors());
        assert!(term.output().contains("acme/api:1.2  no description"));
        assert!(!term.output().contains("LABELS"));
        assert_eq!(stub.calls(), ["docker_search acme/*"]);

        let (_, term) = run(&d, &["artif-docker-search", "-i", "acme/api", "--labels"]).await;
        assert!(term.output().contains("maintainer=ops"));
    }

    #[tokio::test]
    async fn docker_search_requires_image() {
        let stub = Stub::new();
        let d = stub.dispatcher(docker_search);
        let (code, term) = run(&d, &["artif-docker-search", "--labels"]).await;
        assert_eq!(code, 1);
        assert!(term.errors().starts_with("Error: `image` must be specified\n"));
    }

    #[tokio::test]
    async fn vagrant_search_passes_provider() {
        let stub = Stub::new().with(|s| {
            s.boxes = vec![VagrantBox {
                repo: "boxes".into(),
                path: "base.box".into(),
                properties: props(&[
                    ("box_name", "base"),
                    ("box_version", "1.0"),
                    ("box_provider", "virtualbox"),
                ]),
            }];
        });
        let d = stub.dispatcher(vagrant_search);
        let (code, term) = run(&d, &["artif-vagrant-search", "-n", "base", "-p", "virtualbox"]).await;
        assert_eq!(code, 0, "{}", term.errors());
        assert_eq!(
            term.output(),
            "| NAME  VERSION  PROVIDER    REPO   PATH     |\n\
             | base  1.0      virtualbox  boxes  base.box |\n"
        );
        assert_eq!(stub.calls(), ["vagrant_search base virtualbox"]);
    }

    #[tokio::test]
    async fn gavc_needs_a_coordinate() {
        let stub = Stub::new();
        let d = stub.dispatcher(search_gavc);
        let (code, term) = run(&d, &["artif-search-gavc", "--repo", "libs"]).await;
        assert_eq!(code, 1);
        assert!(term.errors().starts_with(
            "Error: at least one of `groupid`, `artifactid`, `version` or `classifier` must be specified\n"
        ));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn gavc_collects_coordinates_and_repos() {
        let stub = Stub::new().with(|s| {
            s.hits = vec![
                FileInfo {
                    repo: "libs".into(),
                    path: "/org/acme/app/1.0/app-1.0.jar".into(),
                    ..FileInfo::default()
                },
                FileInfo {
                    repo: "libs".into(),
                    path: "/org/acme/app/1.0/app-1.0.pom".into(),
                    ..FileInfo::default()
                },
            ];
        });
        let d = stub.dispatcher(search_gavc);
        let (code, term) = run(
            &d,
            &["artif-search-gavc", "-g", "org.acme", "-a", "app", "-r", "libs", "-r", "ext"],
        )
        .await;
        assert_eq!(code, 0, "{}", term.errors());
        assert!(term.output().starts_with("file: /org/acme/app/1.0/app-1.0.jar\n"));
        assert!(term.output().contains("\n\nfile: /org/acme/app/1.0/app-1.0.pom\n"));

        let state = stub.state();
        let query = state.searched.as_ref().unwrap();
        assert_eq!(query.group_id, "org.acme");
        assert_eq!(query.artifact_id, "app");
        assert!(query.version.is_empty());
        assert_eq!(query.repos, ["libs", "ext"]);
    }
}
