//! `artif-list-repos` and `artif-get-repo`.

use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use triton_kernel::validate::required;
use triton_kernel::{CliError, Command, CommandNode, Context, Declarations, Flag, Result, SetupError};

use super::remote;
use crate::keys;
use crate::models::REPO_TYPES;
use crate::render::{repo_table, repo_view};
use crate::tool::{Connector, tool};

/// `artif-list-repos`.
pub fn list_repos(connector: Rc<dyn Connector>) -> CommandNode {
    tool("artif-list-repos", ListRepos { connector })
        .short("List repositories")
        .example("  artif-list-repos --type remote")
}

/// `artif-get-repo`.
pub fn get_repo(connector: Rc<dyn Connector>) -> CommandNode {
    tool("artif-get-repo", GetRepo { connector })
        .short("Show a repository's configuration")
        .long(
            "Shows the settings every repository has, followed by the remote URL, \
             the local layout or the virtual members depending on its class.",
        )
        .example("  artif-get-repo --key libs-release")
}

/// Lists repositories, optionally of one class.
pub struct ListRepos {
    connector: Rc<dyn Connector>,
}

impl Command for ListRepos {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        decl.bind_flag(
            keys::REPO_TYPE,
            Flag::string("type")
                .short('t')
                .help("Repository class: local, remote or virtual"),
        )
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        let kind = ctx.config().get_string(keys::REPO_TYPE)?;
        if !kind.is_empty() && !REPO_TYPES.contains(&kind.to_ascii_lowercase().as_str()) {
            return Err(CliError::validation(format!(
                "unsupported repository type \"{kind}\" (expected local, remote or virtual)"
            )));
        }
        Ok(())
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let kind = ctx.config().get_string(keys::REPO_TYPE)?.to_ascii_lowercase();
            let api = self.connector.connect()?;
            let repos = api.list_repos(&kind).await.map_err(remote)?;
            ctx.write(&repo_table(&repos).to_string());
            Ok(())
        }
        .boxed_local()
    }
}

/// Shows one repository.
pub struct GetRepo {
    connector: Rc<dyn Connector>,
}

impl Command for GetRepo {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        decl.bind_flag(keys::REPO_KEY, Flag::string("key").short('k').help("Repository key"))
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        required(ctx.config(), keys::REPO_KEY, "key")
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let key = ctx.config().get_string(keys::REPO_KEY)?;
            let api = self.connector.connect()?;
            let repo = api.get_repo(&key).await.map_err(remote)?;
            ctx.write(&repo_view(&repo).to_string());
            Ok(())
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::stub::{Stub, run};
    use crate::models::{LocalRepo, RepoBase, RepoConfig, RepoSummary};

    #[tokio::test]
    async fn local_repo_shows_layout() {
        let stub = Stub::new().with(|s| {
            s.repo = Some(RepoConfig::Local(LocalRepo {
                base: RepoBase {
                    key: "libs".into(),
                    rclass: "local".into(),
                    package_type: "maven".into(),
                    ..RepoBase::default()
                },
                repo_layout_ref: "maven-2-default".into(),
            }));
        });
        let d = stub.dispatcher(get_repo);
        let (code, term) = run(&d, &["artif-get-repo", "--key", "libs"]).await;
        assert_eq!(code, 0, "{}", term.errors());
        let mut lines = term.output().lines();
        assert!(lines.next().unwrap().ends_with("INCLUDES  LAYOUT          |"));
        assert!(lines.next().unwrap().starts_with("| libs  local  maven"));
    }

    #[tokio::test]
    async fn get_repo_requires_key() {
        let stub = Stub::new();
        let d = stub.dispatcher(get_repo);
        let (code, term) = run(&d, &["artif-get-repo"]).await;
        assert_eq!(code, 1);
        assert!(term.errors().starts_with("Error: `key` must be specified\n"));
    }

    #[tokio::test]
    async fn list_filters_by_type() {
        let stub = Stub::new().with(|s| {
            s.repos = vec![
                RepoSummary {
                    key: "libs".into(),
                    kind: "LOCAL".into(),
                    ..RepoSummary::default()
                },
                RepoSummary {
                    key: "jcenter".into(),
                    kind: "REMOTE".into(),
                    ..RepoSummary::default()
                },
            ];
        });
        let d = stub.dispatcher(list_repos);
        let (code, term) = run(&d, &["artif-list-repos", "--type", "Remote"]).await;
        assert_eq!(code, 0, "{}", term.errors());
        assert!(term.output().contains("jcenter"));
        assert!(!term.output().contains("libs"));
        assert_eq!(stub.calls(), ["list_repos remote"]);
    }

    #[tokio::test]
    async fn unknown_type_is_rejected() {
        let stub = Stub::new();
        let d = stub.dispatcher(list_repos);
        let (code, term) = run(&d, &["artif-list-repos", "-t", "federated"]).await;
        assert_eq!(code, 1);
        assert!(term.errors().contains("unsupported repository type \"federated\""));
        assert!(stub.calls().is_empty());
    }
}
