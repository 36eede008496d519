//! `artif-deploy-artifact` and `artif-list-files`.

use std::path::Path;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use tracing::debug;
use triton_kernel::validate::required;
use triton_kernel::{
    CliError, Command, CommandNode, ConfigStore, Context, Declarations, Flag, Result, SetupError,
};

use super::remote;
use crate::client::sha256_hex;
use crate::keys;
use crate::models::DeployRequest;
use crate::render::{file_table, file_view};
use crate::tool::{Connector, tool};

/// `artif-deploy-artifact`.
pub fn deploy_artifact(connector: Rc<dyn Connector>) -> CommandNode {
    tool("artif-deploy-artifact", DeployArtifact { connector })
        .short("Upload a file")
        .long(
            "Uploads a local file to a repository path, attaching any --property \
             pairs and the file's SHA-256 checksum.",
        )
        .example("  artif-deploy-artifact --file app.jar --repo libs --path org/acme/app/1.0/app-1.0.jar --property build.number=42")
}

/// `artif-list-files`.
pub fn list_files(connector: Rc<dyn Connector>) -> CommandNode {
    tool("artif-list-files", ListFiles { connector })
        .short("List files in a repository folder")
        .example("  artif-list-files --repo libs --path org/acme --deep")
}

fn declare_location(decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
    decl.bind_flag(keys::STORAGE_REPO, Flag::string("repo").short('r').help("Repository key"))?;
    decl.bind_flag(keys::STORAGE_PATH, Flag::string("path").short('p').help("Path within the repository"))
}

/// Target path: `--path`, or the file name when absent.
fn target_path(config: &ConfigStore, file: &Path) -> Result<String> {
    let path = config.get_string(keys::STORAGE_PATH)?;
    if !path.trim_matches('/').is_empty() {
        return Ok(path.trim_matches('/').to_string());
    }
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::validation(format!("cannot derive a target path from \"{}\"", file.display())))
}

/// Uploads one file.
pub struct DeployArtifact {
    connector: Rc<dyn Connector>,
}

impl Command for DeployArtifact {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        decl.bind_flag(keys::DEPLOY_FILE, Flag::string("file").short('f').help("Local file to upload"))?;
        declare_location(decl)?;
        decl.bind_flag(
            keys::DEPLOY_PROPERTIES,
            Flag::map("property").help("Property to attach, as key=value"),
        )
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        let config = ctx.config();
        required(config, keys::DEPLOY_FILE, "file")?;
        required(config, keys::STORAGE_REPO, "repo")
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let file = config.get_string(keys::DEPLOY_FILE)?;
            let file = Path::new(&file);
            let content = std::fs::read(file).map_err(|e| CliError::io(format!("reading {}", file.display()), e))?;
            let request = DeployRequest {
                repo: config.get_string(keys::STORAGE_REPO)?,
                path: target_path(config, file)?,
                properties: config.get_string_map(keys::DEPLOY_PROPERTIES)?,
                sha256: sha256_hex(&content),
                content,
            };
            debug!(repo = %request.repo, path = %request.path, bytes = request.content.len(), "deploying");
            let api = self.connector.connect()?;
            let info = api.deploy(&request).await.map_err(remote)?;
            ctx.write(&file_view(&info).to_string());
            Ok(())
        }
        .boxed_local()
    }
}

/// Lists a folder.
pub struct ListFiles {
    connector: Rc<dyn Connector>,
}

impl Command for ListFiles {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        declare_location(decl)?;
        decl.bind_flag(keys::STORAGE_DEEP, Flag::bool("deep").help("Recurse into subfolders"))
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        required(ctx.config(), keys::STORAGE_REPO, "repo")
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let repo = config.get_string(keys::STORAGE_REPO)?;
            let path = config.get_string(keys::STORAGE_PATH)?;
            let deep = config.get_bool(keys::STORAGE_DEEP)?;
            let api = self.connector.connect()?;
            let list = api.list_files(&repo, &path, deep).await.map_err(remote)?;
            ctx.write(&file_table(&list).to_string());
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
    use crate::models::{FileList, FileListEntry};

    #[tokio::test]
    async fn deploy_sends_checksum_and_properties() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("app-1.0.jar");
        std::fs::write(&file, b"abc").unwrap();

        let stub = Stub::new();
        let d = stub.dispatcher(deploy_artifact);
        let (code, term) = run(
            &d,
            &[
                "artif-deploy-artifact",
                "--file",
                file.to_str().unwrap(),
                "--repo",
                "libs",
                "--property",
                "build.number=42",
                "--property",
                "vcs=git",
            ],
        )
        .await;
        assert_eq!(code, 0, "{}", term.errors());
        assert!(term.output().starts_with("file: /app-1.0.jar\nrepo: libs\n"));
        assert!(term.output().contains("size: 3\n"));

        let state = stub.state();
        let sent = state.deployed.as_ref().unwrap();
        assert_eq!(sent.path, "app-1.0.jar");
        assert_eq!(
            sent.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            sent.properties,
            BTreeMap::from([
                ("build.number".to_string(), "42".to_string()),
                ("vcs".to_string(), "git".to_string()),
            ])
        );
    }

    #[tokio::test]
    async fn deploy_reports_unreadable_file() {
        let stub = Stub::new();
        let d = stub.dispatcher(deploy_artifact);
        let (code, term) = run(
            &d,
            &["artif-deploy-artifact", "--file", "/nonexistent/app.jar", "--repo", "libs"],
        )
        .await;
        assert_eq!(code, 1);
        assert!(term.errors().starts_with("Error: reading /nonexistent/app.jar"));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn deploy_requires_repo() {
        let stub = Stub::new();
        let d = stub.dispatcher(deploy_artifact);
        let (code, term) = run(&d, &["artif-deploy-artifact", "--file", "x"]).await;
        assert_eq!(code, 1);
        assert!(term.errors().starts_with("Error: `repo` must be specified\n"));
    }

    #[tokio::test]
    async fn list_files_renders_folders_without_size() {
        let stub = Stub::new().with(|s| {
            s.files = FileList {
                uri: "https://artifactory/api/storage/libs/org".into(),
                created: String::new(),
                files: vec![
                    FileListEntry {
                        uri: "/acme".into(),
                        size: -1,
                        folder: true,
                        ..FileListEntry::default()
                    },
                    FileListEntry {
                        uri: "/acme/app.jar".into(),
                        size: 1024,
                        sha1: Some("a9993e36".into()),
                        ..FileListEntry::default()
                    },
                ],
            };
        });
        let d = stub.dispatcher(list_files);
        let (code, term) = run(&d, &["artif-list-files", "-r", "libs", "-p", "org", "--deep"]).await;
        assert_eq!(code, 0, "{}", term.errors());
        assert_eq!(
            term.output(),
            "| URI            SIZE  LAST MODIFIED  SHA1     |\n\
             | /acme          -                             |\n\
             | /acme/app.jar  1024                 a9993e36 |\n"
        );
        assert_eq!(stub.calls(), ["list_files libs org deep=true"]);
    }
}
