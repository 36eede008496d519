//! In-memory Artifactory stub and a dispatcher harness for handler tests.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::BoxFuture;
use triton_kernel::{BufferTerminal, CliError, CommandNode, Dispatcher, Result};

use crate::client::ArtifactoryApi;
use crate::error::{self, ArtifError};
use crate::keys::ARTIF_NAMESPACE;
use crate::models::{
    ApiKey, DeployRequest, DockerImage, FileInfo, FileList, GavcQuery, Group, GroupSummary,
    License, PermissionTarget, RepoConfig, RepoSummary, ServerVersion, User, UserSummary,
    VagrantBox,
};
use crate::tool::{CLIENT_ERROR, Connector};

/// Canned responses plus a log of every call made.
#[derive(Debug, Default)]
pub struct State {
    pub version: ServerVersion,
    pub users: Vec<User>,
    pub groups: Vec<Group>,
    pub repos: Vec<RepoSummary>,
    pub repo: Option<RepoConfig>,
    pub permission: Option<PermissionTarget>,
    pub license: License,
    pub files: FileList,
    pub images: Vec<DockerImage>,
    pub boxes: Vec<VagrantBox>,
    pub hits: Vec<FileInfo>,
    pub deployed: Option<DeployRequest>,
    pub searched: Option<GavcQuery>,
    pub calls: Vec<String>,
    pub fail_connect: bool,
}

/// Shared stub backing [`Connector`] and [`ArtifactoryApi`].
#[derive(Debug, Clone, Default)]
pub struct Stub {
    state: Arc<Mutex<State>>,
}

fn not_found(what: &str) -> ArtifError {
    ArtifError::from_body(404, &format!(r#"{{"errors":[{{"status":404,"message":"{what} not found"}}]}}"#))
}

impl Stub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, f: impl FnOnce(&mut State)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn read<T>(&self, call: impl Into<String>, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.into());
        f(&mut state)
    }

    pub fn dispatcher(&self, build: fn(Rc<dyn Connector>) -> CommandNode) -> Dispatcher {
        Dispatcher::new(build(Rc::new(self.clone())), ARTIF_NAMESPACE).unwrap()
    }
}

/// Runs `argv` against `dispatcher` with an empty environment.
pub async fn run(dispatcher: &Dispatcher, argv: &[&str]) -> (i32, BufferTerminal) {
    let env: HashMap<&str, &str> = HashMap::new();
    let mut term = BufferTerminal::new();
    let code = dispatcher.dispatch(argv.iter().copied(), &env, &mut term).await;
    (code, term)
}

impl Connector for Stub {
    fn connect(&self) -> Result<Box<dyn ArtifactoryApi>> {
        if self.state.lock().unwrap().fail_connect {
            return Err(CliError::client(
                CLIENT_ERROR,
                ArtifError::config("ARTIFACTORY_URL is required"),
            ));
        }
        Ok(Box::new(self.clone()))
    }
}

impl ArtifactoryApi for Stub {
    fn version(&self) -> BoxFuture<'_, error::Result<ServerVersion>> {
        let version = self.read("version", |s| s.version.clone());
        async move { Ok(version) }.boxed()
    }

    fn list_users(&self) -> BoxFuture<'_, error::Result<Vec<UserSummary>>> {
        let users = self.read("list_users", |s| {
            s.users
                .iter()
                .map(|u| UserSummary {
                    name: u.name.clone(),
                    uri: format!("https://artifactory/api/security/users/{}", u.name),
                    realm: u.realm.clone(),
                })
                .collect()
        });
        async move { Ok(users) }.boxed()
    }

    fn get_user<'a>(&'a self, name: &'a str) -> BoxFuture<'a, error::Result<User>> {
        let found = self.read(format!("get_user {name}"), |s| s.users.iter().find(|u| u.name == name).cloned());
        async move { found.ok_or_else(|| not_found("user")) }.boxed()
    }

    fn delete_user<'a>(&'a self, name: &'a str) -> BoxFuture<'a, error::Result<String>> {
        let removed = self.read(format!("delete_user {name}"), |s| {
            let before = s.users.len();
            s.users.retain(|u| u.name != name);
            before != s.users.len()
        });
        let answer = if removed {
            Ok(format!("The user: '{name}' has been removed successfully."))
        } else {
            Err(not_found("user"))
        };
        async move { answer }.boxed()
    }

    fn list_groups(&self) -> BoxFuture<'_, error::Result<Vec<GroupSummary>>> {
        let groups = self.read("list_groups", |s| {
            s.groups
                .iter()
                .map(|g| GroupSummary {
                    name: g.name.clone(),
                    uri: String::new(),
                })
                .collect()
        });
        async move { Ok(groups) }.boxed()
    }

    fn get_group<'a>(&'a self, name: &'a str) -> BoxFuture<'a, error::Result<Group>> {
        let found = self.read(format!("get_group {name}"), |s| s.groups.iter().find(|g| g.name == name).cloned());
        async move { found.ok_or_else(|| not_found("group")) }.boxed()
    }

    fn list_repos<'a>(&'a self, kind: &'a str) -> BoxFuture<'a, error::Result<Vec<RepoSummary>>> {
        let repos = self.read(format!("list_repos {kind}"), |s| {
            s.repos
                .iter()
                .filter(|r| kind.is_empty() || r.kind.eq_ignore_ascii_case(kind))
                .cloned()
                .collect()
        });
        async move { Ok(repos) }.boxed()
    }

    fn get_repo<'a>(&'a self, key: &'a str) -> BoxFuture<'a, error::Result<RepoConfig>> {
        let found = self.read(format!("get_repo {key}"), |s| s.repo.clone().filter(|r| r.base().key == key));
        async move { found.ok_or_else(|| not_found("repository")) }.boxed()
    }

    fn get_permission_target<'a>(&'a self, name: &'a str) -> BoxFuture<'a, error::Result<PermissionTarget>> {
        let found = self.read(format!("get_permission_target {name}"), |s| {
            s.permission.clone().filter(|p| p.name == name)
        });
        async move { found.ok_or_else(|| not_found("permission target")) }.boxed()
    }

    fn license(&self) -> BoxFuture<'_, error::Result<License>> {
        let license = self.read("license", |s| s.license.clone());
        async move { Ok(license) }.boxed()
    }

    fn encrypted_password(&self) -> BoxFuture<'_, error::Result<String>> {
        self.read("encrypted_password", |_| ());
        async move { Ok("AP6xLm2k9vS".to_string()) }.boxed()
    }

    fn create_api_key(&self) -> BoxFuture<'_, error::Result<ApiKey>> {
        self.read("create_api_key", |_| ());
        async move {
            Ok(ApiKey {
                api_key: "AKCp5btEqk".into(),
            })
        }
        .boxed()
    }

    fn deploy<'a>(&'a self, request: &'a DeployRequest) -> BoxFuture<'a, error::Result<FileInfo>> {
        self.read(format!("deploy {}/{}", request.repo, request.path), |s| {
            s.deployed = Some(request.clone());
        });
        let info = FileInfo {
            repo: request.repo.clone(),
            path: format!("/{}", request.path.trim_start_matches('/')),
            size: request.content.len().to_string(),
            ..FileInfo::default()
        };
        async move { Ok(info) }.boxed()
    }

    fn list_files<'a>(&'a self, repo: &'a str, path: &'a str, deep: bool) -> BoxFuture<'a, error::Result<FileList>> {
        let files = self.read(format!("list_files {repo} {path} deep={deep}"), |s| s.files.clone());
        async move { Ok(files) }.boxed()
    }

    fn docker_search<'a>(&'a self, image: &'a str) -> BoxFuture<'a, error::Result<Vec<DockerImage>>> {
        let images = self.read(format!("docker_search {image}"), |s| s.images.clone());
        async move { Ok(images) }.boxed()
    }

    fn vagrant_search<'a>(&'a self, name: &'a str, provider: &'a str) -> BoxFuture<'a, error::Result<Vec<VagrantBox>>> {
        let boxes = self.read(format!("vagrant_search {name} {provider}"), |s| s.boxes.clone());
        async move { Ok(boxes) }.boxed()
    }

    fn search_gavc<'a>(&'a self, query: &'a GavcQuery) -> BoxFuture<'a, error::Result<Vec<FileInfo>>> {
        let hits = self.read("search_gavc", |s| {
            s.searched = Some(query.clone());
            s.hits.clone()
        });
        async move { Ok(hits) }.boxed()
    }
}
