//! Artifactory REST client.
//!
//! Credentials come straight from the `ARTIFACTORY_*` environment
//! variables. An access token wins over an API key, which wins over a
//! username and password; with none of them requests are anonymous.

use std::collections::BTreeMap;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tracing::trace;
use triton_kernel::EnvSource;

use crate::error::{ArtifError, Result};
use crate::models::{
    AqlItem, ApiKey, DeployRequest, DockerImage, FileInfo, FileList, GavcQuery, Group,
    GroupSummary, License, PermissionTarget, RepoConfig, RepoSummary, SearchResults,
    ServerVersion, User, UserSummary, VagrantBox,
};

/// Request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying an API key.
pub const API_KEY_HEADER: &str = "X-JFrog-Art-Api";

/// Header carrying the deployed file's SHA-256.
pub const SHA256_HEADER: &str = "X-Checksum-Sha256";

/// `User-Agent` sent by every tool.
#[must_use]
pub fn user_agent() -> String {
    format!("artif-cli/{}", env!("CARGO_PKG_VERSION"))
}

/// Connection settings read from the environment.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Base URL, e.g. `https://acme.jfrog.io/artifactory`.
    pub url: String,
    /// Basic-auth user.
    pub username: String,
    /// Basic-auth password.
    pub password: String,
    /// Bearer access token.
    pub token: String,
    /// API key.
    pub api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    /// Reads `ARTIFACTORY_URL`, `ARTIFACTORY_USERNAME`,
    /// `ARTIFACTORY_PASSWORD`, `ARTIFACTORY_TOKEN` and
    /// `ARTIFACTORY_API_KEY`.
    pub fn from_env(env: &dyn EnvSource) -> Self {
        let var = |name: &str| env.var(name).unwrap_or_default();
        Self {
            url: var("ARTIFACTORY_URL"),
            username: var("ARTIFACTORY_USERNAME"),
            password: var("ARTIFACTORY_PASSWORD"),
            token: var("ARTIFACTORY_TOKEN"),
            api_key: var("ARTIFACTORY_API_KEY"),
        }
    }

    fn auth(&self) -> Auth {
        if !self.token.is_empty() {
            Auth::Token(self.token.clone())
        } else if !self.api_key.is_empty() {
            Auth::ApiKey(self.api_key.clone())
        } else if !self.username.is_empty() {
            Auth::Basic(self.username.clone(), self.password.clone())
        } else {
            Auth::Anonymous
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
enum Auth {
    Anonymous,
    Basic(String, String),
    Token(String),
    ApiKey(String),
}

impl Auth {
    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Anonymous => request,
            Self::Basic(user, password) => request.basic_auth(user, Some(password)),
            Self::Token(token) => request.bearer_auth(token),
            Self::ApiKey(key) => request.header(API_KEY_HEADER, key),
        }
    }
}

/// Hex SHA-256 of `content`.
#[must_use]
pub fn sha256_hex(content: &[u8]) -> String {
    format!("{:x}", Sha256::digest(content))
}

/// Matrix parameters for a deploy path: `;k1=v1;k2=v2`.
#[must_use]
pub fn matrix_params(properties: &BTreeMap<String, String>) -> String {
    let escape = |s: &str| s.replace('%', "%25").replace(';', "%3B").replace('=', "%3D");
    properties
        .iter()
        .map(|(k, v)| format!(";{}={}", escape(k), escape(v)))
        .collect()
}

fn aql_docker(image: &str) -> String {
    format!(
        r#"items.find({{"name":"manifest.json","@docker.repoName":{{"$match":"*{}*"}}}}).include("repo","path","name","modified","modified_by","property")"#,
        aql_escape(image)
    )
}

fn aql_vagrant(name: &str, provider: &str) -> String {
    let mut criteria = format!(r#""@box_name":{{"$match":"*{}*"}}"#, aql_escape(name));
    if !provider.is_empty() {
        criteria.push_str(&format!(r#","@box_provider":"{}""#, aql_escape(provider)));
    }
    format!(r#"items.find({{{criteria}}}).include("repo","path","name","modified","modified_by","property")"#)
}

fn aql_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Operations the tools need from Artifactory.
pub trait ArtifactoryApi: Send + Sync {
    /// Server version and revision.
    fn version(&self) -> BoxFuture<'_, Result<ServerVersion>>;
    /// All users.
    fn list_users(&self) -> BoxFuture<'_, Result<Vec<UserSummary>>>;
    /// One user.
    fn get_user<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<User>>;
    /// Deletes a user, returning the server's message.
    fn delete_user<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<String>>;
    /// All groups.
    fn list_groups(&self) -> BoxFuture<'_, Result<Vec<GroupSummary>>>;
    /// One group.
    fn get_group<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Group>>;
    /// Repositories, optionally of one class.
    fn list_repos<'a>(&'a self, kind: &'a str) -> BoxFuture<'a, Result<Vec<RepoSummary>>>;
    /// One repository's configuration.
    fn get_repo<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<RepoConfig>>;
    /// One permission target.
    fn get_permission_target<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<PermissionTarget>>;
    /// License details.
    fn license(&self) -> BoxFuture<'_, Result<License>>;
    /// The caller's encrypted password.
    fn encrypted_password(&self) -> BoxFuture<'_, Result<String>>;
    /// Generates an API key for the caller.
    fn create_api_key(&self) -> BoxFuture<'_, Result<ApiKey>>;
    /// Uploads a file.
    fn deploy<'a>(&'a self, request: &'a DeployRequest) -> BoxFuture<'a, Result<FileInfo>>;
    /// Lists files under a path.
    fn list_files<'a>(&'a self, repo: &'a str, path: &'a str, deep: bool) -> BoxFuture<'a, Result<FileList>>;
    /// Docker manifests whose repository name matches `image`.
    fn docker_search<'a>(&'a self, image: &'a str) -> BoxFuture<'a, Result<Vec<DockerImage>>>;
    /// Vagrant boxes matching `name` and, when given, `provider`.
    fn vagrant_search<'a>(&'a self, name: &'a str, provider: &'a str) -> BoxFuture<'a, Result<Vec<VagrantBox>>>;
    /// Artifacts matching Maven coordinates.
    fn search_gavc<'a>(&'a self, query: &'a GavcQuery) -> BoxFuture<'a, Result<Vec<FileInfo>>>;
}

/// reqwest-backed [`ArtifactoryApi`].
#[derive(Debug, Clone)]
pub struct ArtifactoryClient {
    http: reqwest::Client,
    base: String,
    auth: Auth,
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Anonymous => "Anonymous",
            Self::Basic(..) => "Basic",
            Self::Token(_) => "Token",
            Self::ApiKey(_) => "ApiKey",
        })
    }
}

impl ArtifactoryClient {
    /// Validates `credentials` and builds the client.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let url = credentials.url.trim();
        if url.is_empty() {
            return Err(ArtifError::config("ARTIFACTORY_URL is required"));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ArtifError::config(format!(
                "ARTIFACTORY_URL \"{url}\" must start with http:// or https://"
            )));
        }
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(user_agent())
            .build()?;
        Ok(Self {
            http,
            base: url.trim_end_matches('/').to_string(),
            auth: credentials.auth(),
        })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base
    }

    async fn send(&self, method: Method, path: &str, build: impl FnOnce(RequestBuilder) -> RequestBuilder) -> Result<Response> {
        let url = format!("{}{path}", self.base);
        trace!(method = method.as_str(), %url, "sending request");
        let request = build(self.auth.apply(self.http.request(method, &url)));
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        Err(ArtifError::from_body(status.as_u16(), &text))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(String, String)]) -> Result<T> {
        let response = self.send(Method::GET, path, |r| r.query(query)).await?;
        decode(response, path).await
    }

    async fn get_text(&self, path: &str) -> Result<String> {
        Ok(self.send(Method::GET, path, |r| r).await?.text().await?)
    }

    async fn aql(&self, query: String) -> Result<Vec<AqlItem>> {
        trace!(%query, "running AQL");
        let response = self
            .send(Method::POST, "/api/search/aql", |r| {
                r.header(CONTENT_TYPE, "text/plain").body(query)
            })
            .await?;
        let results: SearchResults<AqlItem> = decode(response, "AQL results").await?;
        Ok(results.results)
    }
}

async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ArtifError::decode(what, e))
}

fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn storage_path(repo: &str, path: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        format!("/{}", repo.trim_matches('/'))
    } else {
        format!("/{}/{path}", repo.trim_matches('/'))
    }
}

impl ArtifactoryApi for ArtifactoryClient {
    fn version(&self) -> BoxFuture<'_, Result<ServerVersion>> {
        async move { self.get_json("/api/system/version", &[]).await }.boxed()
    }

    fn list_users(&self) -> BoxFuture<'_, Result<Vec<UserSummary>>> {
        async move { self.get_json("/api/security/users", &[]).await }.boxed()
    }

    fn get_user<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<User>> {
        async move { self.get_json(&format!("/api/security/users/{name}"), &[]).await }.boxed()
    }

    fn delete_user<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<String>> {
        async move {
            let path = format!("/api/security/users/{name}");
            Ok(self.send(Method::DELETE, &path, |r| r).await?.text().await?)
        }
        .boxed()
    }

    fn list_groups(&self) -> BoxFuture<'_, Result<Vec<GroupSummary>>> {
        async move { self.get_json("/api/security/groups", &[]).await }.boxed()
    }

    fn get_group<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Group>> {
        async move { self.get_json(&format!("/api/security/groups/{name}"), &[]).await }.boxed()
    }

    fn list_repos<'a>(&'a self, kind: &'a str) -> BoxFuture<'a, Result<Vec<RepoSummary>>> {
        async move {
            let query = if kind.is_empty() {
                Vec::new()
            } else {
                vec![("type".to_string(), kind.to_string())]
            };
            self.get_json("/api/repositories", &query).await
        }
        .boxed()
    }

    fn get_repo<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<RepoConfig>> {
        async move {
            let response = self
                .send(Method::GET, &format!("/api/repositories/{key}"), |r| r)
                .await?;
            let mime = content_type(response.headers());
            let body = response.bytes().await?;
            RepoConfig::decode(&mime, &body)
        }
        .boxed()
    }

    fn get_permission_target<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<PermissionTarget>> {
        async move {
            self.get_json(&format!("/api/security/permissions/{name}"), &[])
                .await
        }
        .boxed()
    }

    fn license(&self) -> BoxFuture<'_, Result<License>> {
        async move { self.get_json("/api/system/license", &[]).await }.boxed()
    }

    fn encrypted_password(&self) -> BoxFuture<'_, Result<String>> {
        async move { self.get_text("/api/security/encryptedPassword").await }.boxed()
    }

    fn create_api_key(&self) -> BoxFuture<'_, Result<ApiKey>> {
        async move {
            let response = self.send(Method::POST, "/api/security/apiKey", |r| r).await?;
            decode(response, "API key").await
        }
        .boxed()
    }

    fn deploy<'a>(&'a self, request: &'a DeployRequest) -> BoxFuture<'a, Result<FileInfo>> {
        async move {
            let path = format!(
                "{}{}",
                storage_path(&request.repo, &request.path),
                matrix_params(&request.properties)
            );
            let content = request.content.clone();
            let response = self
                .send(Method::PUT, &path, |r| {
                    r.header(SHA256_HEADER, &request.sha256).body(content)
                })
                .await?;
            decode(response, "deploy result").await
        }
        .boxed()
    }

    fn list_files<'a>(&'a self, repo: &'a str, path: &'a str, deep: bool) -> BoxFuture<'a, Result<FileList>> {
        async move {
            let mut query = vec![("list".to_string(), String::new())];
            if deep {
                query.push(("deep".to_string(), "1".to_string()));
            }
            let path = format!("/api/storage{}", storage_path(repo, path));
            self.get_json(&path, &query).await
        }
        .boxed()
    }

    fn docker_search<'a>(&'a self, image: &'a str) -> BoxFuture<'a, Result<Vec<DockerImage>>> {
        async move {
            let items = self.aql(aql_docker(image)).await?;
            Ok(items.into_iter().map(DockerImage::from).collect())
        }
        .boxed()
    }

    fn vagrant_search<'a>(&'a self, name: &'a str, provider: &'a str) -> BoxFuture<'a, Result<Vec<VagrantBox>>> {
        async move {
            let items = self.aql(aql_vagrant(name, provider)).await?;
            Ok(items.into_iter().map(VagrantBox::from).collect())
        }
        .boxed()
    }

    fn search_gavc<'a>(&'a self, query: &'a GavcQuery) -> BoxFuture<'a, Result<Vec<FileInfo>>> {
        async move {
            let response = self
                .send(Method::GET, "/api/search/gavc", |r| {
                    r.query(&query.query()).header("X-Result-Detail", "info")
                })
                .await?;
            let results: SearchResults<FileInfo> = decode(response, "GAVC results").await?;
            Ok(results.results)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn credentials_come_from_environment() {
        let creds = Credentials::from_env(&env(&[
            ("ARTIFACTORY_URL", "https://acme.jfrog.io/artifactory/"),
            ("ARTIFACTORY_USERNAME", "ci"),
            ("ARTIFACTORY_PASSWORD", "hunter2"),
        ]));
        assert_eq!(creds.username, "ci");
        assert_eq!(creds.auth(), Auth::Basic("ci".into(), "hunter2".into()));
        let client = ArtifactoryClient::new(&creds).unwrap();
        assert_eq!(client.base_url(), "https://acme.jfrog.io/artifactory");
        assert!(!format!("{creds:?}").contains("hunter2"));
    }

    #[test]
    fn token_wins_over_other_schemes() {
        let creds = Credentials::from_env(&env(&[
            ("ARTIFACTORY_TOKEN", "t0k"),
            ("ARTIFACTORY_API_KEY", "k3y"),
            ("ARTIFACTORY_USERNAME", "ci"),
        ]));
        assert_eq!(creds.auth(), Auth::Token("t0k".into()));
        let creds = Credentials {
            api_key: "k3y".into(),
            ..Credentials::default()
        };
        assert_eq!(creds.auth(), Auth::ApiKey("k3y".into()));
        assert_eq!(Credentials::default().auth(), Auth::Anonymous);
    }

    #[test]
    fn url_is_required() {
        let err = ArtifactoryClient::new(&Credentials::default()).unwrap_err();
        assert_eq!(err.to_string(), "ARTIFACTORY_URL is required");
        let creds = Credentials {
            url: "acme.jfrog.io".into(),
            ..Credentials::default()
        };
        assert!(ArtifactoryClient::new(&creds).is_err());
    }

    #[test]
    fn sha256_is_lower_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn matrix_params_escape_separators() {
        let props = BTreeMap::from([
            ("build.number".to_string(), "42".to_string()),
            ("note".to_string(), "a=b;c".to_string()),
        ]);
        assert_eq!(matrix_params(&props), ";build.number=42;note=a%3Db%3Bc");
    }

    #[test]
    fn storage_paths_are_normalized() {
        assert_eq!(storage_path("libs", "/org/acme/"), "/libs/org/acme");
        assert_eq!(storage_path("libs", ""), "/libs");
    }

    #[test]
    fn aql_queries_quote_input() {
        assert_eq!(
            aql_docker("web"),
            r#"items.find({"name":"manifest.json","@docker.repoName":{"$match":"*web*"}}).include("repo","path","name","modified","modified_by","property")"#
        );
        assert!(aql_vagrant("cent\"os", "virtualbox").contains(r#""@box_name":{"$match":"*cent\"os*"},"@box_provider":"virtualbox""#));
    }
}
