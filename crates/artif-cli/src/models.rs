//! Artifactory REST payloads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ArtifError, Result};

/// `GET /api/system/version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServerVersion {
    /// Release, e.g. `7.77.3`.
    #[serde(default)]
    pub version: String,
    /// Build revision.
    #[serde(default)]
    pub revision: String,
    /// Installed add-ons.
    #[serde(default)]
    pub addons: Vec<String>,
}

/// Entry in the user listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserSummary {
    /// Login.
    pub name: String,
    /// Resource URI.
    #[serde(default)]
    pub uri: String,
    /// Authentication realm.
    #[serde(default)]
    pub realm: String,
}

/// `GET /api/security/users/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Login.
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Administrator flag.
    #[serde(default)]
    pub admin: bool,
    /// Whether the user may edit their profile.
    #[serde(default)]
    pub profile_updatable: bool,
    /// Whether the web UI is disabled for the user.
    #[serde(default, rename = "disableUIAccess")]
    pub disable_ui_access: bool,
    /// Whether the internal password is disabled.
    #[serde(default)]
    pub internal_password_disabled: bool,
    /// Last login timestamp.
    #[serde(default)]
    pub last_logged_in: String,
    /// Authentication realm.
    #[serde(default)]
    pub realm: String,
    /// Group memberships.
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Entry in the group listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GroupSummary {
    /// Group name.
    pub name: String,
    /// Resource URI.
    #[serde(default)]
    pub uri: String,
}

/// `GET /api/security/groups/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Group name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// New users join automatically.
    #[serde(default)]
    pub auto_join: bool,
    /// Authentication realm.
    #[serde(default)]
    pub realm: String,
    /// Members are administrators.
    #[serde(default)]
    pub admin_privileges: bool,
}

/// Entry in the repository listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSummary {
    /// Repository key.
    pub key: String,
    /// `LOCAL`, `REMOTE` or `VIRTUAL`.
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Browse URL.
    #[serde(default)]
    pub url: String,
    /// Package format, e.g. `Maven`.
    #[serde(default)]
    pub package_type: String,
}

/// Repository classes accepted by `GET /api/repositories?type=`.
pub const REPO_TYPES: [&str; 3] = ["local", "remote", "virtual"];

/// Content type of a local repository configuration.
pub const LOCAL_REPO_MIME: &str =
    "application/vnd.org.jfrog.artifactory.repositories.LocalRepositoryConfiguration+json";
/// Content type of a remote repository configuration.
pub const REMOTE_REPO_MIME: &str =
    "application/vnd.org.jfrog.artifactory.repositories.RemoteRepositoryConfiguration+json";
/// Content type of a virtual repository configuration.
pub const VIRTUAL_REPO_MIME: &str =
    "application/vnd.org.jfrog.artifactory.repositories.VirtualRepositoryConfiguration+json";

/// Settings shared by every repository class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoBase {
    /// Repository key.
    pub key: String,
    /// `local`, `remote` or `virtual`.
    #[serde(default)]
    pub rclass: String,
    /// Package format.
    #[serde(default)]
    pub package_type: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Internal notes.
    #[serde(default)]
    pub notes: String,
    /// Temporarily unavailable.
    #[serde(default)]
    pub blacked_out: bool,
    /// Accepts release versions.
    #[serde(default)]
    pub handle_releases: bool,
    /// Accepts snapshot versions.
    #[serde(default)]
    pub handle_snapshots: bool,
    /// Excluded path patterns.
    #[serde(default)]
    pub excludes_pattern: String,
    /// Included path patterns.
    #[serde(default)]
    pub includes_pattern: String,
}

/// A local repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalRepo {
    /// Shared settings.
    #[serde(flatten)]
    pub base: RepoBase,
    /// Layout name, e.g. `maven-2-default`.
    #[serde(default)]
    pub repo_layout_ref: String,
}

/// A caching proxy of another repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RemoteRepo {
    /// Shared settings.
    #[serde(flatten)]
    pub base: RepoBase,
    /// Upstream URL.
    #[serde(default)]
    pub url: String,
}

/// An aggregate over other repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VirtualRepo {
    /// Shared settings.
    #[serde(flatten)]
    pub base: RepoBase,
    /// Member repository keys, in resolution order.
    #[serde(default)]
    pub repositories: Vec<String>,
}

/// `GET /api/repositories/{key}`, one variant per repository class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoConfig {
    /// Local repository.
    Local(LocalRepo),
    /// Remote repository.
    Remote(RemoteRepo),
    /// Virtual repository.
    Virtual(VirtualRepo),
}

impl RepoConfig {
    /// Decodes `body` according to the response content type. When the
    /// content type is generic JSON the `rclass` field decides.
    pub fn decode(content_type: &str, body: &[u8]) -> Result<Self> {
        let mime = content_type.split(';').next().unwrap_or_default().trim();
        let class = match mime {
            LOCAL_REPO_MIME => "local".to_string(),
            REMOTE_REPO_MIME => "remote".to_string(),
            VIRTUAL_REPO_MIME => "virtual".to_string(),
            _ => {
                let base: RepoBase = serde_json::from_slice(body)
                    .map_err(|e| ArtifError::decode("repository", e))?;
                base.rclass.to_ascii_lowercase()
            }
        };
        let decode_err = |e| ArtifError::decode("repository", e);
        match class.as_str() {
            "local" => Ok(Self::Local(serde_json::from_slice(body).map_err(decode_err)?)),
            "remote" => Ok(Self::Remote(serde_json::from_slice(body).map_err(decode_err)?)),
            "virtual" => Ok(Self::Virtual(serde_json::from_slice(body).map_err(decode_err)?)),
            other => Err(ArtifError::config(format!(
                "unsupported repository class \"{other}\" ({mime})"
            ))),
        }
    }

    /// Settings shared by every class.
    #[must_use]
    pub const fn base(&self) -> &RepoBase {
        match self {
            Self::Local(r) => &r.base,
            Self::Remote(r) => &r.base,
            Self::Virtual(r) => &r.base,
        }
    }
}

/// Users and groups granted a permission target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Principals {
    /// User name to permission letters.
    #[serde(default)]
    pub users: BTreeMap<String, Vec<String>>,
    /// Group name to permission letters.
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
}

/// `GET /api/security/permissions/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionTarget {
    /// Target name.
    pub name: String,
    /// Included path patterns.
    #[serde(default)]
    pub includes_pattern: String,
    /// Excluded path patterns.
    #[serde(default)]
    pub excludes_pattern: String,
    /// Repository keys covered.
    #[serde(default)]
    pub repositories: Vec<String>,
    /// Who holds the permissions.
    #[serde(default)]
    pub principals: Principals,
}

/// `GET /api/system/license`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    /// License kind, e.g. `Commercial`.
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Expiry date.
    #[serde(default)]
    pub valid_through: String,
    /// Licensee.
    #[serde(default)]
    pub licensed_to: String,
}

/// `POST /api/security/apiKey`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    /// The generated key.
    pub api_key: String,
}

/// Checksums reported for a stored file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksums {
    /// SHA-1.
    #[serde(default)]
    pub sha1: String,
    /// MD5.
    #[serde(default)]
    pub md5: String,
    /// SHA-256.
    #[serde(default)]
    pub sha256: String,
}

/// File metadata returned by deploys and searches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// Storage API URI.
    #[serde(default)]
    pub uri: String,
    /// Direct download URL.
    #[serde(default)]
    pub download_uri: String,
    /// Repository key.
    #[serde(default)]
    pub repo: String,
    /// Path within the repository.
    #[serde(default)]
    pub path: String,
    /// Creation time.
    #[serde(default)]
    pub created: String,
    /// Creator.
    #[serde(default)]
    pub created_by: String,
    /// Last content change.
    #[serde(default)]
    pub last_modified: String,
    /// Last modifier.
    #[serde(default)]
    pub modified_by: String,
    /// Last metadata change.
    #[serde(default)]
    pub last_updated: String,
    /// Content type.
    #[serde(default)]
    pub mime_type: String,
    /// Size in bytes, as the server formats it.
    #[serde(default)]
    pub size: String,
    /// Checksums.
    #[serde(default)]
    pub checksums: Checksums,
}

/// A file to deploy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployRequest {
    /// Target repository key.
    pub repo: String,
    /// Target path within the repository.
    pub path: String,
    /// Properties attached as matrix parameters.
    pub properties: BTreeMap<String, String>,
    /// File contents.
    pub content: Vec<u8>,
    /// Hex SHA-256 of `content`.
    pub sha256: String,
}

/// One entry of a file listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListEntry {
    /// Path relative to the listed folder.
    pub uri: String,
    /// Size in bytes; `-1` for folders.
    #[serde(default)]
    pub size: i64,
    /// Last change.
    #[serde(default)]
    pub last_modified: String,
    /// Folder flag.
    #[serde(default)]
    pub folder: bool,
    /// SHA-1, absent for folders.
    #[serde(default)]
    pub sha1: Option<String>,
}

/// `GET /api/storage/{repo}/{path}?list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileList {
    /// Listed folder URI.
    #[serde(default)]
    pub uri: String,
    /// Listing time.
    #[serde(default)]
    pub created: String,
    /// Entries.
    #[serde(default)]
    pub files: Vec<FileListEntry>,
}

/// A GAVC search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GavcQuery {
    /// Group id.
    pub group_id: String,
    /// Artifact id.
    pub artifact_id: String,
    /// Version.
    pub version: String,
    /// Classifier.
    pub classifier: String,
    /// Repositories to search; empty for all.
    pub repos: Vec<String>,
}

impl GavcQuery {
    /// Whether no coordinate is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.group_id.is_empty()
            && self.artifact_id.is_empty()
            && self.version.is_empty()
            && self.classifier.is_empty()
    }

    /// Query parameters for `/api/search/gavc`.
    #[must_use]
    pub fn query(&self) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = [
            ("g", &self.group_id),
            ("a", &self.artifact_id),
            ("v", &self.version),
            ("c", &self.classifier),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect();
        if !self.repos.is_empty() {
            query.push(("repos".to_string(), self.repos.join(",")));
        }
        query
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResults<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// A property on an AQL item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AqlProperty {
    /// Property key.
    pub key: String,
    /// Property value.
    #[serde(default)]
    pub value: Option<String>,
}

/// An item returned by an AQL `items.find` query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AqlItem {
    /// Repository key.
    #[serde(default)]
    pub repo: String,
    /// Folder path.
    #[serde(default)]
    pub path: String,
    /// File name.
    #[serde(default)]
    pub name: String,
    /// Last change.
    #[serde(default)]
    pub modified: String,
    /// Last modifier.
    #[serde(default)]
    pub modified_by: String,
    /// Attached properties.
    #[serde(default)]
    pub properties: Vec<AqlProperty>,
}

impl AqlItem {
    /// Properties as a map; repeated keys keep their first value.
    #[must_use]
    pub fn property_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for prop in &self.properties {
            map.entry(prop.key.clone())
                .or_insert_with(|| prop.value.clone().unwrap_or_default());
        }
        map
    }
}

/// A Docker image manifest found by property search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DockerImage {
    /// Repository key.
    pub repo: String,
    /// Path of the manifest's folder.
    pub path: String,
    /// Last change.
    pub modified: String,
    /// Last modifier.
    pub modified_by: String,
    /// `docker.*` properties.
    pub properties: BTreeMap<String, String>,
}

impl From<AqlItem> for DockerImage {
    fn from(item: AqlItem) -> Self {
        Self {
            properties: item.property_map(),
            repo: item.repo,
            path: item.path,
            modified: item.modified,
            modified_by: item.modified_by,
        }
    }
}

/// A Vagrant box found by property search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VagrantBox {
    /// Repository key.
    pub repo: String,
    /// Path to the box file.
    pub path: String,
    /// `box_*` properties.
    pub properties: BTreeMap<String, String>,
}

impl From<AqlItem> for VagrantBox {
    fn from(item: AqlItem) -> Self {
        let path = if item.path.is_empty() || item.path == "." {
            item.name.clone()
        } else {
            format!("{}/{}", item.path, item.name)
        };
        Self {
            properties: item.property_map(),
            repo: item.repo,
            path,
        }
    }
}
