//! Manta object storage directory listing.

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{ClientConfig, HttpClient, header_count};
use crate::error::{Result, SdkError};

/// Header carrying the total number of directory entries.
pub const RESULT_SET_SIZE_HEADER: &str = "result-set-size";

const DIRECTORY_ACCEPT: &str = "application/x-json-stream; type=directory";

/// Top-level directories every account owns.
const ACCOUNT_ROOTS: [&str; 4] = ["stor", "public", "jobs", "reports"];

/// One entry of a directory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Entry name.
    pub name: String,
    /// `directory` or `object`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Last modification time.
    #[serde(default)]
    pub mtime: Option<DateTime<Utc>>,
    /// Object size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Object etag.
    #[serde(default)]
    pub etag: String,
}

/// A directory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDirectoryOutput {
    /// Entries in service order.
    pub entries: Vec<DirectoryEntry>,
    /// Total entry count reported by the service.
    pub result_set_size: u64,
}

/// Storage operations.
pub trait StorageApi: Send + Sync {
    /// Lists the directory at `path`, an absolute Manta path.
    fn list_directory<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<ListDirectoryOutput>>;
}

/// Resolves a user-supplied path against `account`.
///
/// Empty means `/<account>/stor`; `/stor/x` and `stor/x` become
/// `/<account>/stor/x`; paths already rooted at an account are kept.
#[must_use]
pub fn resolve_path(account: &str, path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        return format!("/{account}/stor");
    }
    let first = trimmed.split('/').next().unwrap_or_default();
    if ACCOUNT_ROOTS.contains(&first) {
        format!("/{account}/{trimmed}")
    } else {
        format!("/{trimmed}")
    }
}

/// Decodes a newline-delimited JSON directory body.
pub fn parse_entries(body: &str) -> Result<Vec<DirectoryEntry>> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(|e| SdkError::decode("directory entry", e)))
        .collect()
}

/// Manta-backed [`StorageApi`].
#[derive(Debug, Clone)]
pub struct StorageClient {
    http: HttpClient,
}

impl StorageClient {
    /// Creates a client.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    /// Account the client acts for.
    #[must_use]
    pub fn account(&self) -> &str {
        self.http.account()
    }
}

impl StorageApi for StorageClient {
    fn list_directory<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<ListDirectoryOutput>> {
        async move {
            let response = self
                .http
                .send(Method::GET, path, &[], None, DIRECTORY_ACCEPT)
                .await?;
            let result_set_size = header_count(response.headers(), RESULT_SET_SIZE_HEADER);
            let body = response.text().await?;
            Ok(ListDirectoryOutput {
                entries: parse_entries(&body)?,
                result_set_size,
            })
        }
        .boxed()
    }
}
