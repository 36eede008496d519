//! Configuration keys recognized by the `artif-*` tools.

use triton_kernel::{KeySpec, Namespace, ValueKind};

/// `text` or `json`.
pub const LOG_FORMAT: &str = "log.format";
/// Filter directive.
pub const LOG_LEVEL: &str = "log.level";
/// Log command timing.
pub const LOG_STATS: &str = "log.stats";
/// ANSI colors in log lines.
pub const LOG_USE_COLOR: &str = "log.use-color";

/// User login.
pub const USER_NAME: &str = "artif.user.name";
/// Group name.
pub const GROUP_NAME: &str = "artif.group.name";
/// Repository key.
pub const REPO_KEY: &str = "artif.repo.key";
/// Repository class filter.
pub const REPO_TYPE: &str = "artif.repo.type";
/// Permission target name.
pub const PERMISSION_NAME: &str = "artif.permission.name";
/// Repository holding the files.
pub const STORAGE_REPO: &str = "artif.storage.repo";
/// Path within the repository.
pub const STORAGE_PATH: &str = "artif.storage.path";
/// Recurse into folders.
pub const STORAGE_DEEP: &str = "artif.storage.deep";
/// Local file to upload.
pub const DEPLOY_FILE: &str = "artif.deploy.file";
/// `key=value` properties to attach.
pub const DEPLOY_PROPERTIES: &str = "artif.deploy.properties";
/// Maven group id.
pub const SEARCH_GROUP_ID: &str = "artif.search.groupid";
/// Maven artifact id.
pub const SEARCH_ARTIFACT_ID: &str = "artif.search.artifactid";
/// Artifact version.
pub const SEARCH_VERSION: &str = "artif.search.version";
/// Artifact classifier.
pub const SEARCH_CLASSIFIER: &str = "artif.search.classifier";
/// Repositories to search.
pub const SEARCH_REPO: &str = "artif.search.repo";
/// Docker image name.
pub const SEARCH_IMAGE: &str = "artif.search.image";
/// Show Docker labels.
pub const SEARCH_LABELS: &str = "artif.search.labels";
/// Vagrant box name.
pub const SEARCH_NAME: &str = "artif.search.name";
/// Vagrant box provider.
pub const SEARCH_PROVIDER: &str = "artif.search.provider";

/// Keys understood by every `artif-*` tool.
pub const ARTIF_NAMESPACE: Namespace = &[
    KeySpec::new(LOG_FORMAT, ValueKind::String),
    KeySpec::new(LOG_LEVEL, ValueKind::String),
    KeySpec::new(LOG_STATS, ValueKind::Bool),
    KeySpec::new(LOG_USE_COLOR, ValueKind::Bool),
    KeySpec::new(USER_NAME, ValueKind::String),
    KeySpec::new(GROUP_NAME, ValueKind::String),
    KeySpec::new(REPO_KEY, ValueKind::String),
    KeySpec::new(REPO_TYPE, ValueKind::String),
    KeySpec::new(PERMISSION_NAME, ValueKind::String),
    KeySpec::new(STORAGE_REPO, ValueKind::String),
    KeySpec::new(STORAGE_PATH, ValueKind::String),
    KeySpec::new(STORAGE_DEEP, ValueKind::Bool),
    KeySpec::new(DEPLOY_FILE, ValueKind::String),
    KeySpec::new(DEPLOY_PROPERTIES, ValueKind::StringMap),
    KeySpec::new(SEARCH_GROUP_ID, ValueKind::String),
    KeySpec::new(SEARCH_ARTIFACT_ID, ValueKind::String),
    KeySpec::new(SEARCH_VERSION, ValueKind::String),
    KeySpec::new(SEARCH_CLASSIFIER, ValueKind::String),
    KeySpec::new(SEARCH_REPO, ValueKind::StringList),
    KeySpec::new(SEARCH_IMAGE, ValueKind::String),
    KeySpec::new(SEARCH_LABELS, ValueKind::Bool),
    KeySpec::new(SEARCH_NAME, ValueKind::String),
    KeySpec::new(SEARCH_PROVIDER, ValueKind::String),
];
