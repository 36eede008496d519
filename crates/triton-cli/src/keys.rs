//! Configuration keys recognized by `triton` and `manta`.

use triton_kernel::{KeySpec, Namespace, ValueKind};

/// Triton account login.
pub const TRITON_ACCOUNT: &str = "general.triton.account";
/// CloudAPI endpoint.
pub const TRITON_URL: &str = "general.triton.url";
/// Triton signing key fingerprint.
pub const TRITON_KEY_ID: &str = "general.triton.key-id";
/// Triton signing key, inline PEM or path.
pub const TRITON_KEY_MATERIAL: &str = "general.triton.key-material";

/// Manta account login.
pub const MANTA_ACCOUNT: &str = "general.manta.account";
/// Manta endpoint.
pub const MANTA_URL: &str = "general.manta.url";
/// Manta signing key fingerprint.
pub const MANTA_KEY_ID: &str = "general.manta.key-id";
/// Manta signing key, inline PEM or path.
pub const MANTA_KEY_MATERIAL: &str = "general.manta.key-material";

/// Page output through `$PAGER`.
pub const USE_PAGER: &str = "general.use-pager";
/// Render timestamps in UTC.
pub const UTC: &str = "general.utc";

/// `text` or `json`.
pub const LOG_FORMAT: &str = "log.format";
/// Filter directive.
pub const LOG_LEVEL: &str = "log.level";
/// Log command timing.
pub const LOG_STATS: &str = "log.stats";
/// ANSI colors in log lines.
pub const LOG_USE_COLOR: &str = "log.use-color";

/// Instance UUID.
pub const INSTANCE_ID: &str = "compute.instance.id";
/// Instance alias.
pub const INSTANCE_NAME: &str = "compute.instance.name";
/// Alias prefix for generated names.
pub const INSTANCE_NAME_PREFIX: &str = "compute.instance.name-prefix";
/// Block until the instance settles.
pub const INSTANCE_WAIT: &str = "compute.instance.wait";
/// Enable the cloud firewall.
pub const INSTANCE_FIREWALL: &str = "compute.instance.firewall";
/// State filter.
pub const INSTANCE_STATE: &str = "compute.instance.state";
/// Brand filter.
pub const INSTANCE_BRAND: &str = "compute.instance.brand";
/// Network names or UUIDs.
pub const INSTANCE_NETWORKS: &str = "compute.instance.networks";
/// `key=value` tags to set.
pub const INSTANCE_TAG: &str = "compute.instance.tag";
/// Tags to filter by.
pub const INSTANCE_SEARCH_TAGS: &str = "compute.instance.search-tags";
/// Customer metadata.
pub const INSTANCE_METADATA: &str = "compute.instance.metadata";
/// Affinity rules.
pub const INSTANCE_AFFINITY: &str = "compute.instance.affinity";
/// `user-script` contents.
pub const INSTANCE_USERDATA: &str = "compute.instance.userdata";

/// Package UUID.
pub const PACKAGE_ID: &str = "compute.package.id";
/// Package name.
pub const PACKAGE_NAME: &str = "compute.package.name";
/// Memory filter in MiB.
pub const PACKAGE_MEMORY: &str = "compute.package.memory";
/// Disk filter in MiB.
pub const PACKAGE_DISK: &str = "compute.package.disk";
/// Swap filter in MiB.
pub const PACKAGE_SWAP: &str = "compute.package.swap";
/// vCPU filter.
pub const PACKAGE_VCPU: &str = "compute.package.vcpu";

/// Image UUID.
pub const IMAGE_ID: &str = "compute.image.id";
/// Image name.
pub const IMAGE_NAME: &str = "compute.image.name";

/// Key fingerprint.
pub const KEY_FINGERPRINT: &str = "keys.fingerprint";
/// Key name.
pub const KEY_NAME: &str = "keys.name";
/// OpenSSH public key text or path.
pub const KEY_PUBLIC_KEY: &str = "keys.publickey";

/// Account email.
pub const ACCOUNT_EMAIL: &str = "account.email";
/// Account company.
pub const ACCOUNT_COMPANY_NAME: &str = "account.companyname";
/// Account given name.
pub const ACCOUNT_FIRST_NAME: &str = "account.firstname";
/// Account family name.
pub const ACCOUNT_LAST_NAME: &str = "account.lastname";
/// Account street address.
pub const ACCOUNT_ADDRESS: &str = "account.address";
/// Account postal code.
pub const ACCOUNT_POSTCODE: &str = "account.postcode";
/// Account city.
pub const ACCOUNT_CITY: &str = "account.city";
/// Account state.
pub const ACCOUNT_STATE: &str = "account.state";
/// Account country.
pub const ACCOUNT_COUNTRY: &str = "account.country";
/// Account phone.
pub const ACCOUNT_PHONE: &str = "account.phone";
/// Triton CNS toggle.
pub const ACCOUNT_CNS_ENABLED: &str = "account.triton_cns_enabled";

/// Man page root.
pub const DOC_MAN_DIR: &str = "doc.mandir";
/// Man page section.
pub const DOC_MAN_SECTION: &str = "doc.man-section";
/// Markdown output directory.
pub const DOC_MARKDOWN_DIR: &str = "doc.markdown-dir";
/// Markdown link prefix.
pub const DOC_MARKDOWN_URL_PREFIX: &str = "doc.markdown-url-prefix";

/// Bash completion directory.
pub const BASH_COMPLETION_TARGET: &str = "shell.autocomplete.bash.target";

/// Default man page root.
pub const DEFAULT_MAN_DIR: &str = "./docs/man";
/// Default man page section.
pub const DEFAULT_MAN_SECTION: i64 = 8;
/// Default markdown directory.
pub const DEFAULT_MARKDOWN_DIR: &str = "./docs/md";
/// Default markdown link prefix.
pub const DEFAULT_MARKDOWN_URL_PREFIX: &str = "/command";
/// Default bash completion directory.
pub const DEFAULT_BASH_COMPLETION_TARGET: &str = "/etc/bash_completion.d";

/// Keys understood by `triton`.
pub const TRITON_NAMESPACE: Namespace = &[
    KeySpec::new(TRITON_ACCOUNT, ValueKind::String),
    KeySpec::new(TRITON_URL, ValueKind::String),
    KeySpec::new(TRITON_KEY_ID, ValueKind::String),
    KeySpec::new(TRITON_KEY_MATERIAL, ValueKind::String),
    KeySpec::new(USE_PAGER, ValueKind::Bool),
    KeySpec::new(UTC, ValueKind::Bool),
    KeySpec::new(LOG_FORMAT, ValueKind::String),
    KeySpec::new(LOG_LEVEL, ValueKind::String),
    KeySpec::new(LOG_STATS, ValueKind::Bool),
    KeySpec::new(LOG_USE_COLOR, ValueKind::Bool),
    KeySpec::new(INSTANCE_ID, ValueKind::String),
    KeySpec::new(INSTANCE_NAME, ValueKind::String),
    KeySpec::new(INSTANCE_NAME_PREFIX, ValueKind::String),
    KeySpec::new(INSTANCE_WAIT, ValueKind::Bool),
    KeySpec::new(INSTANCE_FIREWALL, ValueKind::Bool),
    KeySpec::new(INSTANCE_STATE, ValueKind::String),
    KeySpec::new(INSTANCE_BRAND, ValueKind::String),
    KeySpec::new(INSTANCE_NETWORKS, ValueKind::StringList),
    KeySpec::new(INSTANCE_TAG, ValueKind::StringList),
    KeySpec::new(INSTANCE_SEARCH_TAGS, ValueKind::StringMap),
    KeySpec::new(INSTANCE_METADATA, ValueKind::StringMap),
    KeySpec::new(INSTANCE_AFFINITY, ValueKind::StringList),
    KeySpec::new(INSTANCE_USERDATA, ValueKind::String),
    KeySpec::new(PACKAGE_ID, ValueKind::String),
    KeySpec::new(PACKAGE_NAME, ValueKind::String),
    KeySpec::new(PACKAGE_MEMORY, ValueKind::Int),
    KeySpec::new(PACKAGE_DISK, ValueKind::Int),
    KeySpec::new(PACKAGE_SWAP, ValueKind::Int),
    KeySpec::new(PACKAGE_VCPU, ValueKind::Int),
    KeySpec::new(IMAGE_ID, ValueKind::String),
    KeySpec::new(IMAGE_NAME, ValueKind::String),
    KeySpec::new(KEY_FINGERPRINT, ValueKind::String),
    KeySpec::new(KEY_NAME, ValueKind::String),
    KeySpec::new(KEY_PUBLIC_KEY, ValueKind::String),
    KeySpec::new(ACCOUNT_EMAIL, ValueKind::String),
    KeySpec::new(ACCOUNT_COMPANY_NAME, ValueKind::String),
    KeySpec::new(ACCOUNT_FIRST_NAME, ValueKind::String),
    KeySpec::new(ACCOUNT_LAST_NAME, ValueKind::String),
    KeySpec::new(ACCOUNT_ADDRESS, ValueKind::String),
    KeySpec::new(ACCOUNT_POSTCODE, ValueKind::String),
    KeySpec::new(ACCOUNT_CITY, ValueKind::String),
    KeySpec::new(ACCOUNT_STATE, ValueKind::String),
    KeySpec::new(ACCOUNT_COUNTRY, ValueKind::String),
    KeySpec::new(ACCOUNT_PHONE, ValueKind::String),
    KeySpec::new(ACCOUNT_CNS_ENABLED, ValueKind::Bool),
    KeySpec::new(DOC_MAN_DIR, ValueKind::String),
    KeySpec::new(DOC_MAN_SECTION, ValueKind::Int),
    KeySpec::new(DOC_MARKDOWN_DIR, ValueKind::String),
    KeySpec::new(DOC_MARKDOWN_URL_PREFIX, ValueKind::String),
    KeySpec::new(BASH_COMPLETION_TARGET, ValueKind::String),
];

/// Keys understood by `manta`.
pub const MANTA_NAMESPACE: Namespace = &[
    KeySpec::new(MANTA_ACCOUNT, ValueKind::String),
    KeySpec::new(MANTA_URL, ValueKind::String),
    KeySpec::new(MANTA_KEY_ID, ValueKind::String),
    KeySpec::new(MANTA_KEY_MATERIAL, ValueKind::String),
    KeySpec::new(USE_PAGER, ValueKind::Bool),
    KeySpec::new(UTC, ValueKind::Bool),
    KeySpec::new(LOG_FORMAT, ValueKind::String),
    KeySpec::new(LOG_LEVEL, ValueKind::String),
    KeySpec::new(LOG_STATS, ValueKind::Bool),
    KeySpec::new(LOG_USE_COLOR, ValueKind::Bool),
    KeySpec::new(DOC_MAN_DIR, ValueKind::String),
    KeySpec::new(DOC_MAN_SECTION, ValueKind::Int),
    KeySpec::new(DOC_MARKDOWN_DIR, ValueKind::String),
    KeySpec::new(DOC_MARKDOWN_URL_PREFIX, ValueKind::String),
    KeySpec::new(BASH_COMPLETION_TARGET, ValueKind::String),
];
