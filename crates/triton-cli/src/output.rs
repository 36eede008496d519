//! Rendering of SDK records as tables, key/value views and JSON.

use std::collections::HashMap;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use triton_kernel::{CliError, KeyValues, Result, Table};
use triton_sdk::{Account, Endpoint, Image, Instance, Key, Package};

/// Length of the abbreviated instance id.
pub const SHORT_ID_LEN: usize = 8;

/// First eight characters of an id.
#[must_use]
pub fn short_id(id: &str) -> &str {
    id.char_indices().nth(SHORT_ID_LEN).map_or(id, |(end, _)| &id[..end])
}

/// `D` for Docker, `K` for KVM, `F` for firewalled.
#[must_use]
pub fn instance_flags(instance: &Instance) -> String {
    let mut flags = String::new();
    if instance.docker {
        flags.push('D');
    }
    if instance.brand.eq_ignore_ascii_case("kvm") {
        flags.push('K');
    }
    if instance.firewall_enabled {
        flags.push('F');
    }
    flags
}

/// Formats a timestamp in UTC or local time.
#[must_use]
pub fn format_time(at: Option<DateTime<Utc>>, utc: bool) -> String {
    match at {
        None => String::new(),
        Some(at) if utc => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        Some(at) => at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S %:z").to_string(),
    }
}

/// Coarse age such as `3d`, `5h`, `12m` or `40s`.
#[must_use]
pub fn age(created: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(created) = created else {
        return String::new();
    };
    let secs = (now - created).num_seconds().max(0);
    match secs {
        s if s >= 365 * 86_400 => format!("{}y", s / (365 * 86_400)),
        s if s >= 7 * 86_400 => format!("{}w", s / (7 * 86_400)),
        s if s >= 86_400 => format!("{}d", s / 86_400),
        s if s >= 3_600 => format!("{}h", s / 3_600),
        s if s >= 60 => format!("{}m", s / 60),
        s => format!("{s}s"),
    }
}

/// Serializes `value` as JSON indented by four spaces.
pub fn pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut ser)
        .map_err(|e| CliError::remote(format!("encoding JSON: {e}")))?;
    String::from_utf8(buf).map_err(|e| CliError::remote(format!("encoding JSON: {e}")))
}

/// Instance listing: `SHORTID NAME IMG STATE FLAGS AGE`.
#[must_use]
pub fn instance_table(instances: &[Instance], images: &[Image], now: DateTime<Utc>) -> Table {
    let names: HashMap<&str, &str> = images
        .iter()
        .map(|img| (img.id.as_str(), img.name.as_str()))
        .collect();
    let mut table = Table::new(["shortid", "name", "img", "state", "flags", "age"]);
    for instance in instances {
        let image = names
            .get(instance.image.as_str())
            .copied()
            .unwrap_or_else(|| short_id(&instance.image));
        table.push_row([
            short_id(&instance.id).to_string(),
            instance.name.clone(),
            image.to_string(),
            instance.state.clone(),
            instance_flags(instance),
            age(instance.created, now),
        ]);
    }
    table
}

fn join_map(map: &std::collections::BTreeMap<String, serde_json::Value>) -> String {
    map.iter()
        .map(|(k, v)| match v {
            serde_json::Value::String(s) => format!("{k}={s}"),
            other => format!("{k}={other}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Single-instance view.
#[must_use]
pub fn instance_view(instance: &Instance, utc: bool) -> KeyValues {
    KeyValues::new()
        .with("id", &instance.id)
        .with("name", &instance.name)
        .with("type", &instance.kind)
        .with("brand", &instance.brand)
        .with("state", &instance.state)
        .with("image", &instance.image)
        .with("package", &instance.package)
        .with("memory", instance.memory)
        .with("disk", instance.disk)
        .with("primaryIp", &instance.primary_ip)
        .with("ips", instance.ips.join(", "))
        .with("networks", instance.networks.join(", "))
        .with("docker", instance.docker)
        .with("firewall_enabled", instance.firewall_enabled)
        .with("compute_node", &instance.compute_node)
        .with("tags", join_map(&instance.tags))
        .with("created", format_time(instance.created, utc))
        .with("updated", format_time(instance.updated, utc))
}

fn raw_time(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.to_rfc3339()).unwrap_or_default()
}

/// Account profile view with raw and formatted timestamps.
#[must_use]
pub fn account_view(account: &Account, utc: bool) -> KeyValues {
    KeyValues::new()
        .with("id", &account.id)
        .with("login", &account.login)
        .with("email", &account.email)
        .with("companyName", &account.company_name)
        .with("firstName", &account.first_name)
        .with("lastName", &account.last_name)
        .with("postalCode", &account.postal_code)
        .with("triton_cns_enabled", account.cns_enabled)
        .with("address", &account.address)
        .with("city", &account.city)
        .with("state", &account.state)
        .with("country", &account.country)
        .with("phone", &account.phone)
        .with(
            "updated",
            format!("{} ({})", raw_time(account.updated), format_time(account.updated, utc)),
        )
        .with(
            "created",
            format!("{} ({})", raw_time(account.created), format_time(account.created, utc)),
        )
}

/// Datacenter or service listing: `NAME URL`.
#[must_use]
pub fn endpoint_table(endpoints: &[Endpoint]) -> Table {
    let mut table = Table::new(["name", "url"]);
    for endpoint in endpoints {
        table.push_row([endpoint.name.clone(), endpoint.url.clone()]);
    }
    table
}

/// Key listing: `NAME FINGERPRINT`.
#[must_use]
pub fn key_table(keys: &[Key]) -> Table {
    let mut table = Table::new(["name", "fingerprint"]);
    for key in keys {
        table.push_row([key.name.clone(), key.fingerprint.clone()]);
    }
    table
}

/// Single-key view.
#[must_use]
pub fn key_view(key: &Key) -> KeyValues {
    KeyValues::new()
        .with("name", &key.name)
        .with("fingerprint", &key.fingerprint)
        .with("key", &key.key)
}

/// Package listing.
#[must_use]
pub fn package_table(packages: &[Package]) -> Table {
    let mut table = Table::new(["shortid", "name", "memory", "disk", "swap", "vcpus", "lwps"]);
    for pkg in packages {
        table.push_row([
            short_id(&pkg.id).to_string(),
            pkg.name.clone(),
            pkg.memory.to_string(),
            pkg.disk.to_string(),
            pkg.swap.to_string(),
            pkg.vcpus.to_string(),
            pkg.lwps.to_string(),
        ]);
    }
    table
}
