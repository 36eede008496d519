//! Terminal renderings of Artifactory payloads.

use triton_kernel::{KeyValues, Table};

use crate::models::{
    DockerImage, FileInfo, FileList, Group, GroupSummary, License, PermissionTarget, RepoConfig,
    RepoSummary, ServerVersion, User, UserSummary, VagrantBox,
};

/// Shown when an image carries no description label.
pub const NO_DESCRIPTION: &str = "no description";

const LABEL_PREFIX: &str = "docker.label.";

fn yes_no(flag: bool) -> &'static str {
    if flag { "true" } else { "false" }
}

/// `version` and `revision` of the server.
#[must_use]
pub fn version_view(version: &ServerVersion) -> KeyValues {
    let mut view = KeyValues::new()
        .with("version", &version.version)
        .with("revision", &version.revision);
    if !version.addons.is_empty() {
        view.push("addons", version.addons.join(", "));
    }
    view
}

/// User listing: `NAME REALM URI`.
#[must_use]
pub fn user_table(users: &[UserSummary]) -> Table {
    let mut table = Table::new(["name", "realm", "uri"]);
    for user in users {
        table.push_row([user.name.clone(), user.realm.clone(), user.uri.clone()]);
    }
    table
}

/// One user.
#[must_use]
pub fn user_view(user: &User) -> KeyValues {
    KeyValues::new()
        .with("name", &user.name)
        .with("email", &user.email)
        .with("admin", yes_no(user.admin))
        .with("realm", &user.realm)
        .with("groups", user.groups.join(", "))
        .with("last logged in", &user.last_logged_in)
        .with("profile updatable", yes_no(user.profile_updatable))
        .with("disable ui access", yes_no(user.disable_ui_access))
        .with("internal password disabled", yes_no(user.internal_password_disabled))
}

/// Group listing: `NAME URI`.
#[must_use]
pub fn group_table(groups: &[GroupSummary]) -> Table {
    let mut table = Table::new(["name", "uri"]);
    for group in groups {
        table.push_row([group.name.clone(), group.uri.clone()]);
    }
    table
}

/// One group.
#[must_use]
pub fn group_view(group: &Group) -> KeyValues {
    KeyValues::new()
        .with("name", &group.name)
        .with("description", &group.description)
        .with("auto join", yes_no(group.auto_join))
        .with("realm", &group.realm)
        .with("admin privileges", yes_no(group.admin_privileges))
}

/// Repository listing: `KEY TYPE PACKAGE TYPE URL DESCRIPTION`.
#[must_use]
pub fn repo_table(repos: &[RepoSummary]) -> Table {
    let mut table = Table::new(["key", "type", "package type", "url", "description"]);
    for repo in repos {
        table.push_row([
            repo.key.clone(),
            repo.kind.clone(),
            repo.package_type.clone(),
            repo.url.clone(),
            repo.description.clone(),
        ]);
    }
    table
}

/// One repository: the columns every class shares, then `URL` for
/// remote, `LAYOUT` for local or `REPOSITORIES` for virtual ones.
#[must_use]
pub fn repo_view(repo: &RepoConfig) -> Table {
    let base = repo.base();
    let mut header = vec![
        "Key",
        "Type",
        "PackageType",
        "Description",
        "Notes",
        "Blacked Out?",
        "Releases?",
        "Snapshots?",
        "Excludes",
        "Includes",
    ];
    let mut row = vec![
        base.key.clone(),
        base.rclass.clone(),
        base.package_type.clone(),
        base.description.clone(),
        base.notes.clone(),
        yes_no(base.blacked_out).to_string(),
        yes_no(base.handle_releases).to_string(),
        yes_no(base.handle_snapshots).to_string(),
        base.excludes_pattern.clone(),
        base.includes_pattern.clone(),
    ];
    match repo {
        RepoConfig::Remote(r) => {
            header.push("Url");
            row.push(r.url.clone());
        }
        RepoConfig::Local(r) => {
            header.push("Layout");
            row.push(r.repo_layout_ref.clone());
        }
        RepoConfig::Virtual(r) => {
            header.push("Repositories");
            row.push(r.repositories.join("\n"));
        }
    }
    let mut table = Table::new(header);
    table.push_row(row);
    table
}

/// A permission target: its patterns, then one row per principal.
#[must_use]
pub fn permission_view(target: &PermissionTarget) -> String {
    let summary = KeyValues::new()
        .with("name", &target.name)
        .with("includes", &target.includes_pattern)
        .with("excludes", &target.excludes_pattern)
        .with("repositories", target.repositories.join(", "));
    let mut table = Table::new(["principal", "kind", "permissions"]);
    for (kind, principals) in [("user", &target.principals.users), ("group", &target.principals.groups)] {
        for (name, perms) in principals {
            table.push_row([name.clone(), kind.to_string(), perms.join(",")]);
        }
    }
    format!("{summary}\n{table}")
}

/// License details.
#[must_use]
pub fn license_view(license: &License) -> KeyValues {
    KeyValues::new()
        .with("type", &license.kind)
        .with("valid through", &license.valid_through)
        .with("licensed to", &license.licensed_to)
}

/// File metadata, as printed after a deploy and by GAVC search.
#[must_use]
pub fn file_view(file: &FileInfo) -> KeyValues {
    let location = if file.path.is_empty() {
        file.uri.clone()
    } else {
        file.path.clone()
    };
    KeyValues::new()
        .with("file", location)
        .with("repo", &file.repo)
        .with("url", &file.download_uri)
        .with("created", &file.created)
        .with("last modified", &file.last_modified)
        .with("last updated", &file.last_updated)
        .with("sha1", &file.checksums.sha1)
        .with("md5", &file.checksums.md5)
        .with("sha256", &file.checksums.sha256)
        .with("size", &file.size)
}

/// Search hits, one [`file_view`] block per file separated by blank lines.
#[must_use]
pub fn file_views(files: &[FileInfo]) -> String {
    files
        .iter()
        .map(|f| file_view(f).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Folder listing: `URI SIZE LAST MODIFIED SHA1`.
#[must_use]
pub fn file_table(list: &FileList) -> Table {
    let mut table = Table::new(["uri", "size", "last modified", "sha1"]);
    for file in &list.files {
        let size = if file.folder {
            "-".to_string()
        } else {
            file.size.to_string()
        };
        table.push_row([
            file.uri.clone(),
            size,
            file.last_modified.clone(),
            file.sha1.clone().unwrap_or_default(),
        ]);
    }
    table
}

/// Docker search hits: `NAME DESCRIPTION LAST MODIFIED MODIFIED BY`,
/// plus `LABELS` when asked for.
#[must_use]
pub fn docker_table(images: &[DockerImage], labels: bool) -> Table {
    let mut table = Table::new(["name", "description", "last modified", "modified by"]);
    if labels {
        table.push_column("labels");
    }
    for image in images {
        let prop = |key: &str| image.properties.get(key).cloned().unwrap_or_default();
        let name = format!("{}:{}", prop("docker.repoName"), prop("docker.manifest"));
        let description = image
            .properties
            .get("docker.label.description")
            .cloned()
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());
        let mut row = vec![name, description, image.modified.clone(), image.modified_by.clone()];
        if labels {
            let found: Vec<String> = image
                .properties
                .iter()
                .filter_map(|(k, v)| k.strip_prefix(LABEL_PREFIX).map(|label| format!("{label}={v}")))
                .collect();
            row.push(found.join("\n"));
        }
        table.push_row(row);
    }
    table
}

/// Vagrant search hits: `NAME VERSION PROVIDER REPO PATH`.
#[must_use]
pub fn vagrant_table(boxes: &[VagrantBox]) -> Table {
    let mut table = Table::new(["name", "version", "provider", "repo", "path"]);
    for b in boxes {
        let prop = |key: &str| b.properties.get(key).cloned().unwrap_or_default();
        table.push_row([
            prop("box_name"),
            prop("box_version"),
            prop("box_provider"),
            b.repo.clone(),
            b.path.clone(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::models::{RemoteRepo, RepoBase, VirtualRepo};

    fn image(props: &[(&str, &str)]) -> DockerImage {
        DockerImage {
            repo: "docker-local".into(),
            path: "web/1.2".into(),
            modified: "2024-05-01T10:00:00.000Z".into(),
            modified_by: "ci".into(),
            properties: props
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn docker_name_joins_repo_and_manifest() {
        let images = [
            image(&[
                ("docker.repoName", "web"),
                ("docker.manifest", "1.2"),
                ("docker.label.description", "frontend"),
            ]),
            image(&[("docker.repoName", "db"), ("docker.manifest", "latest")]),
        ];
        let table = docker_table(&images, false);
        assert_eq!(table.header(), ["NAME", "DESCRIPTION", "LAST MODIFIED", "MODIFIED BY"]);
        assert_eq!(table.rows()[0][0], "web:1.2");
        assert_eq!(table.rows()[0][1], "frontend");
        assert_eq!(table.rows()[1][0], "db:latest");
        assert_eq!(table.rows()[1][1], NO_DESCRIPTION);
    }

    #[test]
    fn docker_labels_column_is_optional() {
        let images = [image(&[
            ("docker.repoName", "web"),
            ("docker.manifest", "1.2"),
            ("docker.label.maintainer", "ops"),
            ("docker.label.version", "1.2"),
        ])];
        let table = docker_table(&images, true);
        assert_eq!(table.header().last().map(String::as_str), Some("LABELS"));
        assert_eq!(table.rows()[0][4], "maintainer=ops\nversion=1.2");
    }

    fn base(key: &str, rclass: &str) -> RepoBase {
        RepoBase {
            key: key.into(),
            rclass: rclass.into(),
            package_type: "maven".into(),
            handle_releases: true,
            ..RepoBase::default()
        }
    }

    #[test]
    fn remote_repo_ends_with_url() {
        let repo = RepoConfig::Remote(RemoteRepo {
            base: base("jcenter", "remote"),
            url: "https://jcenter.bintray.com".into(),
        });
        let table = repo_view(&repo);
        assert_eq!(
            table.header(),
            [
                "KEY", "TYPE", "PACKAGETYPE", "DESCRIPTION", "NOTES", "BLACKED OUT?", "RELEASES?",
                "SNAPSHOTS?", "EXCLUDES", "INCLUDES", "URL"
            ]
        );
        let row = &table.rows()[0];
        assert_eq!(row[0], "jcenter");
        assert_eq!(row[6], "true");
        assert_eq!(row[10], "https://jcenter.bintray.com");
    }

    #[test]
    fn virtual_repo_lists_members_on_separate_lines() {
        let repo = RepoConfig::Virtual(VirtualRepo {
            base: base("all", "virtual"),
            repositories: vec!["libs".into(), "jcenter".into()],
        });
        let table = repo_view(&repo);
        assert_eq!(table.header().last().map(String::as_str), Some("REPOSITORIES"));
        assert_eq!(table.rows()[0][10], "libs\njcenter");
        assert_eq!(table.to_string().lines().count(), 3);
    }

    #[test]
    fn gavc_hits_are_separated_by_blank_lines() {
        let file = FileInfo {
            path: "/org/acme/app/1.0/app-1.0.jar".into(),
            repo: "libs".into(),
            size: "1024".into(),
            ..FileInfo::default()
        };
        let out = file_views(&[file.clone(), file]);
        assert!(out.starts_with("file: /org/acme/app/1.0/app-1.0.jar\nrepo: libs\n"));
        assert_eq!(out.matches("size: 1024\n").count(), 2);
        assert!(out.contains("size: 1024\n\nfile: "));
    }

    #[test]
    fn permission_principals_are_tabulated() {
        let mut target = PermissionTarget {
            name: "deployers".into(),
            repositories: vec!["libs".into()],
            ..PermissionTarget::default()
        };
        target
            .principals
            .groups
            .insert("ci".into(), vec!["r".into(), "w".into()]);
        let out = permission_view(&target);
        assert!(out.starts_with("name: deployers\n"));
        assert!(out.contains("| ci         group  r,w         |"));
    }
}
