//! Users, groups, permission targets and the caller's credentials.

use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use triton_kernel::validate::required;
use triton_kernel::{Command, CommandNode, Context, Declarations, Flag, Result, SetupError};

use super::remote;
use crate::keys;
use crate::render::{group_table, group_view, permission_view, user_table, user_view};
use crate::tool::{Connector, tool};

/// `artif-list-users`.
pub fn list_users(connector: Rc<dyn Connector>) -> CommandNode {
    tool("artif-list-users", ListUsers { connector }).short("List users")
}

/// `artif-get-user`.
pub fn get_user(connector: Rc<dyn Connector>) -> CommandNode {
    tool("artif-get-user", GetUser { connector })
        .short("Show a user")
        .example("  artif-get-user --name deployer")
}

/// `artif-delete-user`.
pub fn delete_user(connector: Rc<dyn Connector>) -> CommandNode {
    tool("artif-delete-user", DeleteUser { connector })
        .short("Delete a user")
        .example("  artif-delete-user --name deployer")
}

/// `artif-list-groups`.
pub fn list_groups(connector: Rc<dyn Connector>) -> CommandNode {
    tool("artif-list-groups", ListGroups { connector }).short("List groups")
}

/// `artif-get-group`.
pub fn get_group(connector: Rc<dyn Connector>) -> CommandNode {
    tool("artif-get-group", GetGroup { connector })
        .short("Show a group")
        .example("  artif-get-group --name readers")
}

/// `artif-get-permission-target`.
pub fn get_permission_target(connector: Rc<dyn Connector>) -> CommandNode {
    tool("artif-get-permission-target", GetPermissionTarget { connector })
        .short("Show a permission target")
        .example("  artif-get-permission-target --name deployers")
}

/// `artif-get-encrypted-password`.
pub fn get_encrypted_password(connector: Rc<dyn Connector>) -> CommandNode {
    tool("artif-get-encrypted-password", EncryptedPassword { connector })
        .short("Print the caller's encrypted password")
}

/// `artif-create-api-key`.
pub fn create_api_key(connector: Rc<dyn Connector>) -> CommandNode {
    tool("artif-create-api-key", CreateApiKey { connector })
        .short("Generate an API key for the caller")
}

fn declare_name(
    decl: &mut Declarations<'_>,
    key: &'static str,
    help: &'static str,
) -> std::result::Result<(), SetupError> {
    decl.bind_flag(key, Flag::string("name").short('n').help(help))
}

/// Lists users.
pub struct ListUsers {
    connector: Rc<dyn Connector>,
}

impl Command for ListUsers {
    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let api = self.connector.connect()?;
            let users = api.list_users().await.map_err(remote)?;
            ctx.write(&user_table(&users).to_string());
            Ok(())
        }
        .boxed_local()
    }
}

/// Shows one user.
pub struct GetUser {
    connector: Rc<dyn Connector>,
}

impl Command for GetUser {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        declare_name(decl, keys::USER_NAME, "User login")
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        required(ctx.config(), keys::USER_NAME, "name")
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let name = ctx.config().get_string(keys::USER_NAME)?;
            let api = self.connector.connect()?;
            let user = api.get_user(&name).await.map_err(remote)?;
            ctx.write(&user_view(&user).to_string());
            Ok(())
        }
        .boxed_local()
    }
}

/// Deletes one user.
pub struct DeleteUser {
    connector: Rc<dyn Connector>,
}

impl Command for DeleteUser {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        declare_name(decl, keys::USER_NAME, "User login")
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        required(ctx.config(), keys::USER_NAME, "name")
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let name = ctx.config().get_string(keys::USER_NAME)?;
            let api = self.connector.connect()?;
            let message = api.delete_user(&name).await.map_err(remote)?;
            ctx.println(message.trim());
            Ok(())
        }
        .boxed_local()
    }
}

/// Lists groups.
pub struct ListGroups {
    connector: Rc<dyn Connector>,
}

impl Command for ListGroups {
    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let api = self.connector.connect()?;
            let groups = api.list_groups().await.map_err(remote)?;
            ctx.write(&group_table(&groups).to_string());
            Ok(())
        }
        .boxed_local()
    }
}

/// Shows one group.
pub struct GetGroup {
    connector: Rc<dyn Connector>,
}

impl Command for GetGroup {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        declare_name(decl, keys::GROUP_NAME, "Group name")
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        required(ctx.config(), keys::GROUP_NAME, "name")
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let name = ctx.config().get_string(keys::GROUP_NAME)?;
            let api = self.connector.connect()?;
            let group = api.get_group(&name).await.map_err(remote)?;
            ctx.write(&group_view(&group).to_string());
            Ok(())
        }
        .boxed_local()
    }
}

/// Shows one permission target.
pub struct GetPermissionTarget {
    connector: Rc<dyn Connector>,
}

impl Command for GetPermissionTarget {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        declare_name(decl, keys::PERMISSION_NAME, "Permission target name")
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        required(ctx.config(), keys::PERMISSION_NAME, "name")
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let name = ctx.config().get_string(keys::PERMISSION_NAME)?;
            let api = self.connector.connect()?;
            let target = api.get_permission_target(&name).await.map_err(remote)?;
            ctx.write(&permission_view(&target));
            Ok(())
        }
        .boxed_local()
    }
}

/// Prints the caller's encrypted password.
pub struct EncryptedPassword {
    connector: Rc<dyn Connector>,
}

impl Command for EncryptedPassword {
    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let api = self.connector.connect()?;
            let password = api.encrypted_password().await.map_err(remote)?;
            ctx.println(password.trim());
            Ok(())
        }
        .boxed_local()
    }
}

/// Generates and prints an API key.
pub struct CreateApiKey {
    connector: Rc<dyn Connector>,
}

impl Command for CreateApiKey {
    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let api = self.connector.connect()?;
            let key = api.create_api_key().await.map_err(remote)?;
            ctx.println(key.api_key);
            Ok(())
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::stub::{Stub, run};
    use crate::models::{Group, PermissionTarget, User};

    fn stub() -> Stub {
        Stub::new().with(|s| {
            s.users = vec![User {
                name: "deployer".into(),
                email: "ci@acme.test".into(),
                realm: "internal".into(),
                groups: vec!["readers".into(), "deployers".into()],
                ..User::default()
            }];
            s.groups = vec![Group {
                name: "readers".into(),
                description: "Read access".into(),
                auto_join: true,
                ..Group::default()
            }];
        })
    }

    #[tokio::test]
    async fn get_user_requires_name() {
        let stub = stub();
        let d = stub.dispatcher(get_user);
        let (code, term) = run(&d, &["artif-get-user"]).await;
        assert_eq!(code, 1);
        assert!(term.errors().starts_with("Error: `name` must be specified\n"));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn get_user_renders_profile() {
        let stub = stub();
        let d = stub.dispatcher(get_user);
        let (code, term) = run(&d, &["artif-get-user", "-n", "deployer"]).await;
        assert_eq!(code, 0, "{}", term.errors());
        assert!(term.output().starts_with(
            "name: deployer\nemail: ci@acme.test\nadmin: false\nrealm: internal\ngroups: readers, deployers\n"
        ));
    }

    #[tokio::test]
    async fn list_users_renders_table() {
        let stub = stub();
        let d = stub.dispatcher(list_users);
        let (code, term) = run(&d, &["artif-list-users"]).await;
        assert_eq!(code, 0, "{}", term.errors());
        assert!(term.output().starts_with("| NAME      REALM     URI"));
        assert!(term.output().contains("| deployer  internal  https://artifactory/api/security/users/deployer |"));
    }

    #[tokio::test]
    async fn delete_user_prints_server_message() {
        let stub = stub();
        let d = stub.dispatcher(delete_user);
        let (code, term) = run(&d, &["artif-delete-user", "--name", "deployer"]).await;
        assert_eq!(code, 0, "{}", term.errors());
        assert_eq!(term.output(), "The user: 'deployer' has been removed successfully.\n");

        let (code, term) = run(&d, &["artif-delete-user", "--name", "deployer"]).await;
        assert_eq!(code, 1);
        assert_eq!(term.errors(), "Error: 404: user not found\n");
    }

    #[tokio::test]
    async fn group_views() {
        let stub = stub();
        let d = stub.dispatcher(get_group);
        let (code, term) = run(&d, &["artif-get-group", "--name", "readers"]).await;
        assert_eq!(code, 0, "{}", term.errors());
        assert!(term.output().starts_with("name: readers\ndescription: Read access\nauto join: true\n"));

        let d = stub.dispatcher(list_groups);
        let (_, term) = run(&d, &["artif-list-groups"]).await;
        assert!(term.output().contains("| readers"));
    }

    #[tokio::test]
    async fn permission_target_lookup() {
        let stub = Stub::new().with(|s| {
            s.permission = Some(PermissionTarget {
                name: "deployers".into(),
                includes_pattern: "**".into(),
                ..PermissionTarget::default()
            });
        });
        let d = stub.dispatcher(get_permission_target);
        let (code, term) = run(&d, &["artif-get-permission-target", "--name", "deployers"]).await;
        assert_eq!(code, 0, "{}", term.errors());
        assert!(term.output().starts_with("name: deployers\nincludes: **\n"));
        assert_eq!(stub.calls(), ["get_permission_target deployers"]);
    }

    #[tokio::test]
    async fn credential_tools_print_raw_values() {
        let stub = Stub::new();
        let d = stub.dispatcher(get_encrypted_password);
        let (_, term) = run(&d, &["artif-get-encrypted-password"]).await;
        assert_eq!(term.output(), "AP6xLm2k9vS\n");

        let d = stub.dispatcher(create_api_key);
        let (_, term) = run(&d, &["artif-create-api-key"]).await;
        assert_eq!(term.output(), "AKCp5btEqk\n");
        assert_eq!(stub.calls(), ["encrypted_password", "create_api_key"]);
    }
}
