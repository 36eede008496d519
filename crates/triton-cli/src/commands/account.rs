//! `triton account {get,update}`.

use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use triton_kernel::{
    CliError, Command, CommandNode, ConfigSource, ConfigStore, Context, Declarations, Flag, Result,
    SetupError,
};
use triton_sdk::UpdateAccountInput;

use super::remote;
use crate::clients::Clients;
use crate::keys;
use crate::output::account_view;

/// Builds the `account` subtree.
pub fn node(clients: &Rc<dyn Clients>) -> CommandNode {
    CommandNode::group("account")
        .short("Account information")
        .long("View and update the Triton account profile.")
        .child(
            CommandNode::new("get", AccountGet { clients: Rc::clone(clients) })
                .short("Show account details")
                .example("  triton account get"),
        )
        .child(
            CommandNode::new("update", AccountUpdate { clients: Rc::clone(clients) })
                .short("Update account details")
                .example("  triton account update --email ops@example.com --phone 555-0100"),
        )
}

/// Shows the account profile.
pub struct AccountGet {
    clients: Rc<dyn Clients>,
}

impl Command for AccountGet {
    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let api = self.clients.account(config)?;
            let account = api.get_account().await.map_err(remote)?;
            ctx.write(&account_view(&account, config.get_bool(keys::UTC)?).to_string());
            Ok(())
        }
        .boxed_local()
    }
}

const PROFILE_FLAGS: [(&str, &str, &str); 10] = [
    (keys::ACCOUNT_EMAIL, "email", "Email address"),
    (keys::ACCOUNT_COMPANY_NAME, "company-name", "Company name"),
    (keys::ACCOUNT_FIRST_NAME, "first-name", "First name"),
    (keys::ACCOUNT_LAST_NAME, "last-name", "Last name"),
    (keys::ACCOUNT_ADDRESS, "address", "Street address"),
    (keys::ACCOUNT_POSTCODE, "postal-code", "Postal code"),
    (keys::ACCOUNT_CITY, "city", "City"),
    (keys::ACCOUNT_STATE, "state", "State or province"),
    (keys::ACCOUNT_COUNTRY, "country", "Country"),
    (keys::ACCOUNT_PHONE, "phone", "Phone number"),
];

/// Updates profile fields given on the command line.
pub struct AccountUpdate {
    clients: Rc<dyn Clients>,
}

fn update_input(config: &ConfigStore) -> Result<UpdateAccountInput> {
    let cns = match config.source(keys::ACCOUNT_CNS_ENABLED) {
        Some(ConfigSource::Default) | None => None,
        Some(_) => Some(config.get_bool(keys::ACCOUNT_CNS_ENABLED)?),
    };
    Ok(UpdateAccountInput {
        email: config.get_string(keys::ACCOUNT_EMAIL)?,
        company_name: config.get_string(keys::ACCOUNT_COMPANY_NAME)?,
        first_name: config.get_string(keys::ACCOUNT_FIRST_NAME)?,
        last_name: config.get_string(keys::ACCOUNT_LAST_NAME)?,
        address: config.get_string(keys::ACCOUNT_ADDRESS)?,
        postal_code: config.get_string(keys::ACCOUNT_POSTCODE)?,
        city: config.get_string(keys::ACCOUNT_CITY)?,
        state: config.get_string(keys::ACCOUNT_STATE)?,
        country: config.get_string(keys::ACCOUNT_COUNTRY)?,
        phone: config.get_string(keys::ACCOUNT_PHONE)?,
        cns_enabled: cns,
    })
}

impl Command for AccountUpdate {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        for (key, long, help) in PROFILE_FLAGS {
            decl.bind_flag(key, Flag::string(long).help(help))?;
        }
        decl.bind_flag(
            keys::ACCOUNT_CNS_ENABLED,
            Flag::bool("triton-cns-enabled").help("Enable Triton CNS"),
        )
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        if update_input(ctx.config())?.is_empty() {
            return Err(CliError::validation("at least one account field must be specified"));
        }
        Ok(())
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let input = update_input(config)?;
            let api = self.clients.account(config)?;
            let account = api.update_account(&input).await.map_err(remote)?;
            ctx.println(format!("Updated account \"{}\"", account.login));
            Ok(())
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use crate::app;
    use crate::commands::stub::{Stub, run};
    use crate::keys::TRITON_NAMESPACE;
    use triton_sdk::Account;

    fn stub() -> Stub {
        Stub::new().with(|s| {
            s.account = Account {
                id: "cc71f8bb".into(),
                login: "acme".into(),
                email: "old@acme.test".into(),
                ..Account::default()
            };
        })
    }

    #[tokio::test]
    async fn get_renders_profile() {
        let stub = stub();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);
        let (code, term) = run(&d, &["triton", "account", "get", "--utc"]).await;
        assert_eq!(code, 0, "{}", term.errors());
        assert!(term.output().starts_with("id: cc71f8bb\nlogin: acme\nemail: old@acme.test\n"));
        assert!(term.output().contains("triton_cns_enabled: false\n"));
    }

    #[tokio::test]
    async fn update_sends_only_given_fields() {
        let stub = stub();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);
        let (code, term) = run(
            &d,
            &["triton", "account", "update", "--email", "new@acme.test", "--triton-cns-enabled=false"],
        )
        .await;
        assert_eq!(code, 0, "{}", term.errors());
        assert_eq!(term.output(), "Updated account \"acme\"\n");
        let state = stub.state();
        let sent = state.updated.as_ref().unwrap();
        assert_eq!(sent.email, "new@acme.test");
        assert_eq!(sent.cns_enabled, Some(false));
        assert!(sent.phone.is_empty());
    }

    #[tokio::test]
    async fn update_without_fields_is_rejected() {
        let stub = stub();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);
        let (code, term) = run(&d, &["triton", "account", "update"]).await;
        assert_eq!(code, 1);
        assert!(term.errors().starts_with("Error: at least one account field must be specified\n"));
        assert!(stub.calls().is_empty());
    }
}
