//! Account profile and SSH key administration.

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::client::{ClientConfig, HttpClient};
use crate::error::Result;

/// Account profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// UUID.
    #[serde(default)]
    pub id: String,
    /// Login name.
    #[serde(default)]
    pub login: String,
    /// Email.
    #[serde(default)]
    pub email: String,
    /// Company.
    #[serde(default)]
    pub company_name: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Postal code.
    #[serde(default)]
    pub postal_code: String,
    /// City.
    #[serde(default)]
    pub city: String,
    /// State or province.
    #[serde(default)]
    pub state: String,
    /// Country.
    #[serde(default)]
    pub country: String,
    /// Phone number.
    #[serde(default)]
    pub phone: String,
    /// Whether Triton CNS is enabled.
    #[serde(rename = "triton_cns_enabled", default)]
    pub cns_enabled: bool,
    /// Creation time.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
}

/// Fields to change on the account; empty strings and `None` are left
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateAccountInput {
    /// Email.
    pub email: String,
    /// Company.
    pub company_name: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Street address.
    pub address: String,
    /// Postal code.
    pub postal_code: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Country.
    pub country: String,
    /// Phone number.
    pub phone: String,
    /// Triton CNS toggle.
    pub cns_enabled: Option<bool>,
}

impl UpdateAccountInput {
    /// Request body containing only the fields that were given.
    #[must_use]
    pub fn to_body(&self) -> Json {
        let mut body = Map::new();
        for (key, value) in [
            ("email", &self.email),
            ("companyName", &self.company_name),
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("address", &self.address),
            ("postalCode", &self.postal_code),
            ("city", &self.city),
            ("state", &self.state),
            ("country", &self.country),
            ("phone", &self.phone),
        ] {
            if !value.is_empty() {
                body.insert(key.to_string(), Json::from(value.clone()));
            }
        }
        if let Some(enabled) = self.cns_enabled {
            body.insert("triton_cns_enabled".into(), Json::Bool(enabled));
        }
        Json::Object(body)
    }

    /// Whether no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_body().as_object().is_none_or(Map::is_empty)
    }
}

/// An SSH public key registered with the account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    /// Key name.
    #[serde(default)]
    pub name: String,
    /// MD5 fingerprint.
    #[serde(default)]
    pub fingerprint: String,
    /// OpenSSH public key text.
    #[serde(default)]
    pub key: String,
}

/// Account operations.
pub trait AccountApi: Send + Sync {
    /// Fetches the account profile.
    fn get_account(&self) -> BoxFuture<'_, Result<Account>>;

    /// Updates profile fields and returns the new profile.
    fn update_account<'a>(&'a self, input: &'a UpdateAccountInput) -> BoxFuture<'a, Result<Account>>;

    /// Lists SSH keys.
    fn list_keys(&self) -> BoxFuture<'_, Result<Vec<Key>>>;

    /// Fetches one key by name or fingerprint.
    fn get_key<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Key>>;

    /// Deletes one key by name or fingerprint.
    fn delete_key<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Uploads a new public key.
    fn create_key<'a>(&'a self, name: &'a str, public_key: &'a str) -> BoxFuture<'a, Result<Key>>;
}

/// CloudAPI-backed [`AccountApi`].
#[derive(Debug, Clone)]
pub struct AccountClient {
    http: HttpClient,
}

impl AccountClient {
    /// Creates a client.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    fn path(&self, rest: &str) -> String {
        format!("/{}{rest}", self.http.account())
    }
}

impl AccountApi for AccountClient {
    fn get_account(&self) -> BoxFuture<'_, Result<Account>> {
        async move { self.http.get_json(&self.path(""), &[]).await }.boxed()
    }

    fn update_account<'a>(&'a self, input: &'a UpdateAccountInput) -> BoxFuture<'a, Result<Account>> {
        async move { self.http.post_json(&self.path(""), &[], &input.to_body()).await }.boxed()
    }

    fn list_keys(&self) -> BoxFuture<'_, Result<Vec<Key>>> {
        async move { self.http.get_json(&self.path("/keys"), &[]).await }.boxed()
    }

    fn get_key<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Key>> {
        async move { self.http.get_json(&self.path(&format!("/keys/{name}")), &[]).await }.boxed()
    }

    fn delete_key<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<()>> {
        async move { self.http.delete(&self.path(&format!("/keys/{name}"))).await }.boxed()
    }

    fn create_key<'a>(&'a self, name: &'a str, public_key: &'a str) -> BoxFuture<'a, Result<Key>> {
        async move {
            let body = serde_json::json!({ "name": name, "key": public_key });
            self.http.post_json(&self.path("/keys"), &[], &body).await
        }
        .boxed()
    }
}
