//! Cross-flag validation helpers for `pre_run` hooks.

use crate::config::ConfigStore;
use crate::error::{CliError, Result};

/// Requires exactly one of two string keys to be non-empty.
///
/// Each pair is `(key, flag name)`; the flag name appears in the message.
pub fn exactly_one_of(
    config: &ConfigStore,
    first: (&str, &str),
    second: (&str, &str),
) -> Result<()> {
    let has_first = !config.get_string(first.0)?.is_empty();
    let has_second = !config.get_string(second.0)?.is_empty();
    match (has_first, has_second) {
        (false, false) => Err(CliError::validation(format!(
            "Either `{}` or `{}` must be specified",
            first.1, second.1
        ))),
        (true, true) => Err(CliError::validation(format!(
            "Only 1 of `{}` or `{}` must be specified",
            first.1, second.1
        ))),
        _ => Ok(()),
    }
}

/// Requires a string key to be non-empty.
pub fn required(config: &ConfigStore, key: &str, flag: &str) -> Result<()> {
    if config.get_string(key)?.is_empty() {
        return Err(CliError::validation(format!("`{flag}` must be specified")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KeySpec, Namespace};
    use crate::value::ValueKind;
    use test_case::test_case;

    const NS: Namespace = &[
        KeySpec::new("compute.instance.id", ValueKind::String),
        KeySpec::new("compute.instance.name", ValueKind::String),
    ];

    fn store(id: &str, name: &str) -> ConfigStore {
        let mut store = ConfigStore::new(NS);
        store.set("compute.instance.id", id).unwrap();
        store.set("compute.instance.name", name).unwrap();
        store
    }

    #[test_case("", "", Some("Either `id` or `name` must be specified"); "neither")]
    #[test_case("abc", "", None; "id only")]
    #[test_case("", "web", None; "name only")]
    #[test_case("abc", "web", Some("Only 1 of `id` or `name` must be specified"); "both")]
    fn identity_pair(id: &str, name: &str, expected: Option<&str>) {
        let result = exactly_one_of(
            &store(id, name),
            ("compute.instance.id", "id"),
            ("compute.instance.name", "name"),
        );
        match expected {
            None => assert!(result.is_ok()),
            Some(message) => {
                let err = result.unwrap_err();
                assert!(err.is_usage_error());
                assert_eq!(err.to_string(), message);
            }
        }
    }

    #[test]
    fn required_key() {
        let store = store("", "web");
        assert!(required(&store, "compute.instance.name", "name").is_ok());
        assert_eq!(
            required(&store, "compute.instance.id", "id")
                .unwrap_err()
                .to_string(),
            "`id` must be specified"
        );
    }
}
