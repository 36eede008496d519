//! Environment variable lookup.
//!
//! Logical names such as `ACCOUNT` resolve against the `TRITON_` prefix
//! first and the legacy `SDC_` prefix second; the first variable present
//! wins.

use std::collections::HashMap;

/// Prefixes tried, in order, for [`EnvName::Prefixed`] lookups.
pub const ENV_PREFIXES: [&str; 2] = ["TRITON_", "SDC_"];

/// A source of environment variables.
pub trait EnvSource {
    /// Returns the value of `name`, if set.
    fn var(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| (*v).to_string())
    }
}

/// How a configuration key maps to the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvName {
    /// A logical name tried under each of [`ENV_PREFIXES`].
    Prefixed(&'static str),
    /// A variable name used verbatim.
    Exact(&'static str),
}

impl EnvName {
    /// Resolves the variable against `env`.
    pub fn lookup(&self, env: &dyn EnvSource) -> Option<String> {
        match self {
            Self::Prefixed(name) => ENV_PREFIXES
                .iter()
                .find_map(|prefix| env.var(&format!("{prefix}{name}"))),
            Self::Exact(name) => env.var(name),
        }
    }

    /// Variable names consulted, in lookup order.
    #[must_use]
    pub fn candidates(&self) -> Vec<String> {
        match self {
            Self::Prefixed(name) => ENV_PREFIXES
                .iter()
                .map(|prefix| format!("{prefix}{name}"))
                .collect(),
            Self::Exact(name) => vec![(*name).to_string()],
        }
    }
}

/// Reads a prefixed logical variable, returning an empty string when unset.
pub fn get_env(env: &dyn EnvSource, name: &'static str) -> String {
    EnvName::Prefixed(name).lookup(env).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn triton_prefix_is_read() {
        assert_eq!(get_env(&env(&[("TRITON_NAME", "good")]), "NAME"), "good");
    }

    #[test]
    fn sdc_prefix_is_read() {
        assert_eq!(get_env(&env(&[("SDC_NAME", "good")]), "NAME"), "good");
    }

    #[test]
    fn unknown_prefix_is_ignored() {
        assert_eq!(get_env(&env(&[("BAD_NAME", "good")]), "NAME"), "");
    }

    #[test]
    fn triton_wins_over_sdc() {
        let vars = env(&[("TRITON_URL", "triton"), ("SDC_URL", "sdc")]);
        assert_eq!(get_env(&vars, "URL"), "triton");
    }

    #[test]
    fn exact_names_skip_prefixes() {
        let vars = env(&[("MANDIR", "/tmp/man"), ("TRITON_MANDIR", "/nope")]);
        assert_eq!(
            EnvName::Exact("MANDIR").lookup(&vars).as_deref(),
            Some("/tmp/man")
        );
    }

    #[test]
    fn candidates_follow_lookup_order() {
        assert_eq!(
            EnvName::Prefixed("KEY_ID").candidates(),
            vec!["TRITON_KEY_ID".to_string(), "SDC_KEY_ID".to_string()]
        );
    }
}
