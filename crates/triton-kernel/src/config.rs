//! Configuration store.
//!
//! Every setting a command consults lives under a dotted key declared in a
//! [`Namespace`]. Each key holds up to one value per [`ConfigSource`] and a
//! lookup returns the value from the highest-precedence source, falling back
//! to the zero value of the declared type.

use std::collections::{BTreeMap, HashMap};

use tracing::trace;

use crate::env::{EnvName, EnvSource};
use crate::error::ConfigError;
use crate::value::{Value, ValueKind};

/// Declaration of a single configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySpec {
    /// Dotted key name.
    pub name: &'static str,
    /// Declared value type.
    pub kind: ValueKind,
}

impl KeySpec {
    /// Declares a key.
    #[must_use]
    pub const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self { name, kind }
    }
}

/// The full set of keys an application recognizes.
pub type Namespace = &'static [KeySpec];

/// Where a value came from, in ascending precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigSource {
    /// `set_default` or a flag default.
    Default,
    /// Imported from the environment.
    EnvVar,
    /// Supplied on the command line.
    Flag,
    /// Set programmatically.
    Explicit,
}

impl ConfigSource {
    const ALL: [Self; 4] = [Self::Default, Self::EnvVar, Self::Flag, Self::Explicit];

    const fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Default)]
struct Entry {
    layers: [Option<Value>; 4],
}

/// Process-wide settings consulted by commands.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    kinds: HashMap<&'static str, ValueKind>,
    entries: BTreeMap<&'static str, Entry>,
    env_bindings: Vec<(&'static str, EnvName)>,
    frozen: bool,
}

impl ConfigStore {
    /// Creates an empty store over `namespace`.
    #[must_use]
    pub fn new(namespace: Namespace) -> Self {
        Self {
            kinds: namespace.iter().map(|spec| (spec.name, spec.kind)).collect(),
            entries: BTreeMap::new(),
            env_bindings: Vec::new(),
            frozen: false,
        }
    }

    /// Returns the declared kind of `key`.
    pub fn kind_of(&self, key: &str) -> Result<ValueKind, ConfigError> {
        self.kinds
            .get(key)
            .copied()
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
    }

    /// Returns `true` if `key` is part of the namespace.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.kinds.contains_key(key)
    }

    /// Sets the default value for `key`.
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        self.put(key, ConfigSource::Default, value.into())
    }

    /// Sets `key` explicitly, overriding every other source.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        self.put(key, ConfigSource::Explicit, value.into())
    }

    /// Records that `key` is read from the environment variable `name`.
    pub fn bind_env(&mut self, key: &str, name: EnvName) -> Result<(), ConfigError> {
        let key = self.intern(key)?;
        self.env_bindings.retain(|(bound, _)| *bound != key);
        self.env_bindings.push((key, name));
        Ok(())
    }

    /// Environment bindings, in registration order.
    #[must_use]
    pub fn env_bindings(&self) -> &[(&'static str, EnvName)] {
        &self.env_bindings
    }

    /// Imports every bound environment variable present in `env`.
    pub fn import_env(&mut self, env: &dyn EnvSource) -> Result<(), ConfigError> {
        let bindings = self.env_bindings.clone();
        for (key, name) in bindings {
            if let Some(text) = name.lookup(env) {
                trace!(key, "importing from environment");
                self.import_env_value(key, &text)?;
            }
        }
        Ok(())
    }

    /// Parses `text` into the declared type of `key` and stores it as an
    /// environment value.
    pub fn import_env_value(&mut self, key: &str, text: &str) -> Result<(), ConfigError> {
        let kind = self.kind_of(key)?;
        let value = Value::parse(kind, text).map_err(|reason| ConfigError::InvalidValue {
            key: key.to_string(),
            value: text.to_string(),
            reason,
        })?;
        self.put(key, ConfigSource::EnvVar, value)
    }

    /// Stores a value parsed from a command-line flag.
    pub fn bind_flag_value(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        self.put(key, ConfigSource::Flag, value)
    }

    /// Rejects further writes.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Returns `true` once argv parsing has completed.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Returns the source the effective value of `key` comes from.
    #[must_use]
    pub fn source(&self, key: &str) -> Option<ConfigSource> {
        let entry = self.entries.get(key)?;
        ConfigSource::ALL
            .iter()
            .rev()
            .copied()
            .find(|source| entry.layers[source.slot()].is_some())
    }

    /// Returns `true` if a default has been recorded for `key`.
    #[must_use]
    pub fn has_default(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.layers[ConfigSource::Default.slot()].is_some())
    }

    /// Returns the effective value of `key`.
    pub fn get(&self, key: &str) -> Result<Value, ConfigError> {
        let kind = self.kind_of(key)?;
        let value = self.entries.get(key).and_then(|entry| {
            entry.layers.iter().rev().find_map(Option::as_ref).cloned()
        });
        Ok(value.unwrap_or_else(|| Value::zero(kind)))
    }

    /// Reads a string.
    pub fn get_string(&self, key: &str) -> Result<String, ConfigError> {
        match self.typed(key, ValueKind::String)? {
            Value::String(s) => Ok(s),
            other => Err(mismatch(key, other.kind(), ValueKind::String)),
        }
    }

    /// Reads a boolean.
    pub fn get_bool(&self, key: &str) -> Result<bool, ConfigError> {
        match self.typed(key, ValueKind::Bool)? {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch(key, other.kind(), ValueKind::Bool)),
        }
    }

    /// Reads an integer.
    pub fn get_int(&self, key: &str) -> Result<i64, ConfigError> {
        match self.typed(key, ValueKind::Int)? {
            Value::Int(i) => Ok(i),
            other => Err(mismatch(key, other.kind(), ValueKind::Int)),
        }
    }

    /// Reads a string list.
    pub fn get_string_slice(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        match self.typed(key, ValueKind::StringList)? {
            Value::StringList(list) => Ok(list),
            other => Err(mismatch(key, other.kind(), ValueKind::StringList)),
        }
    }

    /// Reads a string map.
    pub fn get_string_map(&self, key: &str) -> Result<BTreeMap<String, String>, ConfigError> {
        match self.typed(key, ValueKind::StringMap)? {
            Value::StringMap(map) => Ok(map),
            other => Err(mismatch(key, other.kind(), ValueKind::StringMap)),
        }
    }

    fn typed(&self, key: &str, requested: ValueKind) -> Result<Value, ConfigError> {
        let declared = self.kind_of(key)?;
        if declared != requested {
            return Err(mismatch(key, declared, requested));
        }
        self.get(key)
    }

    fn intern(&self, key: &str) -> Result<&'static str, ConfigError> {
        self.kinds
            .get_key_value(key)
            .map(|(name, _)| *name)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
    }

    fn put(&mut self, key: &str, source: ConfigSource, value: Value) -> Result<(), ConfigError> {
        if self.frozen {
            return Err(ConfigError::Frozen(key.to_string()));
        }
        let name = self.intern(key)?;
        let declared = self.kind_of(name)?;
        if value.kind() != declared {
            return Err(mismatch(key, declared, value.kind()));
        }
        self.entries.entry(name).or_default().layers[source.slot()] = Some(value);
        Ok(())
    }
}

fn mismatch(key: &str, declared: ValueKind, requested: ValueKind) -> ConfigError {
    ConfigError::TypeMismatch {
        key: key.to_string(),
        declared,
        requested,
    }
}
