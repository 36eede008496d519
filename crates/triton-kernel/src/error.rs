//! Error taxonomy for the dispatch kernel.
//!
//! [`SetupError`] covers programmer errors caught while the command tree is
//! declared and wired. [`ConfigError`] covers configuration-store misuse.
//! [`CliError`] is what every command returns and what the dispatcher turns
//! into an exit code.

use std::error::Error as StdError;

use thiserror::Error;

use crate::value::ValueKind;

/// Boxed error used as the cause of wrapped failures.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type alias for command execution.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors raised by the configuration store.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The key is not part of the declared namespace.
    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    /// The key was read or written with the wrong type.
    #[error("configuration key '{key}' is declared as {declared}, requested as {requested}")]
    TypeMismatch {
        /// Offending key.
        key: String,
        /// Type in the namespace.
        declared: ValueKind,
        /// Type the caller asked for.
        requested: ValueKind,
    },

    /// A textual value (usually from the environment) could not be parsed.
    #[error("invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        /// Key being populated.
        key: String,
        /// Raw text.
        value: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A write was attempted after argv parsing completed.
    #[error("configuration is frozen, cannot write '{0}'")]
    Frozen(String),
}

/// Errors detected while running command setup.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Two flags on one command share a long name.
    #[error("command '{command}' declares --{name} more than once")]
    DuplicateFlag {
        /// Command path.
        command: String,
        /// Long name.
        name: String,
    },

    /// Two flags on one command share a shorthand.
    #[error("command '{command}' declares -{short} more than once")]
    DuplicateShorthand {
        /// Command path.
        command: String,
        /// Shorthand.
        short: char,
    },

    /// A descendant re-declares a persistent flag of an ancestor.
    #[error("command '{command}' re-declares persistent flag --{name}")]
    ShadowedFlag {
        /// Command path.
        command: String,
        /// Long name.
        name: String,
    },

    /// A binding names a flag that is not visible on the command.
    #[error("command '{command}' binds unknown flag --{name}")]
    UnknownFlag {
        /// Command path.
        command: String,
        /// Long name.
        name: String,
    },

    /// A flag's value type differs from its key's declared type.
    #[error("flag --{flag} is {found} but key '{key}' is {expected}")]
    KindMismatch {
        /// Bound key.
        key: String,
        /// Long name of the flag.
        flag: String,
        /// Type in the namespace.
        expected: ValueKind,
        /// Type of the flag.
        found: ValueKind,
    },

    /// A key is bound to two flags along one command path.
    #[error("key '{key}' is bound to more than one flag on the path to '{command}'")]
    DuplicateBinding {
        /// Command path.
        command: String,
        /// Bound key.
        key: String,
    },

    /// Two children of one command share a name or alias.
    #[error("command '{parent}' has more than one child named '{name}'")]
    DuplicateCommand {
        /// Parent command path.
        parent: String,
        /// Name or alias.
        name: String,
    },

    /// A normalizer maps onto a flag the command does not declare itself.
    #[error("command '{command}' maps --{from} to --{to}, which it does not declare")]
    UnresolvedNormalizer {
        /// Command path.
        command: String,
        /// Accepted spelling.
        from: String,
        /// Missing target.
        to: String,
    },

    /// The name is reserved by the dispatcher.
    #[error("command '{command}' declares reserved flag --{name}")]
    ReservedFlag {
        /// Command path.
        command: String,
        /// Long name.
        name: String,
    },

    /// A default or binding referenced a bad key.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors returned by commands and by the dispatcher.
#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed argv or arity violation.
    #[error("{0}")]
    Parse(String),

    /// Cross-flag rule failure.
    #[error("{0}")]
    Validation(String),

    /// Missing credentials or client construction failure.
    #[error("{context}: {source}")]
    Config {
        /// Contextual prefix such as `Error Creating Triton Compute Client`.
        context: String,
        /// Underlying failure.
        #[source]
        source: BoxError,
    },

    /// Remote operation failure, message passed through unchanged.
    #[error("{source}")]
    Remote {
        /// Underlying failure.
        #[source]
        source: BoxError,
    },

    /// File or directory failure.
    #[error("{context}: {source}")]
    Io {
        /// Path or operation context.
        context: String,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// Invalid command tree.
    #[error("invalid command tree: {0}")]
    Setup(#[from] SetupError),

    /// Configuration store misuse.
    #[error(transparent)]
    Store(#[from] ConfigError),

    /// A command panicked.
    #[error("command panicked: {0}")]
    Panic(String),
}

impl CliError {
    /// Creates a `Parse` error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates a `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wraps a client-construction failure with a contextual prefix.
    #[must_use]
    pub fn client(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Config {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Wraps a remote failure.
    #[must_use]
    pub fn remote(source: impl Into<BoxError>) -> Self {
        Self::Remote {
            source: source.into(),
        }
    }

    /// Wraps an IO failure with path context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Walks the cause chain and returns the first error of type `T`.
    pub fn find_cause<T: StdError + 'static>(&self) -> Option<&T> {
        let mut current: Option<&(dyn StdError + 'static)> = Some(self);
        while let Some(err) = current {
            if let Some(found) = err.downcast_ref::<T>() {
                return Some(found);
            }
            current = err.source();
        }
        None
    }

    /// Returns `true` for errors raised before any command ran.
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("resource missing")]
    struct Missing;

    #[test]
    fn client_error_carries_prefix() {
        let err = CliError::client("Error Creating Triton Compute Client", "no account");
        assert_eq!(
            err.to_string(),
            "Error Creating Triton Compute Client: no account"
        );
    }

    #[test]
    fn remote_error_message_is_unchanged() {
        let err = CliError::remote(Missing);
        assert_eq!(err.to_string(), "resource missing");
    }

    #[test]
    fn find_cause_reaches_inner_error() {
        let err = CliError::client("Error Creating Client", Missing);
        assert!(err.find_cause::<Missing>().is_some());

        let err = CliError::remote(Missing);
        assert!(err.find_cause::<Missing>().is_some());

        let err = CliError::validation("nope");
        assert!(err.find_cause::<Missing>().is_none());
    }

    #[test]
    fn io_error_wraps_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = CliError::io("creating ./docs/man", io);
        assert_eq!(err.to_string(), "creating ./docs/man: denied");
    }

    #[test]
    fn usage_errors() {
        assert!(CliError::parse("x").is_usage_error());
        assert!(CliError::validation("x").is_usage_error());
        assert!(!CliError::Panic("x".into()).is_usage_error());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CliError>();
    }
}
