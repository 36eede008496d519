//! # triton-kernel
//!
//! Command dispatch and configuration binding shared by the `triton`,
//! `manta` and `artif-*` command-line tools.
//!
//! An application declares a [`Namespace`] of typed configuration keys and
//! a tree of [`CommandNode`]s. Each node's [`Command::setup`] registers
//! flags and binds them (and environment variables) to keys. The
//! [`Dispatcher`] then parses argv, fills the [`ConfigStore`] with
//! precedence `Explicit > Flag > EnvVar > Default`, freezes it, and runs the
//! selected command.
//!
//! ```text
//! argv ──► clap parser ──► leaf selection ──► ConfigStore (frozen)
//!                                              │
//!               persistent_pre_run ─► pre_run ─► run ─► Terminal::drain
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod dispatch;
pub mod docs;
pub mod env;
pub mod error;
pub mod flag;
pub mod logging;
pub mod node;
pub mod table;
pub mod terminal;
pub mod tree;
pub mod validate;
pub mod value;

pub use config::{ConfigSource, ConfigStore, KeySpec, Namespace};
pub use context::Context;
pub use dispatch::{Dispatcher, EXIT_FAILURE, EXIT_SUCCESS, run_blocking, run_process};
pub use env::{EnvName, EnvSource, ProcessEnv, get_env};
pub use error::{BoxError, CliError, ConfigError, Result, SetupError};
pub use flag::{Flag, Normalizer, Scope};
pub use logging::{LogFormat, LogSettings, init_logging};
pub use node::{ArgSpec, Command, CommandNode, Declarations, Group};
pub use table::{KeyValues, Table};
pub use terminal::{BufferTerminal, StdoutTerminal, Terminal};
pub use tree::CommandTree;
pub use validate::exactly_one_of;
pub use value::{Value, ValueKind};
