//! The single-command trees behind each `artif-*` binary.
//!
//! Every tool is one root node wrapped in [`Tool`], which adds the
//! logging flags and installs the subscriber before the command runs.

use std::process::ExitCode;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use triton_kernel::{
    CliError, Command, CommandNode, Context, Declarations, EnvName, Flag, LogFormat, LogSettings,
    ProcessEnv, Result, SetupError, init_logging, logging::DEFAULT_LEVEL, run_process,
};

use crate::client::{ArtifactoryApi, ArtifactoryClient, Credentials};
use crate::keys;

/// Prefix for client construction failures.
pub const CLIENT_ERROR: &str = "Error Creating Artifactory Client";

/// Builds Artifactory clients for commands.
pub trait Connector {
    /// A client for the current invocation.
    fn connect(&self) -> Result<Box<dyn ArtifactoryApi>>;
}

/// Connects with credentials from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConnector;

impl Connector for EnvConnector {
    fn connect(&self) -> Result<Box<dyn ArtifactoryApi>> {
        let credentials = Credentials::from_env(&ProcessEnv);
        let client =
            ArtifactoryClient::new(&credentials).map_err(|e| CliError::client(CLIENT_ERROR, e))?;
        Ok(Box::new(client))
    }
}

/// Wraps a tool's command with the shared logging flags.
pub struct Tool<C> {
    inner: C,
}

/// A root node named `name` running `command`.
pub fn tool(name: &'static str, command: impl Command + 'static) -> CommandNode {
    CommandNode::new(name, Tool { inner: command })
}

impl<C: Command> Command for Tool<C> {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        decl.bind_flag(
            keys::LOG_FORMAT,
            Flag::string("log-format")
                .help("Log format: text or json")
                .default_value("text"),
        )?;
        decl.bind_env(keys::LOG_FORMAT, EnvName::Exact("ARTIFACTORY_LOG_FORMAT"))?;
        decl.bind_flag(
            keys::LOG_LEVEL,
            Flag::string("log-level")
                .help("Log filter, e.g. debug or artif_cli=trace")
                .default_value(DEFAULT_LEVEL),
        )?;
        decl.bind_env(keys::LOG_LEVEL, EnvName::Exact("ARTIFACTORY_LOG_LEVEL"))?;
        decl.bind_flag(keys::LOG_STATS, Flag::bool("log-stats").help("Log command timing"))?;
        decl.bind_flag(keys::LOG_USE_COLOR, Flag::bool("use-color").help("Colorize log output"))?;
        self.inner.setup(decl)
    }

    fn persistent_pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        let config = ctx.config();
        let settings = LogSettings {
            format: config.get_string(keys::LOG_FORMAT)?.parse::<LogFormat>()?,
            level: config.get_string(keys::LOG_LEVEL)?,
            color: config.get_bool(keys::LOG_USE_COLOR)?,
        };
        init_logging(&settings)?;
        ctx.enable_stats(config.get_bool(keys::LOG_STATS)?);
        self.inner.persistent_pre_run(ctx)
    }

    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        self.inner.pre_run(ctx)
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        self.inner.run(ctx)
    }
}

/// Runs the tool built by `build` against the process arguments.
pub fn main(build: fn(Rc<dyn Connector>) -> CommandNode) -> ExitCode {
    run_process(build(Rc::new(EnvConnector)), keys::ARTIF_NAMESPACE)
}
