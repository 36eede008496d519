//! Argv parsing, leaf selection and hook execution.

use std::any::Any;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::panic::AssertUnwindSafe;
use std::process::ExitCode;
use std::time::Instant;

use clap::ArgMatches;
use clap::error::ErrorKind;
use clap::parser::ValueSource;
use futures::FutureExt;
use tracing::{debug, info};

use crate::config::{ConfigStore, Namespace};
use crate::context::{Context, render};
use crate::env::{EnvSource, ProcessEnv};
use crate::error::{CliError, Result, SetupError};
use crate::flag::Flag;
use crate::node::CommandNode;
use crate::terminal::{StdoutTerminal, Terminal};
use crate::tree::{CommandTree, POSITIONAL_ID};
use crate::value::{Value, ValueKind};

/// Exit code for a successful invocation.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for any failed invocation.
pub const EXIT_FAILURE: i32 = 1;

/// Runs invocations against a declared command tree.
#[derive(Debug)]
pub struct Dispatcher {
    store: ConfigStore,
    tree: CommandTree,
}

impl Dispatcher {
    /// Declares the tree rooted at `root` over the keys in `namespace`.
    pub fn new(root: CommandNode, namespace: Namespace) -> std::result::Result<Self, SetupError> {
        let mut store = ConfigStore::new(namespace);
        let tree = CommandTree::build(root, &mut store)?;
        Ok(Self { store, tree })
    }

    /// The configuration as declared, before any invocation.
    #[must_use]
    pub const fn config(&self) -> &ConfigStore {
        &self.store
    }

    /// Mutable access for application-level defaults.
    pub fn config_mut(&mut self) -> &mut ConfigStore {
        &mut self.store
    }

    /// The command tree.
    #[must_use]
    pub const fn tree(&self) -> &CommandTree {
        &self.tree
    }

    /// Runs one invocation and returns the process exit code.
    ///
    /// Errors are written to the terminal's error stream as `Error: ...`,
    /// followed by the command usage for argument errors unless the
    /// command silences it.
    pub async fn dispatch<I, T>(&self, argv: I, env: &dyn EnvSource, terminal: &mut dyn Terminal) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut path = Vec::new();
        let result = self.invoke(argv, env, terminal, &mut path).await;
        let result = finish(result, terminal);
        match result {
            Ok(()) => EXIT_SUCCESS,
            Err(err) => {
                terminal.write_err(&format!("Error: {err}\n"));
                if err.is_usage_error() && !self.usage_silenced(&path) {
                    let usage = render(&self.tree, &path, |cmd| cmd.render_usage().to_string());
                    terminal.write_err(&format!("{usage}\n"));
                }
                EXIT_FAILURE
            }
        }
    }

    /// Runs one invocation and returns its outcome.
    ///
    /// The terminal is drained exactly once, whether the command succeeds,
    /// fails or panics.
    pub async fn execute<I, T>(&self, argv: I, env: &dyn EnvSource, terminal: &mut dyn Terminal) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut path = Vec::new();
        let result = self.invoke(argv, env, terminal, &mut path).await;
        finish(result, terminal)
    }

    async fn invoke<I, T>(
        &self,
        argv: I,
        env: &dyn EnvSource,
        terminal: &mut dyn Terminal,
        selected: &mut Vec<&'static str>,
    ) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        *selected = self.guess_path(&argv);

        let mut store = self.store.clone();
        store.import_env(env)?;

        let matches = match self.tree.parser().clone().try_get_matches_from(&argv) {
            Ok(matches) => matches,
            Err(err) => {
                return match err.kind() {
                    ErrorKind::DisplayHelp
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                    | ErrorKind::DisplayVersion => {
                        terminal.write_str(&err.render().to_string());
                        Ok(())
                    }
                    _ => Err(CliError::parse(clap_message(&err))),
                };
            }
        };

        let chain = select(self.tree.root(), &matches);
        *selected = chain.iter().map(|(node, _)| node.name()).collect();
        let Some(&(leaf, leaf_matches)) = chain.last() else {
            return Err(CliError::parse("no command selected"));
        };
        debug!(command = %selected.join(" "), "selected command");

        for (node, own) in &chain {
            for binding in node.bindings() {
                let source = if binding.flag.is_persistent() { leaf_matches } else { *own };
                if let Some(value) = flag_value(source, &binding.flag) {
                    store.bind_flag_value(binding.key, value)?;
                } else if let Some(default) = binding.flag.initial_value() {
                    if !store.has_default(binding.key) {
                        store.set_default(binding.key, default.clone())?;
                    }
                }
            }
        }

        let args: Vec<String> = leaf_matches
            .try_get_many::<String>(POSITIONAL_ID)
            .ok()
            .flatten()
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        leaf.arg_spec().check(&selected.join(" "), &args)?;

        store.freeze();

        let started = Instant::now();
        let mut ctx = Context::new(&store, &self.tree, leaf, selected.clone(), args, terminal);
        let outcome = AssertUnwindSafe(async {
            for (node, _) in &chain {
                node.command().persistent_pre_run(&mut ctx)?;
            }
            leaf.command().pre_run(&mut ctx)?;
            leaf.command().run(&mut ctx).await
        })
        .catch_unwind()
        .await;

        if ctx.stats_enabled() {
            info!(
                command = %ctx.command_path(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "command finished"
            );
        }

        outcome.unwrap_or_else(|payload| Err(CliError::Panic(panic_message(payload.as_ref()))))
    }

    /// Best-effort path for argv that the parser rejected.
    fn guess_path(&self, argv: &[OsString]) -> Vec<&'static str> {
        let mut node = self.tree.root();
        let mut path = vec![node.name()];
        for token in argv.iter().skip(1) {
            let Some(token) = token.to_str() else { break };
            if token == "--" {
                break;
            }
            if token.starts_with('-') {
                continue;
            }
            match node.find_child(token) {
                Some(child) => {
                    node = child;
                    path.push(child.name());
                }
                None => break,
            }
        }
        path
    }

    fn usage_silenced(&self, path: &[&'static str]) -> bool {
        self.tree
            .find(path)
            .is_some_and(CommandNode::is_usage_silenced)
    }
}

fn finish(result: Result<()>, terminal: &mut dyn Terminal) -> Result<()> {
    let drained = terminal.drain();
    match (result, drained) {
        (Err(err), _) => Err(err),
        (Ok(()), Err(io)) => Err(CliError::io("writing output", io)),
        (Ok(()), Ok(())) => Ok(()),
    }
}

/// Pairs each node on the selected path with its own matches.
fn select<'t>(root: &'t CommandNode, matches: &'t ArgMatches) -> Vec<(&'t CommandNode, &'t ArgMatches)> {
    let mut chain = vec![(root, matches)];
    let mut node = root;
    let mut current = matches;
    while let Some((name, sub)) = current.subcommand() {
        let Some(child) = node.find_child(name) else { break };
        chain.push((child, sub));
        node = child;
        current = sub;
    }
    chain
}

/// The value of `flag` when it was given on the command line.
fn flag_value(matches: &ArgMatches, flag: &Flag) -> Option<Value> {
    let id = flag.long();
    if matches.value_source(id) != Some(ValueSource::CommandLine) {
        return None;
    }
    match flag.kind() {
        ValueKind::Bool => matches.try_get_one::<bool>(id).ok().flatten().map(|b| Value::Bool(*b)),
        ValueKind::Int => matches.try_get_one::<i64>(id).ok().flatten().map(|i| Value::Int(*i)),
        ValueKind::String => matches
            .try_get_one::<String>(id)
            .ok()
            .flatten()
            .map(|s| Value::String(s.clone())),
        ValueKind::StringList => matches
            .try_get_many::<String>(id)
            .ok()
            .flatten()
            .map(|values| Value::StringList(values.cloned().collect())),
        ValueKind::StringMap => matches
            .try_get_many::<(String, String)>(id)
            .ok()
            .flatten()
            .map(|pairs| Value::StringMap(pairs.cloned().collect::<BTreeMap<_, _>>())),
    }
}

/// First line of a parser error without clap's `error: ` prefix.
fn clap_message(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let line = rendered.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).trim().to_string()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Declares `root` and runs one invocation on a current-thread runtime.
///
/// Setup and runtime construction failures are reported through
/// `terminal` like any other error.
pub fn run_blocking<I, T>(
    root: CommandNode,
    namespace: Namespace,
    argv: I,
    env: &dyn EnvSource,
    terminal: &mut dyn Terminal,
) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let dispatcher = match Dispatcher::new(root, namespace) {
        Ok(d) => d,
        Err(e) => {
            terminal.write_err(&format!("Error: {e}\n"));
            return EXIT_FAILURE;
        }
    };
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            terminal.write_err(&format!("Failed to create async runtime: {e}\n"));
            return EXIT_FAILURE;
        }
    };
    runtime.block_on(dispatcher.dispatch(argv, env, terminal))
}

/// Process entry point: runs the process arguments against `root`.
pub fn run_process(root: CommandNode, namespace: Namespace) -> ExitCode {
    let mut terminal = StdoutTerminal::new();
    let code = run_blocking(root, namespace, std::env::args_os(), &ProcessEnv, &mut terminal);
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
