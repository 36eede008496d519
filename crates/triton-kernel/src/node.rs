//! Command nodes and the per-command behavior they carry.

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::config::ConfigStore;
use crate::context::Context;
use crate::env::EnvName;
use crate::error::{CliError, Result, SetupError};
use crate::flag::{Flag, Normalizer};
use crate::value::Value;

/// Long names the dispatcher reserves for itself.
pub const RESERVED_FLAGS: [&str; 1] = ["help"];

/// Shorthands the dispatcher reserves for itself.
pub const RESERVED_SHORTS: [char; 1] = ['h'];

/// Positional-argument arity of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgSpec {
    /// No positional arguments.
    #[default]
    NoArgs,
    /// Exactly `n`.
    ExactN(usize),
    /// At most `n`.
    MaxN(usize),
    /// At least `n`.
    MinN(usize),
    /// Between `lo` and `hi`, inclusive.
    RangeN(usize, usize),
}

impl ArgSpec {
    /// Whether any positional argument can be accepted.
    #[must_use]
    pub const fn accepts_args(&self) -> bool {
        !matches!(self, Self::NoArgs | Self::ExactN(0) | Self::MaxN(0))
    }

    /// Checks `args` against this arity.
    pub fn check(&self, command: &str, args: &[String]) -> Result<()> {
        let n = args.len();
        let message = match *self {
            Self::NoArgs if n > 0 => Some(format!("unknown command \"{}\" for \"{command}\"", args[0])),
            Self::ExactN(want) if n != want => {
                Some(format!("accepts {want} arg(s), received {n}"))
            }
            Self::MaxN(max) if n > max => {
                Some(format!("accepts at most {max} arg(s), received {n}"))
            }
            Self::MinN(min) if n < min => {
                Some(format!("requires at least {min} arg(s), only received {n}"))
            }
            Self::RangeN(lo, hi) if n < lo || n > hi => {
                Some(format!("accepts between {lo} and {hi} arg(s), received {n}"))
            }
            _ => None,
        };
        message.map_or(Ok(()), |m| Err(CliError::parse(m)))
    }
}

/// Behavior attached to a command node.
///
/// `setup` runs once at startup to declare flags and bindings. The
/// remaining hooks run only for the selected invocation, in the order
/// `persistent_pre_run` (every node on the path, root first), `pre_run`,
/// `run`.
pub trait Command {
    /// Declares flags, bindings, defaults and normalizers.
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        let _ = decl;
        Ok(())
    }

    /// Runs for every node on the selected path before the leaf's `pre_run`.
    fn persistent_pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Validates cross-flag constraints.
    fn pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Executes the command. The default prints help.
    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move { ctx.print_help() }.boxed_local()
    }
}

/// A command that only groups children.
#[derive(Debug, Clone, Copy, Default)]
pub struct Group;

impl Command for Group {}

/// A flag-to-key binding recorded on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Configuration key.
    pub key: &'static str,
    /// Bound flag.
    pub flag: Flag,
    /// Whether the flag was inherited from an ancestor.
    pub inherited: bool,
}

/// A node in the command tree.
pub struct CommandNode {
    name: &'static str,
    aliases: Vec<&'static str>,
    short: &'static str,
    long: &'static str,
    example: &'static str,
    args: ArgSpec,
    arg_name: &'static str,
    silence_usage: bool,
    command: Box<dyn Command>,
    children: Vec<CommandNode>,
    pub(crate) flags: Vec<Flag>,
    pub(crate) bindings: Vec<Binding>,
    pub(crate) normalizer: Normalizer,
}

impl std::fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("args", &self.args)
            .field("flags", &self.flags.iter().map(Flag::long).collect::<Vec<_>>())
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

impl CommandNode {
    /// Creates a node running `command`.
    pub fn new(name: &'static str, command: impl Command + 'static) -> Self {
        Self {
            name,
            aliases: Vec::new(),
            short: "",
            long: "",
            example: "",
            args: ArgSpec::NoArgs,
            arg_name: "ARG",
            silence_usage: false,
            command: Box::new(command),
            children: Vec::new(),
            flags: Vec::new(),
            bindings: Vec::new(),
            normalizer: Normalizer::new(),
        }
    }

    /// Creates a node that only groups children.
    #[must_use]
    pub fn group(name: &'static str) -> Self {
        Self::new(name, Group)
    }

    /// Adds an alias.
    #[must_use]
    pub fn alias(mut self, alias: &'static str) -> Self {
        self.aliases.push(alias);
        self
    }

    /// Sets the one-line help.
    #[must_use]
    pub fn short(mut self, short: &'static str) -> Self {
        self.short = short;
        self
    }

    /// Sets the long help.
    #[must_use]
    pub fn long(mut self, long: &'static str) -> Self {
        self.long = long;
        self
    }

    /// Sets example text.
    #[must_use]
    pub fn example(mut self, example: &'static str) -> Self {
        self.example = example;
        self
    }

    /// Sets the positional-argument arity.
    #[must_use]
    pub fn args(mut self, args: ArgSpec) -> Self {
        self.args = args;
        self
    }

    /// Sets the placeholder shown for positional arguments.
    #[must_use]
    pub fn arg_name(mut self, arg_name: &'static str) -> Self {
        self.arg_name = arg_name;
        self
    }

    /// Suppresses usage output when the command fails.
    #[must_use]
    pub fn silence_usage(mut self) -> Self {
        self.silence_usage = true;
        self
    }

    /// Adds a child.
    #[must_use]
    pub fn child(mut self, child: CommandNode) -> Self {
        self.children.push(child);
        self
    }

    /// Name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Aliases.
    #[must_use]
    pub fn aliases(&self) -> &[&'static str] {
        &self.aliases
    }

    /// One-line help.
    #[must_use]
    pub const fn short_help(&self) -> &'static str {
        self.short
    }

    /// Long help, falling back to the one-line help.
    #[must_use]
    pub const fn long_help(&self) -> &'static str {
        if self.long.is_empty() { self.short } else { self.long }
    }

    /// Example text.
    #[must_use]
    pub const fn example_text(&self) -> &'static str {
        self.example
    }

    /// Positional arity.
    #[must_use]
    pub const fn arg_spec(&self) -> ArgSpec {
        self.args
    }

    /// Placeholder for positional arguments.
    #[must_use]
    pub const fn arg_placeholder(&self) -> &'static str {
        self.arg_name
    }

    /// Whether usage output is suppressed on failure.
    #[must_use]
    pub const fn is_usage_silenced(&self) -> bool {
        self.silence_usage
    }

    /// The command behavior.
    #[must_use]
    pub fn command(&self) -> &dyn Command {
        self.command.as_ref()
    }

    /// Children.
    #[must_use]
    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }

    /// Flags declared on this node.
    #[must_use]
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    /// Bindings declared on this node.
    #[must_use]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Flag-name normalizer.
    #[must_use]
    pub const fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Finds a child by name or alias.
    #[must_use]
    pub fn find_child(&self, name: &str) -> Option<&CommandNode> {
        self.children
            .iter()
            .find(|c| c.name == name || c.aliases.iter().any(|a| *a == name))
    }

    /// Whether the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn parts_mut(
        &mut self,
    ) -> (
        &dyn Command,
        &mut Vec<Flag>,
        &mut Vec<Binding>,
        &mut Normalizer,
        &mut Vec<CommandNode>,
    ) {
        (
            self.command.as_ref(),
            &mut self.flags,
            &mut self.bindings,
            &mut self.normalizer,
            &mut self.children,
        )
    }
}

/// Declaration surface handed to [`Command::setup`].
pub struct Declarations<'a> {
    pub(crate) command: &'a str,
    pub(crate) flags: &'a mut Vec<Flag>,
    pub(crate) bindings: &'a mut Vec<Binding>,
    pub(crate) normalizer: &'a mut Normalizer,
    pub(crate) inherited: &'a [Flag],
    pub(crate) inherited_keys: &'a [&'static str],
    pub(crate) store: &'a mut ConfigStore,
}

impl Declarations<'_> {
    /// Path of the command being declared.
    #[must_use]
    pub fn command_path(&self) -> &str {
        self.command
    }

    /// Registers a flag on the command.
    pub fn flag(&mut self, flag: Flag) -> std::result::Result<(), SetupError> {
        let long = flag.long();
        if RESERVED_FLAGS.contains(&long) {
            return Err(SetupError::ReservedFlag {
                command: self.command.to_string(),
                name: long.to_string(),
            });
        }
        if self.inherited.iter().any(|f| f.long() == long) {
            return Err(SetupError::ShadowedFlag {
                command: self.command.to_string(),
                name: long.to_string(),
            });
        }
        if self.flags.iter().any(|f| f.long() == long) {
            return Err(SetupError::DuplicateFlag {
                command: self.command.to_string(),
                name: long.to_string(),
            });
        }
        if let Some(short) = flag.short_name() {
            let taken = RESERVED_SHORTS.contains(&short)
                || self
                    .flags
                    .iter()
                    .chain(self.inherited.iter())
                    .any(|f| f.short_name() == Some(short));
            if taken {
                return Err(SetupError::DuplicateShorthand {
                    command: self.command.to_string(),
                    short,
                });
            }
        }
        self.flags.push(flag);
        Ok(())
    }

    /// Links the parsed value of `--long` to `key`.
    pub fn bind(&mut self, key: &'static str, long: &str) -> std::result::Result<(), SetupError> {
        let (flag, inherited) = match self.flags.iter().find(|f| f.long() == long) {
            Some(flag) => (flag.clone(), false),
            None => match self.inherited.iter().find(|f| f.long() == long) {
                Some(flag) => (flag.clone(), true),
                None => {
                    return Err(SetupError::UnknownFlag {
                        command: self.command.to_string(),
                        name: long.to_string(),
                    });
                }
            },
        };
        let expected = self.store.kind_of(key)?;
        if expected != flag.kind() {
            return Err(SetupError::KindMismatch {
                key: key.to_string(),
                flag: long.to_string(),
                expected,
                found: flag.kind(),
            });
        }
        let bound_here = self.bindings.iter().any(|b| b.key == key);
        if bound_here || self.inherited_keys.contains(&key) {
            return Err(SetupError::DuplicateBinding {
                command: self.command.to_string(),
                key: key.to_string(),
            });
        }
        self.bindings.push(Binding {
            key,
            flag,
            inherited,
        });
        Ok(())
    }

    /// Declares `flag` and binds it to `key`.
    pub fn bind_flag(&mut self, key: &'static str, flag: Flag) -> std::result::Result<(), SetupError> {
        let long = flag.long();
        self.flag(flag)?;
        self.bind(key, long)
    }

    /// Imports `key` from the environment.
    pub fn bind_env(&mut self, key: &'static str, name: EnvName) -> std::result::Result<(), SetupError> {
        self.store.bind_env(key, name)?;
        Ok(())
    }

    /// Sets the default for `key`.
    pub fn set_default(
        &mut self,
        key: &'static str,
        value: impl Into<Value>,
    ) -> std::result::Result<(), SetupError> {
        self.store.set_default(key, value)?;
        Ok(())
    }

    /// Installs a flag-name normalizer on the command.
    pub fn normalize(&mut self, normalizer: Normalizer) {
        *self.normalizer = normalizer;
    }
}
