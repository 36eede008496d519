//! The command tree: recursive setup and lowering into a `clap` parser.

use clap::builder::BoolishValueParser;
use clap::{Arg, ArgAction};
use tracing::debug;

use crate::config::ConfigStore;
use crate::error::SetupError;
use crate::flag::Flag;
use crate::node::{CommandNode, Declarations};
use crate::value::{ValueKind, parse_pair};

/// Argument id under which positional arguments are collected.
pub(crate) const POSITIONAL_ID: &str = "__positional";

/// A node together with its path and the persistent flags it inherits.
#[derive(Debug, Clone)]
pub struct NodeRef<'a> {
    /// Names from the root to this node.
    pub path: Vec<&'static str>,
    /// The node.
    pub node: &'a CommandNode,
    /// Persistent flags declared by ancestors.
    pub inherited: Vec<&'a Flag>,
}

impl NodeRef<'_> {
    /// Space-separated command path, e.g. `triton instances list`.
    #[must_use]
    pub fn command_path(&self) -> String {
        self.path.join(" ")
    }
}

/// A fully declared command tree.
#[derive(Debug)]
pub struct CommandTree {
    root: CommandNode,
    parser: clap::Command,
}

impl CommandTree {
    /// Runs setup on every node, root first, and builds the parser.
    pub fn build(mut root: CommandNode, store: &mut ConfigStore) -> Result<Self, SetupError> {
        let root_name = root.name();
        setup_node(&mut root, root_name, &[], &[], store)?;
        let parser = lower(&root);
        debug!(root = root_name, "command tree ready");
        Ok(Self { root, parser })
    }

    /// The root node.
    #[must_use]
    pub const fn root(&self) -> &CommandNode {
        &self.root
    }

    /// The parser built from the tree.
    #[must_use]
    pub const fn parser(&self) -> &clap::Command {
        &self.parser
    }

    /// A parser with bin names and generated subcommands filled in.
    #[must_use]
    pub fn built_parser(&self) -> clap::Command {
        let mut parser = self.parser.clone();
        parser.build();
        parser
    }

    /// The built parser for the node at `path`, falling back to the
    /// deepest node that exists.
    #[must_use]
    pub fn parser_for(&self, path: &[&str]) -> clap::Command {
        let mut current = self.built_parser();
        for name in path.iter().skip(1) {
            let Some(sub) = current.find_subcommand(name).cloned() else {
                break;
            };
            current = sub;
        }
        current
    }

    /// Resolves a path of names to a node.
    #[must_use]
    pub fn find(&self, path: &[&str]) -> Option<&CommandNode> {
        let (first, rest) = path.split_first()?;
        if *first != self.root.name() {
            return None;
        }
        rest.iter()
            .try_fold(&self.root, |node, name| node.find_child(name))
    }

    /// Every node in pre-order.
    #[must_use]
    pub fn walk(&self) -> Vec<NodeRef<'_>> {
        let mut out = Vec::new();
        walk_node(&self.root, Vec::new(), Vec::new(), &mut out);
        out
    }
}

fn walk_node<'a>(
    node: &'a CommandNode,
    mut path: Vec<&'static str>,
    inherited: Vec<&'a Flag>,
    out: &mut Vec<NodeRef<'a>>,
) {
    path.push(node.name());
    let mut passed = inherited.clone();
    passed.extend(node.flags().iter().filter(|f| f.is_persistent()));
    out.push(NodeRef {
        path: path.clone(),
        node,
        inherited,
    });
    for child in node.children() {
        walk_node(child, path.clone(), passed.clone(), out);
    }
}

fn setup_node(
    node: &mut CommandNode,
    path: &str,
    inherited: &[Flag],
    inherited_keys: &[&'static str],
    store: &mut ConfigStore,
) -> Result<(), SetupError> {
    let (command, flags, bindings, normalizer, children) = node.parts_mut();
    {
        let mut decl = Declarations {
            command: path,
            flags: &mut *flags,
            bindings: &mut *bindings,
            normalizer: &mut *normalizer,
            inherited,
            inherited_keys,
            store: &mut *store,
        };
        command.setup(&mut decl)?;
    }

    // No two visible flags may collide once names are normalized.
    for (from, to) in normalizer.entries() {
        let clash = flags
            .iter()
            .chain(inherited.iter())
            .any(|f| f.long() == *from && from != to);
        if clash {
            return Err(SetupError::DuplicateFlag {
                command: path.to_string(),
                name: (*to).to_string(),
            });
        }
    }

    // Spellings are lowered as clap aliases of the node's own flags, so an
    // inherited or undeclared target would never match.
    for (from, to) in normalizer.entries() {
        if !flags.iter().any(|f| f.long() == *to) {
            return Err(SetupError::UnresolvedNormalizer {
                command: path.to_string(),
                from: (*from).to_string(),
                to: (*to).to_string(),
            });
        }
    }

    let mut seen: Vec<&str> = Vec::new();
    for child in children.iter() {
        for name in std::iter::once(child.name()).chain(child.aliases().iter().copied()) {
            if seen.contains(&name) {
                return Err(SetupError::DuplicateCommand {
                    parent: path.to_string(),
                    name: name.to_string(),
                });
            }
            seen.push(name);
        }
    }

    let mut passed: Vec<Flag> = inherited.to_vec();
    passed.extend(flags.iter().filter(|f| f.is_persistent()).cloned());
    let mut keys: Vec<&'static str> = inherited_keys.to_vec();
    keys.extend(bindings.iter().map(|b| b.key));

    for child in children.iter_mut() {
        let child_path = format!("{path} {}", child.name());
        setup_node(child, &child_path, &passed, &keys, &mut *store)?;
    }
    Ok(())
}

fn lower(node: &CommandNode) -> clap::Command {
    let mut cmd = clap::Command::new(node.name())
        .about(node.short_help())
        .disable_version_flag(true);
    if node.long_help() != node.short_help() {
        cmd = cmd.long_about(node.long_help());
    }
    if !node.example_text().is_empty() {
        cmd = cmd.after_help(format!("Examples:\n{}", node.example_text()));
    }
    for alias in node.aliases() {
        cmd = cmd.visible_alias(*alias);
    }
    for flag in node.flags() {
        cmd = cmd.arg(lower_flag(flag, &node.normalizer().spellings_of(flag.long())));
    }
    if node.is_leaf() && node.arg_spec().accepts_args() {
        cmd = cmd.arg(
            Arg::new(POSITIONAL_ID)
                .value_name(node.arg_placeholder())
                .num_args(0..)
                .action(ArgAction::Append),
        );
    }
    for child in node.children() {
        cmd = cmd.subcommand(lower(child));
    }
    cmd
}

fn lower_flag(flag: &Flag, spellings: &[&'static str]) -> Arg {
    let mut arg = Arg::new(flag.long())
        .long(flag.long())
        .help(flag.help_text())
        .hide(flag.is_hidden())
        .global(flag.is_persistent());
    if let Some(short) = flag.short_name() {
        arg = arg.short(short);
    }
    for spelling in spellings {
        arg = arg.alias(*spelling);
    }
    match flag.kind() {
        ValueKind::Bool => arg
            .action(ArgAction::Set)
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .value_parser(BoolishValueParser::new()),
        ValueKind::String => arg.action(ArgAction::Set).value_name("STRING"),
        ValueKind::Int => arg
            .action(ArgAction::Set)
            .value_name("INT")
            .value_parser(clap::value_parser!(i64)),
        ValueKind::StringList => arg
            .action(ArgAction::Append)
            .value_name("STRINGS")
            .value_delimiter(','),
        ValueKind::StringMap => arg
            .action(ArgAction::Append)
            .value_name("KEY=VALUE")
            .value_parser(parse_pair),
    }
}
