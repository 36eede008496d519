//! Per-invocation state handed to command hooks.

use crate::config::ConfigStore;
use crate::error::Result;
use crate::node::CommandNode;
use crate::terminal::Terminal;
use crate::tree::CommandTree;

/// Everything a command sees while it runs.
///
/// The configuration is borrowed immutably: it was frozen before the
/// first hook ran.
pub struct Context<'a> {
    config: &'a ConfigStore,
    tree: &'a CommandTree,
    node: &'a CommandNode,
    path: Vec<&'static str>,
    args: Vec<String>,
    terminal: &'a mut dyn Terminal,
    stats: bool,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("path", &self.path)
            .field("args", &self.args)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<'a> Context<'a> {
    /// Creates a context for the node selected at `path`.
    pub fn new(
        config: &'a ConfigStore,
        tree: &'a CommandTree,
        node: &'a CommandNode,
        path: Vec<&'static str>,
        args: Vec<String>,
        terminal: &'a mut dyn Terminal,
    ) -> Self {
        Self {
            config,
            tree,
            node,
            path,
            args,
            terminal,
            stats: false,
        }
    }

    /// The frozen configuration.
    #[must_use]
    pub const fn config(&self) -> &'a ConfigStore {
        self.config
    }

    /// The command tree.
    #[must_use]
    pub const fn tree(&self) -> &'a CommandTree {
        self.tree
    }

    /// The selected node.
    #[must_use]
    pub const fn node(&self) -> &'a CommandNode {
        self.node
    }

    /// Positional arguments, in order.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The `index`th positional argument.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Names from the root to the selected node.
    #[must_use]
    pub fn path(&self) -> &[&'static str] {
        &self.path
    }

    /// Space-separated command path.
    #[must_use]
    pub fn command_path(&self) -> String {
        self.path.join(" ")
    }

    /// The root command name, e.g. `triton`.
    #[must_use]
    pub fn root_name(&self) -> &'static str {
        self.tree.root().name()
    }

    /// Appends text to the output.
    pub fn write(&mut self, text: &str) {
        self.terminal.write_str(text);
    }

    /// Appends a line to the output.
    pub fn println(&mut self, line: impl AsRef<str>) {
        self.terminal.write_str(line.as_ref());
        self.terminal.write_str("\n");
    }

    /// Long help for the selected command.
    #[must_use]
    pub fn help(&self) -> String {
        render(self.tree, &self.path, |cmd| cmd.render_long_help().to_string())
    }

    /// Usage line for the selected command.
    #[must_use]
    pub fn usage(&self) -> String {
        render(self.tree, &self.path, |cmd| cmd.render_usage().to_string())
    }

    /// Writes the long help to the output.
    pub fn print_help(&mut self) -> Result<()> {
        let help = self.help();
        self.write(&help);
        Ok(())
    }

    /// Pages the output when it is drained to an interactive terminal.
    pub fn use_pager(&mut self, enabled: bool) {
        self.terminal.use_pager(enabled);
    }

    /// Requests a timing line once the command finishes.
    pub fn enable_stats(&mut self, enabled: bool) {
        self.stats = enabled;
    }

    /// Whether timing was requested.
    #[must_use]
    pub const fn stats_enabled(&self) -> bool {
        self.stats
    }
}

/// Renders text for the parser node at `path`.
pub(crate) fn render(
    tree: &CommandTree,
    path: &[&str],
    f: impl FnOnce(&mut clap::Command) -> String,
) -> String {
    f(&mut tree.parser_for(path))
}
