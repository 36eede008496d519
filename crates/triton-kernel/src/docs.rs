//! Man page, markdown and shell completion generators.
//!
//! Every generator writes one artifact per command node (or one script
//! for the whole tree) and creates its target directory first.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use clap_complete::Shell;
use clap_mangen::Man;
use tracing::debug;

use crate::error::{CliError, Result};
use crate::flag::Flag;
use crate::tree::{CommandTree, NodeRef};
use crate::value::ValueKind;

/// Permission bits for directories created by the generators.
pub const DIR_MODE: u32 = 0o777;

/// Creates `dir` and its parents with [`DIR_MODE`] permissions.
pub fn create_dir(dir: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder
        .create(dir)
        .map_err(|e| CliError::io(format!("creating {}", dir.display()), e))
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).map_err(|e| CliError::io(format!("creating {}", path.display()), e))?;
    file.write_all(contents)
        .map_err(|e| CliError::io(format!("writing {}", path.display()), e))
}

/// Settings for man page generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManOptions {
    /// Root directory; pages land in `<dir>/man<section>`.
    pub dir: PathBuf,
    /// Manual section.
    pub section: String,
    /// Source footer, e.g. `Triton 1.0.0`.
    pub source: String,
}

/// Writes one man page per command node and returns the written paths.
pub fn generate_man_pages(tree: &CommandTree, options: &ManOptions) -> Result<Vec<PathBuf>> {
    let dir = options.dir.join(format!("man{}", options.section));
    create_dir(&dir)?;

    let mut written = Vec::new();
    for node in tree.walk() {
        let name = node.path.join("-");
        let path = dir.join(format!("{name}.{}", options.section));
        let man = Man::new(tree.parser_for(&node.path))
            .title(name.to_uppercase())
            .section(options.section.clone())
            .source(options.source.clone());
        let mut buf = Vec::new();
        man.render(&mut buf)
            .map_err(|e| CliError::io(format!("rendering {}", path.display()), e))?;
        write_file(&path, &buf)?;
        debug!(path = %path.display(), "wrote man page");
        written.push(path);
    }
    Ok(written)
}

/// Writes one markdown page per command node and returns the written
/// paths. Cross links are `<url_prefix>/<page>`.
pub fn generate_markdown(tree: &CommandTree, dir: &Path, url_prefix: &str) -> Result<Vec<PathBuf>> {
    create_dir(dir)?;
    let prefix = url_prefix.trim_end_matches('/');

    let nodes = tree.walk();
    let mut written = Vec::new();
    for node in &nodes {
        let page = markdown_page(node, &nodes, prefix);
        let path = dir.join(format!("{}.md", node.path.join("_")));
        write_file(&path, page.as_bytes())?;
        debug!(path = %path.display(), "wrote markdown page");
        written.push(path);
    }
    Ok(written)
}

/// Writes `<dir>/<root>.sh` and returns its path.
pub fn generate_bash_completion(tree: &CommandTree, dir: &Path) -> Result<PathBuf> {
    create_dir(dir)?;
    let name = tree.root().name();
    let path = dir.join(format!("{name}.sh"));
    let mut parser = tree.parser().clone();
    let mut buf = Vec::new();
    clap_complete::generate(Shell::Bash, &mut parser, name, &mut buf);
    write_file(&path, &buf)?;
    debug!(path = %path.display(), "wrote bash completion");
    Ok(path)
}

fn markdown_page(node: &NodeRef<'_>, all: &[NodeRef<'_>], prefix: &str) -> String {
    let command = node.command_path();
    let n = node.node;
    let mut out = String::new();

    let _ = writeln!(out, "## {command}\n");
    let _ = writeln!(out, "{}\n", n.short_help());
    let _ = writeln!(out, "### Synopsis\n");
    let _ = writeln!(out, "{}\n", n.long_help());
    if n.is_leaf() {
        let args = if n.arg_spec().accepts_args() {
            format!(" [{}...]", n.arg_placeholder())
        } else {
            String::new()
        };
        let _ = writeln!(out, "```\n{command} [flags]{args}\n```\n");
    }
    if !n.example_text().is_empty() {
        let _ = writeln!(out, "### Examples\n");
        let _ = writeln!(out, "```\n{}\n```\n", n.example_text().trim_end());
    }

    let help = format!("help for {}", n.name());
    let mut local: Vec<(String, &str)> = n.flags().iter().map(|f| (flag_spec(f), f.help_text())).collect();
    local.push(("-h, --help".to_string(), help.as_str()));
    let _ = writeln!(out, "### Options\n");
    let _ = writeln!(out, "```\n{}```\n", flag_lines(&local));

    if !node.inherited.is_empty() {
        let inherited: Vec<(String, &str)> = node
            .inherited
            .iter()
            .map(|f| (flag_spec(f), f.help_text()))
            .collect();
        let _ = writeln!(out, "### Options inherited from parent commands\n");
        let _ = writeln!(out, "```\n{}```\n", flag_lines(&inherited));
    }

    let _ = writeln!(out, "### SEE ALSO\n");
    if node.path.len() > 1 {
        let parent = &node.path[..node.path.len() - 1];
        if let Some(parent) = all.iter().find(|r| r.path == parent) {
            let _ = writeln!(out, "{}", see_also(parent, prefix));
        }
    }
    for child in all
        .iter()
        .filter(|r| r.path.len() == node.path.len() + 1 && r.path.starts_with(&node.path))
    {
        let _ = writeln!(out, "{}", see_also(child, prefix));
    }
    out
}

fn see_also(node: &NodeRef<'_>, prefix: &str) -> String {
    format!(
        "* [{}]({prefix}/{})\t - {}",
        node.command_path(),
        node.path.join("_"),
        node.node.short_help()
    )
}

fn flag_spec(flag: &Flag) -> String {
    let value = match flag.kind() {
        ValueKind::Bool => "",
        ValueKind::String => " string",
        ValueKind::Int => " int",
        ValueKind::StringList => " strings",
        ValueKind::StringMap => " stringToString",
    };
    match flag.short_name() {
        Some(short) => format!("-{short}, --{}{value}", flag.long()),
        None => format!("    --{}{value}", flag.long()),
    }
}

fn flag_lines(flags: &[(String, &str)]) -> String {
    let width = flags.iter().map(|(spec, _)| spec.len()).max().unwrap_or_default();
    let mut out = String::new();
    for (spec, help) in flags {
        let _ = writeln!(out, "  {spec:<width$}   {help}");
    }
    out
}
