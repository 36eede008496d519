//! `doc man`, `doc md` and `shell autocomplete bash`.

use std::path::PathBuf;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use tracing::info;
use triton_kernel::docs::{self, ManOptions};
use triton_kernel::{
    Command, CommandNode, Context, Declarations, EnvName, Flag, Result, SetupError,
};

use crate::keys;
use crate::version::man_source;

/// Builds the `doc` subtree. `product` names the tool in man page
/// footers, e.g. `Triton`.
pub fn node(product: &'static str, markdown: bool) -> CommandNode {
    let mut doc = CommandNode::group("doc")
        .short("Generate documentation")
        .child(
            CommandNode::new("man", ManPages { product })
                .short("Write man pages")
                .long("Write one man page per command into <man-dir>/man<section>.")
                .example("  doc man --man-dir ./docs/man"),
        );
    if markdown {
        doc = doc.child(
            CommandNode::new("md", Markdown)
                .short("Write markdown pages")
                .example("  doc md --md-dir ./docs/md --md-url-prefix /command"),
        );
    }
    doc
}

/// Builds the `shell autocomplete bash` subtree.
pub fn shell_node() -> CommandNode {
    CommandNode::group("shell")
        .short("Shell integration")
        .child(
            CommandNode::group("autocomplete")
                .short("Shell completion scripts")
                .child(
                    CommandNode::new("bash", BashCompletion)
                        .short("Write the bash completion script")
                        .example("  shell autocomplete bash --target ~/.bash_completion.d"),
                ),
        )
}

/// Writes man pages for the whole tree.
pub struct ManPages {
    product: &'static str,
}

impl Command for ManPages {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        decl.bind_flag(
            keys::DOC_MAN_DIR,
            Flag::string("man-dir")
                .help("Root directory for man pages")
                .default_value(keys::DEFAULT_MAN_DIR),
        )?;
        decl.bind_env(keys::DOC_MAN_DIR, EnvName::Exact("MANDIR"))?;
        decl.bind_flag(
            keys::DOC_MAN_SECTION,
            Flag::int("man-section")
                .help("Manual section")
                .default_value(keys::DEFAULT_MAN_SECTION),
        )
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let options = ManOptions {
                dir: PathBuf::from(config.get_string(keys::DOC_MAN_DIR)?),
                section: config.get_int(keys::DOC_MAN_SECTION)?.to_string(),
                source: man_source(self.product),
            };
            let written = docs::generate_man_pages(ctx.tree(), &options)?;
            info!(pages = written.len(), dir = %options.dir.display(), "generated man pages");
            ctx.println(format!(
                "Generated {} man pages in {}",
                written.len(),
                options.dir.join(format!("man{}", options.section)).display()
            ));
            Ok(())
        }
        .boxed_local()
    }
}

/// Writes markdown pages for the whole tree.
pub struct Markdown;

impl Command for Markdown {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        decl.bind_flag(
            keys::DOC_MARKDOWN_DIR,
            Flag::string("md-dir")
                .help("Directory for markdown pages")
                .default_value(keys::DEFAULT_MARKDOWN_DIR),
        )?;
        decl.bind_flag(
            keys::DOC_MARKDOWN_URL_PREFIX,
            Flag::string("md-url-prefix")
                .help("Prefix for links between pages")
                .default_value(keys::DEFAULT_MARKDOWN_URL_PREFIX),
        )
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let config = ctx.config();
            let dir = PathBuf::from(config.get_string(keys::DOC_MARKDOWN_DIR)?);
            let prefix = config.get_string(keys::DOC_MARKDOWN_URL_PREFIX)?;
            let written = docs::generate_markdown(ctx.tree(), &dir, &prefix)?;
            ctx.println(format!(
                "Generated {} markdown pages in {}",
                written.len(),
                dir.display()
            ));
            Ok(())
        }
        .boxed_local()
    }
}

/// Writes `<target>/<root>.sh`.
pub struct BashCompletion;

impl Command for BashCompletion {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        decl.bind_flag(
            keys::BASH_COMPLETION_TARGET,
            Flag::string("target")
                .help("Directory for the completion script")
                .default_value(keys::DEFAULT_BASH_COMPLETION_TARGET),
        )
    }

    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let dir = PathBuf::from(ctx.config().get_string(keys::BASH_COMPLETION_TARGET)?);
            let path = docs::generate_bash_completion(ctx.tree(), &dir)?;
            ctx.println(format!("Wrote bash completion to {}", path.display()));
            Ok(())
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::app;
    use crate::commands::stub::{Stub, run};
    use crate::keys::{MANTA_NAMESPACE, TRITON_NAMESPACE};

    fn count(dir: &std::path::Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn man_pages_land_in_section_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("tmp");
        let stub = Stub::new();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);
        let (code, term) = run(&d, &["triton", "doc", "man", "--man-dir", target.to_str().unwrap()]).await;
        assert_eq!(code, 0, "{}", term.errors());

        let section = target.join("man8");
        assert!(section.is_dir());
        let nodes = d.tree().walk().len();
        assert_eq!(count(&section), nodes);
        let root = fs::read_to_string(section.join("triton.8")).unwrap();
        assert!(root.contains(&format!("Triton {}", crate::version::VERSION)));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn man_section_is_configurable() {
        let tmp = tempfile::tempdir().unwrap();
        let stub = Stub::new();
        let d = stub.dispatcher(app::manta, MANTA_NAMESPACE);
        let dir = tmp.path().to_str().unwrap();
        let (code, term) = run(&d, &["manta", "doc", "man", "--man-dir", dir, "--man-section", "1"]).await;
        assert_eq!(code, 0, "{}", term.errors());
        assert!(tmp.path().join("man1").join("manta-ls.1").is_file());
    }

    #[tokio::test]
    async fn markdown_pages_link_with_prefix() {
        let tmp = tempfile::tempdir().unwrap();
        let stub = Stub::new();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);
        let dir = tmp.path().join("md");
        let (code, term) = run(
            &d,
            &["triton", "doc", "md", "--md-dir", dir.to_str().unwrap(), "--md-url-prefix", "/cli/"],
        )
        .await;
        assert_eq!(code, 0, "{}", term.errors());
        let root = fs::read_to_string(dir.join("triton.md")).unwrap();
        assert!(root.contains("/cli/triton_instances"));
    }

    #[tokio::test]
    async fn bash_completion_is_named_after_root() {
        let tmp = tempfile::tempdir().unwrap();
        let stub = Stub::new();
        let d = stub.dispatcher(app::triton, TRITON_NAMESPACE);
        let dir = tmp.path().to_str().unwrap();
        let (code, term) = run(&d, &["triton", "shell", "autocomplete", "bash", "--target", dir]).await;
        assert_eq!(code, 0, "{}", term.errors());
        assert!(tmp.path().join("triton.sh").is_file());
        assert!(term.output().starts_with("Wrote bash completion to "));
    }
}
