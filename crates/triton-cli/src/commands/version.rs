//! `version`.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use triton_kernel::{Command, CommandNode, Context, Result};

/// Builds the `version` leaf; `user_agent` renders the printed string.
pub fn node(user_agent: fn() -> String) -> CommandNode {
    CommandNode::new("version", PrintVersion { user_agent })
        .short("Print the version")
        .silence_usage()
}

/// Prints the user-agent string.
pub struct PrintVersion {
    user_agent: fn() -> String,
}

impl Command for PrintVersion {
    fn run<'a>(&'a self, ctx: &'a mut Context<'_>) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            ctx.println((self.user_agent)());
            Ok(())
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use crate::app;
    use crate::commands::stub::{Stub, run};
    use crate::keys::{MANTA_NAMESPACE, TRITON_NAMESPACE};
    use crate::version::{manta_user_agent, triton_user_agent};

    #[tokio::test]
    async fn prints_user_agent() {
        let d = Stub::new().dispatcher(app::triton, TRITON_NAMESPACE);
        let (code, term) = run(&d, &["triton", "version"]).await;
        assert_eq!(code, 0);
        assert_eq!(term.output(), format!("{}\n", triton_user_agent()));

        let d = Stub::new().dispatcher(app::manta, MANTA_NAMESPACE);
        let (_, term) = run(&d, &["manta", "version"]).await;
        assert_eq!(term.output(), format!("{}\n", manta_user_agent()));
    }
}
