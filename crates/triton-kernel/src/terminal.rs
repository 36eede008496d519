//! Buffered terminal output.
//!
//! Commands write into a [`Terminal`]; the dispatcher drains it once per
//! invocation, after the command returns, fails or panics.

use std::io::{self, IsTerminal, Write};
use std::process::{Command as Process, Stdio};

use tracing::debug;

/// Default pager when `$PAGER` is unset.
pub const DEFAULT_PAGER: &str = "less -R";

/// Destination for command output.
pub trait Terminal {
    /// Appends text to the pending output.
    fn write_str(&mut self, text: &str);

    /// Flushes pending output to its destination.
    fn drain(&mut self) -> io::Result<()>;

    /// Writes diagnostics immediately, bypassing the buffer.
    fn write_err(&mut self, text: &str) {
        let _ = io::stderr().write_all(text.as_bytes());
    }

    /// Enables or disables paging of the drained output.
    fn use_pager(&mut self, enabled: bool) {
        let _ = enabled;
    }
}

/// Terminal backed by the process stdout.
#[derive(Debug, Default)]
pub struct StdoutTerminal {
    buffer: String,
    pager: bool,
}

impl StdoutTerminal {
    /// Creates an empty terminal with paging disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn page(&self, text: &str) -> io::Result<()> {
        let pager = std::env::var("PAGER").unwrap_or_else(|_| DEFAULT_PAGER.to_string());
        let mut parts = pager.split_whitespace();
        let Some(program) = parts.next() else {
            return io::stdout().write_all(text.as_bytes());
        };
        debug!(pager = %pager, "paging output");
        let mut child = Process::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            // The reader may quit early; a broken pipe is not an error.
            match stdin.write_all(text.as_bytes()) {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
                _ => {}
            }
        }
        child.wait()?;
        Ok(())
    }
}

impl Terminal for StdoutTerminal {
    fn write_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn drain(&mut self) -> io::Result<()> {
        let text = std::mem::take(&mut self.buffer);
        if text.is_empty() {
            return Ok(());
        }
        if self.pager && io::stdout().is_terminal() {
            return self.page(&text);
        }
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    fn use_pager(&mut self, enabled: bool) {
        self.pager = enabled;
    }
}

/// In-memory terminal that records everything drained from it.
#[derive(Debug, Default)]
pub struct BufferTerminal {
    pending: String,
    output: String,
    errors: String,
    drains: usize,
    pager: bool,
}

impl BufferTerminal {
    /// Creates an empty terminal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything drained so far.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Diagnostics written to the error stream.
    #[must_use]
    pub fn errors(&self) -> &str {
        &self.errors
    }

    /// Text written but not yet drained.
    #[must_use]
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Number of times [`Terminal::drain`] was called.
    #[must_use]
    pub const fn drain_count(&self) -> usize {
        self.drains
    }

    /// Whether paging was requested.
    #[must_use]
    pub const fn pager_enabled(&self) -> bool {
        self.pager
    }
}

impl Terminal for BufferTerminal {
    fn write_str(&mut self, text: &str) {
        self.pending.push_str(text);
    }

    fn drain(&mut self) -> io::Result<()> {
        self.drains += 1;
        self.output.push_str(&std::mem::take(&mut self.pending));
        Ok(())
    }

    fn write_err(&mut self, text: &str) {
        self.errors.push_str(text);
    }

    fn use_pager(&mut self, enabled: bool) {
        self.pager = enabled;
    }
}
