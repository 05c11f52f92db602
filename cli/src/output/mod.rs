//! Output formatting module

pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Styles;

use crate::domain::Workflow;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
}

impl OutputContext {
    /// Create output context from the environment. Colors are used only on a
    /// TTY and when `NO_COLOR` is unset.
    #[must_use]
    pub fn new() -> Self {
        let is_tty = Term::stdout().is_term();
        Self::with_colors(is_tty && std::env::var_os("NO_COLOR").is_none())
    }

    /// Create output context with colors forced on or off.
    #[must_use]
    pub fn with_colors(use_colors: bool) -> Self {
        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }
        Self {
            styles,
            is_tty: Term::stdout().is_term(),
        }
    }

    /// Print a success message prefixed with `✓`.
    pub fn success(&self, msg: &str) {
        println!("  {} {msg}", "✓".style(self.styles.success));
    }

    /// Print a warning message prefixed with `⚠`.
    pub fn warn(&self, msg: &str) {
        println!("  {} {msg}", "⚠".style(self.styles.warning));
    }

    /// Print an error message prefixed with `✗` to stderr.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print a section header.
    pub fn header(&self, msg: &str) {
        println!("  {}", msg.style(self.styles.header));
    }

    /// Print a key-value pair with the key dimmed.
    pub fn kv(&self, key: &str, value: &str) {
        println!("  {}  {value}", key.style(self.styles.dim));
    }

    /// Print the workflow menu.
    pub fn menu(&self) {
        println!();
        self.header("MoeMail auto-deploy");
        for (number, workflow) in (1..).zip(Workflow::ALL) {
            self.kv(&number.to_string(), workflow.label());
        }
        self.kv("0", "Exit");
        println!();
    }

    /// Print whether each of `keys` holds a value. Values are never shown.
    pub fn config_status(&self, keys: &[&str], is_set: impl Fn(&str) -> bool) {
        println!();
        self.header("Configuration");
        let width = keys.iter().map(|k| k.len()).max().unwrap_or(0);
        for key in keys {
            let status = if is_set(key) {
                format!("{}", "set".style(self.styles.success))
            } else {
                format!("{}", "not set".style(self.styles.warning))
            };
            self.kv(&format!("{key:<width$}"), &status);
        }
    }
}

impl Default for OutputContext {
    fn default() -> Self {
        Self::new()
    }
}
