//! Colours for the menu, step log and configuration listing.

use owo_colors::Style;

/// Terminal styles; every field is plain until [`Styles::colorize`] runs,
/// so piped output and `NO_COLOR` stay free of escape codes.
#[derive(Default, Clone)]
pub struct Styles {
    /// Completed steps and keys that are set.
    pub success: Style,
    /// Recoverable problems and keys that are still missing.
    pub warning: Style,
    pub error: Style,
    /// Step currently running in the browser.
    pub step: Style,
    /// Keys in key/value listings.
    pub dim: Style,
    /// Menu title.
    pub header: Style,
}

impl Styles {
    /// Switch to the coloured palette once the terminal is known to support it.
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red();
        self.step = Style::new().cyan();
        self.dim = Style::new().dimmed();
        self.header = Style::new().bold().cyan();
    }
}
