//! Console implementation of the `Operator` port (dialoguer prompts).
//!
//! Malformed menu and domain answers are rejected by the prompt itself and
//! asked again; they never reach the workflows.

use anyhow::{Context, Result};
use dialoguer::{Input, Password};

use crate::application::ports::Operator;
use crate::domain::workflow::parse_menu_choice;
use crate::domain::{MenuChoice, SiteDomain};

/// The operator at an interactive terminal.
#[derive(Debug, Default)]
pub struct ConsoleOperator;

impl ConsoleOperator {
    /// Ask for a menu choice in the range 0–4.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    pub fn choose(&self) -> Result<MenuChoice> {
        let answer: String = Input::new()
            .with_prompt("Choose an option")
            .validate_with(|input: &String| parse_menu_choice(input).map(|_| ()))
            .interact_text()
            .context("menu choice")?;
        Ok(parse_menu_choice(&answer)?)
    }
}

impl Operator for ConsoleOperator {
    fn pause(&self, message: &str) -> Result<()> {
        let _: String = Input::new()
            .with_prompt(message)
            .allow_empty(true)
            .show_default(false)
            .interact_text()
            .context("waiting for Enter")?;
        Ok(())
    }

    fn ask_secret(&self, prompt: &str) -> Result<String> {
        Password::new()
            .with_prompt(prompt)
            .interact()
            .context("secret input")
    }

    fn ask_domain(&self) -> Result<SiteDomain> {
        let answer: String = Input::new()
            .with_prompt("MoeMail site URL (e.g. https://mail.example.com)")
            .validate_with(|input: &String| SiteDomain::parse(input).map(|_| ()))
            .interact_text()
            .context("domain input")?;
        Ok(SiteDomain::parse(&answer)?)
    }
}
