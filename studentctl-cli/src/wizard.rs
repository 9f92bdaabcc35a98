//! Wizard Mode - interactive fallback for missing arguments
//!
//! Every interactive command accepts its values as flags. Whatever is still
//! missing is asked for with `inquire` when stdin is a terminal; otherwise the
//! command fails with the name of the flag to pass.
//!
//! ```text
//! $ studentctl update-field --number 1234567890
//! ? Which field would you like to update?
//! > 1: name
//!   2: address
//!   3: age
//! ? Enter new name: Johnny
//! Name updated successfully
//! ```

use std::io::IsTerminal;

use anyhow::{bail, Context, Result};
use inquire::{Select, Text};
use studentctl_core::StudentField;

/// Check if we can prompt (stdin and stdout are both terminals)
pub fn can_prompt() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// Return `value` or ask for it.
///
/// `flag` is the long flag name reported when prompting is impossible.
pub fn text_or_prompt(value: Option<String>, flag: &str, prompt: &str) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }

    if !can_prompt() {
        bail!("missing --{flag} (not a terminal, cannot prompt)");
    }

    Text::new(prompt)
        .prompt()
        .with_context(|| format!("Failed to read {flag}"))
}

/// Field selector given on the command line, or picked from the menu.
///
/// A `--field` value is returned untouched so the caller can reject it.
pub enum FieldChoice {
    Given(String),
    Picked(StudentField),
}

pub fn field_or_prompt(value: Option<String>) -> Result<FieldChoice> {
    if let Some(value) = value {
        return Ok(FieldChoice::Given(value));
    }

    if !can_prompt() {
        bail!("missing --field (not a terminal, cannot prompt)");
    }

    let field = Select::new(
        "Which field would you like to update?",
        StudentField::ALL.to_vec(),
    )
    .prompt()
    .context("Failed to read field choice")?;

    Ok(FieldChoice::Picked(field))
}
