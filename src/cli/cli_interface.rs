use dialoguer::theme::ColorfulTheme;

use crate::Interface;

/// Talks to the user through the terminal.
#[derive(Default)]
pub struct CliInterface {}

impl Interface for CliInterface {
    fn confirm(&self, msg: &str) -> miette::Result<bool> {
        let theme = ColorfulTheme {
            active_item_style: console::Style::new().for_stderr().magenta(),
            ..ColorfulTheme::default()
        };

        let outcome = dialoguer::Confirm::with_theme(&theme)
            .with_prompt(msg)
            .default(false)
            .show_default(true)
            .interact_opt();
        Ok(answer_from_prompt(outcome, |msg| self.warning(msg)))
    }

    fn message(&self, msg: &str) {
        eprintln!("{msg}");
    }

    fn success(&self, msg: &str) {
        eprintln!("{}{msg}", console::style(console::Emoji("✔ ", "")).green());
    }

    fn warning(&self, msg: &str) {
        eprintln!(
            "{}{msg}",
            console::style(console::Emoji("⚠️ ", "")).yellow(),
        );
    }

    fn error(&self, msg: &str) {
        eprintln!("{}{msg}", console::style(console::Emoji("❌ ", "")).red());
    }
}

/// Without a terminal to ask, or when the prompt is aborted, the answer is no.
fn answer_from_prompt(
    outcome: dialoguer::Result<Option<bool>>,
    warn: impl FnOnce(&str),
) -> bool {
    match outcome {
        Ok(answer) => answer == Some(true),
        Err(e) => {
            tracing::debug!("confirmation prompt failed: {e}");
            warn(&format!("Cannot ask for confirmation ({e}), assuming no"));
            false
        }
    }
}
