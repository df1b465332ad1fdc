use crate::types::Result;
use dialoguer::Confirm;
use std::io::IsTerminal;

/// Yes/no prompt. Without a terminal on stdin the default answer is used.
pub fn ask_confirmation(prompt: &str, default_yes: bool) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Ok(default_yes);
    }
    let choice = Confirm::new()
        .with_prompt(prompt)
        .default(default_yes)
        .show_default(true)
        .interact()?;
    Ok(choice)
}
