use dialoguer::Confirm;

use crate::cli::core::CommandError;

/// Yes/no prompt. Only used in interactive mode.
pub fn confirm_action(prompt: &str, default: bool) -> Result<bool, CommandError> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}
