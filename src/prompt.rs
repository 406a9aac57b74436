use dialoguer::{Confirm, Input, theme::ColorfulTheme};

/// Abstraction over a string input prompt.
///
/// Implementors define how string input is collected from the user,
/// including any styling or interactivity. This trait enables testability
/// by decoupling user input from the logic that consumes it.
pub trait StringPrompter {
    /// Prompt the user for a string input.
    ///
    /// # Parameters
    /// - `prompt`: The message shown to the user.
    /// - `default`: Value used if the user presses Enter without input. An
    ///   empty default means an empty answer is accepted as-is.
    ///
    /// # Returns
    /// `Ok(String)` if input is successfully collected, or an `Err(String)` describing the failure.
    fn prompt(&mut self, prompt: &str, default: &str) -> Result<String, String>;
}

/// Abstraction over a boolean (yes/no) confirmation prompt.
///
/// This trait allows interactive confirmation to be injected or mocked,
/// promoting testability in CLI workflows.
pub trait ConfirmPrompter {
    /// Prompt the user for a yes/no confirmation.
    ///
    /// # Parameters
    /// - `prompt`: The confirmation message.
    /// - `default`: The default answer if the user presses Enter.
    ///
    /// # Returns
    /// `Ok(true)` if confirmed, `Ok(false)` if declined, or `Err(String)` on input failure.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, String>;
}

/// Default implementation of `StringPrompter` using `dialoguer::Input`.
///
/// Uses the `ColorfulTheme` for user-friendly styling.
pub struct DialoguerStringPrompter;

impl StringPrompter for DialoguerStringPrompter {
    fn prompt(&mut self, prompt: &str, default: &str) -> Result<String, String> {
        let theme = ColorfulTheme::default();
        let mut input = Input::<String>::with_theme(&theme).with_prompt(prompt);
        if default.is_empty() {
            input = input.allow_empty(true);
        } else {
            input = input.default(default.to_string());
        }
        match input.interact_text() {
            Ok(v) => Ok(v),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Default implementation of `ConfirmPrompter` using `dialoguer::Confirm`.
///
/// Displays a yes/no dialog with styling from `ColorfulTheme`.
pub struct DialoguerConfirmPrompter;

impl ConfirmPrompter for DialoguerConfirmPrompter {
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, String> {
        let theme = ColorfulTheme::default();
        let confirm = Confirm::with_theme(&theme)
            .with_prompt(prompt)
            .default(default);
        match confirm.interact() {
            Ok(v) => Ok(v),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Ask for the token that replaces `current` in `count` repositories.
///
/// The answer is trimmed. An empty answer means "leave this group alone".
///
/// # Returns
/// - `Ok(String)` containing the trimmed answer, possibly empty.
/// - `Err(String)` if the input could not be collected.
pub fn ask_token<P: StringPrompter>(
    prompter: &mut P,
    current: &str,
    count: usize,
) -> Result<String, String> {
    let noun = if count == 1 { "repository" } else { "repositories" };
    let prompt = format!(
        "New token for {} {} using `{}` (empty to skip)",
        count, noun, current
    );
    prompter.prompt(&prompt, "").map(|s| s.trim().to_string())
}

/// Ask whether the rewritten URL should be written to repository `id`.
///
/// Defaults to "no", so pressing Enter leaves the repository untouched.
pub fn confirm_change<P: ConfirmPrompter>(prompter: &mut P, id: &str) -> Result<bool, String> {
    let prompt = format!("Write new origin URL for {}?", id);
    prompter.confirm(&prompt, false)
}
