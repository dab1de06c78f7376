//! Collaborators supplied by whatever runs the commands.

/// Receives user-facing messages.
pub trait Notifier {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Blocking user prompts. `None` means the user cancelled.
pub trait Prompter {
    fn input(&self, prompt: &str) -> Option<String>;
    fn select(&self, prompt: &str, items: &[String]) -> Option<String>;
}
