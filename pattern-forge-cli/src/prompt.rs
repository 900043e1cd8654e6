//! Interactive input
//!
//! Commands ask for missing values through [`Prompter`]. On a terminal that
//! is a dialoguer prompt; otherwise a missing value is an error naming the
//! flag that supplies it.

use anyhow::{bail, Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use std::fmt;

/// Source of answers for missing command input
pub trait Prompter {
    /// Yes/no question
    ///
    /// # Errors
    ///
    /// Returns an error if no answer can be obtained.
    fn confirm(&self, question: &str, default: bool, flag: &str) -> Result<bool>;

    /// Free text; `flag` is the option that makes the question unnecessary
    ///
    /// # Errors
    ///
    /// Returns an error if no answer can be obtained.
    fn input(&self, question: &str, default: Option<&str>, flag: &str) -> Result<String>;
}

/// Terminal prompts
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    /// Prompts using the colorful theme
    #[must_use]
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl fmt::Debug for DialoguerPrompter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialoguerPrompter").finish_non_exhaustive()
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, question: &str, default: bool, _flag: &str) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(question)
            .default(default)
            .interact()
            .context("Failed to read answer")
    }

    fn input(&self, question: &str, default: Option<&str>, _flag: &str) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme).with_prompt(question);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        let answer = input.interact_text().context("Failed to read answer")?;
        Ok(answer.trim().to_string())
    }
}

/// Never asks; every question is an error
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractive;

impl Prompter for NonInteractive {
    fn confirm(&self, question: &str, _default: bool, flag: &str) -> Result<bool> {
        bail!("{question} (not running interactively: pass {flag})")
    }

    fn input(&self, question: &str, _default: Option<&str>, flag: &str) -> Result<String> {
        bail!("{question} is required when not running interactively: pass {flag}")
    }
}

/// Prompter suited to the current terminal
///
/// Prompts are drawn on stderr, so stderr must be a terminal.
#[must_use]
pub fn detect(no_interaction: bool) -> Box<dyn Prompter> {
    if no_interaction || !console::user_attended_stderr() {
        tracing::debug!("prompts disabled");
        Box::new(NonInteractive)
    } else {
        Box::new(DialoguerPrompter::new())
    }
}

/// Use `value` when present, otherwise ask
///
/// # Errors
///
/// Returns an error if the prompter cannot answer.
pub fn value_or_ask(
    prompter: &dyn Prompter,
    value: Option<String>,
    question: &str,
    default: Option<&str>,
    flag: &str,
) -> Result<String> {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(value) => Ok(value),
        None => prompter.input(question, default, flag),
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    use super::{Prompter, Result};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays canned answers and records the questions asked
    #[derive(Debug, Default)]
    pub struct Scripted {
        answers: RefCell<VecDeque<String>>,
        pub asked: RefCell<Vec<String>>,
    }

    impl Scripted {
        pub fn new(answers: &[&str]) -> Self {
            Self {
                answers: RefCell::new(answers.iter().map(ToString::to_string).collect()),
                asked: RefCell::default(),
            }
        }

        fn next(&self, question: &str, default: Option<String>) -> String {
            self.asked.borrow_mut().push(question.to_string());
            let answer = self.answers.borrow_mut().pop_front().unwrap_or_default();
            if answer.is_empty() {
                default.unwrap_or_default()
            } else {
                answer
            }
        }
    }

    impl Prompter for Scripted {
        fn confirm(&self, question: &str, default: bool, _flag: &str) -> Result<bool> {
            Ok(self.next(question, Some(default.to_string())) == "true")
        }

        fn input(&self, question: &str, default: Option<&str>, _flag: &str) -> Result<String> {
            Ok(self.next(question, default.map(ToString::to_string)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_interactive_names_flag() {
        let err = NonInteractive.input("Pattern name", None, "NAME").unwrap_err();
        assert!(err.to_string().contains("pass NAME"));

        let err = NonInteractive
            .confirm("Do you want to create a model?", false, "--model or --no-model")
            .unwrap_err();
        assert!(err.to_string().contains("--no-model"));
    }

    #[test]
    fn test_value_or_ask_prefers_value() {
        let prompter = scripted::Scripted::new(&["Asked"]);
        let value = value_or_ask(&prompter, Some(" User ".into()), "Pattern name", None, "NAME").unwrap();
        assert_eq!(value, "User");
        assert!(prompter.asked.borrow().is_empty());

        let value = value_or_ask(&prompter, Some("  ".into()), "Pattern name", None, "NAME").unwrap();
        assert_eq!(value, "Asked");
    }

    #[test]
    fn test_dialoguer_prompter_debug() {
        let rendered = format!("{:?}", DialoguerPrompter::default());
        assert_eq!(rendered, "DialoguerPrompter { .. }");
    }

    #[test]
    fn test_scripted_defaults() {
        let prompter = scripted::Scripted::new(&[""]);
        assert_eq!(prompter.input("Table", Some("users"), "--table").unwrap(), "users");
    }
}
