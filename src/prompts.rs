//! Terminal interaction behind a capability trait, so the resolution
//! flow can be driven by a scripted responder in tests.

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::borrow::Cow;
use std::io;
use std::time::Duration;

/// Outcome of one interactive step. `Cancelled` means the user abandoned
/// the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome<T> {
    Value(T),
    Cancelled,
}

/// One selectable entry: the value handed back to the flow, and the
/// label shown to the user.
#[derive(Debug, Clone)]
pub struct SelectItem {
    pub value: String,
    pub label: String,
}

impl SelectItem {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Validator for text prompts. `Some(message)` rejects the input and the
/// prompt re-asks; `None` accepts.
pub type TextValidator<'a> = &'a dyn Fn(&str) -> Option<String>;

pub trait Prompter {
    fn select(&mut self, message: &str, items: &[SelectItem]) -> Result<PromptOutcome<String>>;
    fn text(&mut self, message: &str, validate: TextValidator) -> Result<PromptOutcome<String>>;
    fn confirm(&mut self, message: &str) -> Result<PromptOutcome<bool>>;
}

/// Terminal implementation backed by dialoguer.
#[derive(Default)]
pub struct ConsolePrompter {
    theme: ColorfulTheme,
}

impl Prompter for ConsolePrompter {
    fn select(&mut self, message: &str, items: &[SelectItem]) -> Result<PromptOutcome<String>> {
        let labels: Vec<&str> = items.iter().map(|item| item.label.as_str()).collect();

        let choice = Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(&labels)
            .default(0)
            .interact_opt()?;

        Ok(match choice {
            Some(index) => PromptOutcome::Value(items[index].value.clone()),
            None => PromptOutcome::Cancelled,
        })
    }

    fn text(&mut self, message: &str, validate: TextValidator) -> Result<PromptOutcome<String>> {
        let result = Input::<String>::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty(true)
            .validate_with(|input: &String| match validate(input) {
                Some(message) => Err(message),
                None => Ok(()),
            })
            .interact_text();

        match result {
            Ok(value) => Ok(PromptOutcome::Value(value)),
            Err(dialoguer::Error::IO(err)) if err.kind() == io::ErrorKind::Interrupted => {
                Ok(PromptOutcome::Cancelled)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn confirm(&mut self, message: &str) -> Result<PromptOutcome<bool>> {
        let choice = Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(true)
            .interact_opt()?;

        Ok(match choice {
            Some(value) => PromptOutcome::Value(value),
            None => PromptOutcome::Cancelled,
        })
    }
}

/// Start a steady-tick spinner with `message`. The caller clears it when
/// the step completes.
pub fn spinner(message: impl Into<Cow<'static, str>>) -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_message(message);
    progress
}
