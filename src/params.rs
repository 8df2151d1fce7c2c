//! Resolution of command line flags and interactive answers into the
//! final execution parameters.
//!
//! Each slot follows the same pattern: a supplied flag is validated and
//! used, otherwise the prompter is consulted. Flag conflicts are
//! rejected up front, before the first prompt, and cancelling any prompt
//! aborts the whole flow.

use anyhow::Result;
use colored::Colorize;
use thiserror::Error;

use crate::directory::{absolute_display, directory_status, DirectoryStatus};
use crate::github::{find_repos_start_with, repo_url, Repository};
use crate::language::Language;
use crate::prompts::{spinner, PromptOutcome, Prompter, SelectItem};
use crate::starter_kits::{
    default_starter_kit, full_name_to_short_name, known_starter_kits, short_name_to_full_name,
};

/// GitHub organization that publishes the official starter kits.
pub const STARTER_KIT_ORG: &str = "fastly";

/// Select value for the escape entries ("specify source directly",
/// "choose from GitHub").
const OTHER: &str = "__other";

const FROM_ALLOWED_URL_PREFIXES: &[&str] = &[
    "https://github.com/",
    "https://fiddle.fastly.dev/",
    "https://fiddle.fastlydemo.net/",
];

/// Raised when the user abandons a prompt or a flag value fails
/// validation. Carries the messages to show before exiting.
#[derive(Debug, Error)]
#[error("cancelled")]
pub struct CancelledError {
    pub messages: Vec<String>,
}

impl CancelledError {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }
}

impl Default for CancelledError {
    fn default() -> Self {
        Self::new()
    }
}

/// Command line options that feed parameter resolution.
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub directory: Option<String>,
    pub authors: Vec<String>,
    pub language: Option<String>,
    pub starter_kit: Option<String>,
    pub default_starter_kit: bool,
    pub list_starter_kits: bool,
    pub from: Option<String>,
}

/// Final configuration for one run. Built once, consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecParams {
    ListStarterKits { language: Option<Language> },
    Create(CreateParams),
}

/// Parameters for the create flow. `from` is always a concrete path or
/// URL by the time this exists, never a short name or bare language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateParams {
    pub directory: String,
    pub authors: Vec<String>,
    pub from: String,
}

/// Merge flags and interactive answers into [`ExecParams`].
pub fn build_exec_params(
    options: &CliOptions,
    prompter: &mut dyn Prompter,
) -> Result<ExecParams> {
    // Conflicting starter kit flags are rejected once, ahead of every
    // prompt and of the list-mode short circuit.
    if options.default_starter_kit && options.starter_kit.is_some() {
        return Err(CancelledError::with_message(
            "'starter-kit' cannot be used with 'default-starter-kit'.",
        )
        .into());
    }

    if options.list_starter_kits {
        let language = match options.language.as_deref() {
            Some(value) => Some(parse_language_flag(value)?),
            None => None,
        };
        return Ok(ExecParams::ListStarterKits { language });
    }

    let mut resolver = Resolver { options, prompter };

    let directory = resolver.resolve_directory()?;
    let authors = resolver.resolve_authors();
    let from = resolver.resolve_source()?;

    Ok(ExecParams::Create(CreateParams {
        directory,
        authors,
        from,
    }))
}

/// Validate a `--from` value or prompt response. `Some(message)`
/// rejects: sources must be local paths or https URLs on known hosts.
pub fn validate_from(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("Cannot be empty!".to_string());
    }
    if value.starts_with("http://") {
        return Some("URL must begin with https!".to_string());
    }
    if value.starts_with("https://")
        && !FROM_ALLOWED_URL_PREFIXES
            .iter()
            .any(|prefix| value.starts_with(prefix))
    {
        return Some("URL must belong to GitHub or Fastly Fiddle!".to_string());
    }
    None
}

/// Validate a prompted directory against the filesystem probe.
fn validate_directory(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("Cannot be empty!".to_string());
    }
    match directory_status(value) {
        DirectoryStatus::Available | DirectoryStatus::Empty => None,
        DirectoryStatus::NotDirectory => Some(format!("'{value}' exists and is not a directory!")),
        DirectoryStatus::NotEmpty => Some(format!("Directory '{value}' is not empty!")),
        DirectoryStatus::OtherError => Some(format!("'{value}' cannot be accessed!")),
    }
}

/// Query GitHub for the starter kits of `language`, with a spinner while
/// the paginated lookup runs.
pub fn query_github_starter_kits(language: Language) -> Result<Vec<Repository>> {
    let progress = spinner("Querying GitHub for starter kits...");
    let result = find_repos_start_with(
        None,
        STARTER_KIT_ORG,
        &format!("compute-starter-kit-{language}"),
    );
    progress.finish_and_clear();
    result
}

fn parse_language_flag(value: &str) -> Result<Language> {
    Language::from_alias(value).ok_or_else(|| {
        CancelledError::with_message(format!(
            "Invalid language value '{}'; must be one of: {}",
            value,
            Language::aliases().join(", ")
        ))
        .into()
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn note(message: impl AsRef<str>) {
    println!("{}", message.as_ref().dimmed());
}

struct Resolver<'a> {
    options: &'a CliOptions,
    prompter: &'a mut dyn Prompter,
}

impl Resolver<'_> {
    fn resolve_directory(&mut self) -> Result<String> {
        if let Some(directory) = non_empty(self.options.directory.as_deref()) {
            note(format!("Using directory: {}", absolute_display(directory)));
            return Ok(directory.to_string());
        }

        let outcome = self.prompter.text(
            "Specify the directory for your new application.",
            &validate_directory,
        )?;

        match outcome {
            PromptOutcome::Value(directory) => {
                note(format!("Using directory: {}", absolute_display(&directory)));
                Ok(directory)
            }
            PromptOutcome::Cancelled => Err(CancelledError::new().into()),
        }
    }

    fn resolve_authors(&self) -> Vec<String> {
        let authors: Vec<String> = self
            .options
            .authors
            .iter()
            .filter(|author| !author.is_empty())
            .cloned()
            .collect();

        if authors.is_empty() {
            note("Using empty authors list.");
        } else {
            note(format!("Using specified authors: {}", authors.join(", ")));
        }

        authors
    }

    fn resolve_source(&mut self) -> Result<String> {
        if let Some(from) = non_empty(self.options.from.as_deref()) {
            if let Some(message) = validate_from(from) {
                return Err(CancelledError::with_message(format!(
                    "Invalid source path or URL '{from}': {message}"
                ))
                .into());
            }
            note(format!("Using specified source path or URL: {from}"));
            return Ok(from.to_string());
        }

        match self.resolve_language()? {
            Some(language) => self.resolve_starter_kit(language),
            None => self.prompt_for_source(),
        }
    }

    fn resolve_language(&mut self) -> Result<Option<Language>> {
        if let Some(value) = non_empty(self.options.language.as_deref()) {
            let language = parse_language_flag(value)?;
            note(format!("Using specified language: {language}"));
            return Ok(Some(language));
        }

        let kit_flagged = self.options.default_starter_kit || self.options.starter_kit.is_some();

        let message = if kit_flagged {
            "Select a language for your Compute application."
        } else {
            "Select a language for your Compute application, or specify a starter kit."
        };

        let mut items: Vec<SelectItem> = Language::ALL
            .iter()
            .map(|language| SelectItem::new(language.as_str(), language.label()))
            .collect();

        if !kit_flagged {
            items.push(SelectItem::new(
                OTHER,
                "Specify starter kit or directory (path to an existing Compute app, \
                 GitHub URL of a starter kit, or Fastly Fiddle URL)",
            ));
        }

        match self.prompter.select(message, &items)? {
            // The escape entry parses to no language and routes to the
            // direct source prompt.
            PromptOutcome::Value(value) => Ok(Language::from_alias(&value)),
            PromptOutcome::Cancelled => Err(CancelledError::new().into()),
        }
    }

    fn prompt_for_source(&mut self) -> Result<String> {
        let outcome = self.prompter.text(
            "Specify the path to an existing Compute app, GitHub URL of a starter kit, \
             or Fastly Fiddle URL.",
            &validate_from,
        )?;

        match outcome {
            PromptOutcome::Value(from) => Ok(from),
            PromptOutcome::Cancelled => Err(CancelledError::new().into()),
        }
    }

    fn resolve_starter_kit(&mut self, language: Language) -> Result<String> {
        let default_kit = default_starter_kit(language);

        if self.options.default_starter_kit {
            note(format!("Using default starter kit for '{language}'."));
            return Ok(repo_url(default_kit.full_name));
        }

        if let Some(short_name) = non_empty(self.options.starter_kit.as_deref()) {
            // Any short name is accepted here; kits beyond the static
            // catalog may exist on GitHub.
            note(format!("Using specified starter kit: {short_name}"));
            let full_name = short_name_to_full_name(language, short_name);
            return Ok(repo_url(&full_name));
        }

        let mut items: Vec<SelectItem> = known_starter_kits(language)
            .iter()
            .map(|kit| -> Result<SelectItem> {
                let short_name = full_name_to_short_name(language, kit.full_name)?;
                Ok(SelectItem::new(
                    kit.full_name,
                    format!("[{short_name}] {}", kit.description),
                ))
            })
            .collect::<Result<_>>()?;
        items.push(SelectItem::new(OTHER, "Choose a starter kit from GitHub."));

        let mut selection = match self.prompter.select("Select a starter kit", &items)? {
            PromptOutcome::Value(value) => value,
            PromptOutcome::Cancelled => return Err(CancelledError::new().into()),
        };

        if selection == OTHER {
            let mut kits = query_github_starter_kits(language)?;

            if kits.is_empty() {
                return Err(CancelledError::with_message(format!(
                    "No starter kits found on GitHub for '{language}'."
                ))
                .into());
            }

            // Surface the default kit first when GitHub returns it.
            if let Some(index) = kits
                .iter()
                .position(|kit| kit.full_name == default_kit.full_name)
            {
                let default_entry = kits.remove(index);
                kits.insert(0, default_entry);
            }

            let items: Vec<SelectItem> = kits
                .iter()
                .map(|kit| -> Result<SelectItem> {
                    let short_name = full_name_to_short_name(language, &kit.full_name)?;
                    Ok(SelectItem::new(
                        kit.full_name.clone(),
                        format!("[{short_name}] {}", kit.description),
                    ))
                })
                .collect::<Result<_>>()?;

            selection = match self.prompter.select("Select a starter kit", &items)? {
                PromptOutcome::Value(value) => value,
                PromptOutcome::Cancelled => return Err(CancelledError::new().into()),
            };
        }

        Ok(repo_url(&selection))
    }
}
