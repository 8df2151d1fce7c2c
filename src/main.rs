use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use create_compute::directory::{absolute_display, directory_status, DirectoryStatus};
use create_compute::fastly::{exec_fastly_cli, fastly_cli_version};
use create_compute::language::Language;
use create_compute::params::{
    build_exec_params, query_github_starter_kits, CancelledError, CliOptions, CreateParams,
    ExecParams,
};
use create_compute::prompts::{spinner, ConsolePrompter, PromptOutcome, Prompter};
use create_compute::starter_kits::full_name_to_short_name;

#[derive(Parser)]
#[command(
    name = "create-compute",
    version = env!("CARGO_PKG_VERSION"),
    about = "A CLI for creating new JavaScript (TypeScript) applications on Fastly Compute",
    long_about = None
)]
struct Cli {
    /// Directory to create the new application in. Must not already exist.
    #[arg(long, value_name = "pathspec")]
    directory: Option<String>,

    /// Author(s) to set in fastly.toml. May be repeated.
    #[arg(long = "author", value_name = "author-name")]
    authors: Vec<String>,

    /// Language of the new application: javascript, typescript, js or ts.
    /// Cannot be used with --from.
    #[arg(long, value_name = "lang")]
    language: Option<String>,

    /// Starter kit short name for the selected language. Kits outside the
    /// known catalog are allowed if they exist on GitHub. Cannot be used
    /// with --default-starter-kit or --from.
    #[arg(long = "starter-kit", value_name = "id")]
    starter_kit: Option<String>,

    /// Use the default starter kit for the selected language.
    #[arg(long = "default-starter-kit")]
    default_starter_kit: bool,

    /// List the starter kits published on GitHub and exit.
    #[arg(long = "list-starter-kits")]
    list_starter_kits: bool,

    /// Path to a directory with a fastly.toml, a GitHub repo URL of a
    /// starter kit, or a Fastly Fiddle URL, used as the starting point of
    /// the new application. Cannot be used with --language or
    /// --starter-kit.
    #[arg(long, value_name = "pathspec-or-url")]
    from: Option<String>,

    /// Path to the fastly CLI command. Defaults to the one on the system
    /// path.
    #[arg(long = "fastly-cli-path", value_name = "pathspec")]
    fastly_cli_path: Option<PathBuf>,

    /// Do not show a confirmation prompt before creating the application.
    #[arg(long = "no-confirm")]
    no_confirm: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version print to stdout and succeed; real
            // parse errors exit 1.
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            process::exit(code);
        }
    };

    process::exit(match run(cli) {
        Ok(code) => code,
        Err(err) => {
            if let Some(cancelled) = err.downcast_ref::<CancelledError>() {
                if cancelled.messages.is_empty() {
                    eprintln!("{}", "Canceled.".red());
                } else {
                    for message in &cancelled.messages {
                        eprintln!("{}", message.red());
                    }
                }
            } else {
                eprintln!("{} {err:#}", "✗".red().bold());
            }
            1
        }
    });
}

fn run(cli: Cli) -> Result<i32> {
    println!("{}", "create-compute".bold().blue());
    println!(
        "{}",
        "Scaffolds a JavaScript (TypeScript) application on Fastly Compute.\n".dimmed()
    );

    let fastly_cli_path = cli.fastly_cli_path.clone();
    let no_confirm = cli.no_confirm;

    // List mode never invokes the delegate tool, so only the create flow
    // needs the preflight version check.
    if !cli.list_starter_kits && !preflight_fastly_cli(fastly_cli_path.as_deref()) {
        return Ok(1);
    }

    let options = CliOptions {
        directory: cli.directory,
        authors: cli.authors,
        language: cli.language,
        starter_kit: cli.starter_kit,
        default_starter_kit: cli.default_starter_kit,
        list_starter_kits: cli.list_starter_kits,
        from: cli.from,
    };

    let mut prompter = ConsolePrompter::default();
    let params = build_exec_params(&options, &mut prompter)?;

    match params {
        ExecParams::ListStarterKits { language } => {
            list_starter_kits(language)?;
            Ok(0)
        }
        ExecParams::Create(params) => {
            create_application(&params, fastly_cli_path.as_deref(), no_confirm, &mut prompter)
        }
    }
}

/// Resolve and announce the delegate tool's version. Returns false when
/// the tool is unusable, after printing guidance.
fn preflight_fastly_cli(path_override: Option<&Path>) -> bool {
    if let Some(path) = path_override {
        println!(
            "{}",
            format!("Using specified fastly-cli-path: {}.", path.display()).dimmed()
        );
    }

    match fastly_cli_version(path_override) {
        Some(version) => {
            println!("Found Fastly CLI {version}");
            true
        }
        None => {
            eprintln!("{}", "Unable to obtain Fastly CLI version.".red());
            match path_override {
                Some(path) => eprintln!(
                    "Check to make sure that the specified Fastly CLI path '{}' is correct.",
                    path.display()
                ),
                None => eprintln!(
                    "Check to make sure that Fastly CLI is in the system path. \
                     Alternatively specify the path using --fastly-cli-path."
                ),
            }
            false
        }
    }
}

fn list_starter_kits(language: Option<Language>) -> Result<()> {
    let languages = match language {
        Some(language) => vec![language],
        None => Language::ALL.to_vec(),
    };

    for language in languages {
        let kits = query_github_starter_kits(language)?;

        println!("{}", format!("{} starter kits:", language.label()).bold());
        if kits.is_empty() {
            println!("  (none found)");
        }
        for kit in kits {
            let short_name = full_name_to_short_name(language, &kit.full_name)?;
            println!("  [{}] {}", short_name.cyan(), kit.description);
        }
        println!();
    }

    Ok(())
}

fn create_application(
    params: &CreateParams,
    fastly_cli_path: Option<&Path>,
    no_confirm: bool,
    prompter: &mut dyn Prompter,
) -> Result<i32> {
    if no_confirm {
        println!("{}", "Using specified no-confirm value: true".dimmed());
    } else {
        let confirmed =
            prompter.confirm("Confirm creation of Compute application with above options.")?;
        if confirmed != PromptOutcome::Value(true) {
            eprintln!("{}", "Canceled.".red());
            return Ok(1);
        }
    }

    let app_directory = absolute_display(&params.directory);

    match directory_status(&params.directory) {
        DirectoryStatus::Available => {
            let progress = spinner(format!("Creating application directory {app_directory}..."));
            let result = fs::create_dir(&params.directory);
            progress.finish_and_clear();
            result.with_context(|| format!("Failed to create directory {app_directory}"))?;
            println!("Directory created.");
        }
        // An existing empty directory is used as-is.
        DirectoryStatus::Empty => {}
        DirectoryStatus::NotDirectory => {
            anyhow::bail!("'{}' exists and is not a directory", params.directory)
        }
        DirectoryStatus::NotEmpty => {
            anyhow::bail!("Directory '{}' is not empty", params.directory)
        }
        DirectoryStatus::OtherError => anyhow::bail!("Cannot access '{}'", params.directory),
    }

    let progress = spinner("Creating and initializing application, this can take a few minutes...");
    let result = exec_fastly_cli(fastly_cli_path, params);
    progress.finish_and_clear();
    result?;

    println!(
        "{} Application created at {}.",
        "✓".green().bold(),
        app_directory
    );
    println!("\n{}", "Process completed!".green());
    Ok(0)
}
