//! Binding to the Fastly CLI, the delegate tool that performs the
//! actual project creation.

use anyhow::{bail, Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::params::CreateParams;

const FASTLY_BIN: &str = "fastly";
const VERSION_PATTERN: &str = r"^Fastly CLI version (v\d+\.\d+\.\d)";

fn resolve_cli_path(path_override: Option<&Path>) -> Option<PathBuf> {
    match path_override {
        Some(path) => Some(path.to_path_buf()),
        None => which::which(FASTLY_BIN).ok(),
    }
}

/// Version reported by the Fastly CLI, or `None` when the binary is
/// missing, exits non-zero, or prints something unrecognizable.
pub fn fastly_cli_version(path_override: Option<&Path>) -> Option<String> {
    let program = resolve_cli_path(path_override)?;

    let output = Command::new(&program).arg("version").output().ok()?;
    if !output.status.success() {
        return None;
    }

    parse_version_output(&String::from_utf8_lossy(&output.stdout))
}

fn parse_version_output(stdout: &str) -> Option<String> {
    let pattern = Regex::new(VERSION_PATTERN).ok()?;
    pattern
        .captures(stdout)
        .and_then(|captures| captures.get(1))
        .map(|matched| matched.as_str().to_string())
}

fn build_args(params: &CreateParams) -> Vec<String> {
    let mut args = vec![
        "compute".to_string(),
        "init".to_string(),
        "--non-interactive".to_string(),
        "--quiet".to_string(),
        format!("--directory={}", params.directory),
        // The CLI's language marker is fixed; the actual language comes
        // from the source the kit was resolved to.
        "--language=javascript".to_string(),
        format!("--from={}", params.from),
    ];

    if params.authors.is_empty() {
        args.push("--author=".to_string());
    } else {
        for author in &params.authors {
            args.push(format!("--author={author}"));
        }
    }

    args
}

/// Run `fastly compute init` with the resolved parameters. The child's
/// stdout is suppressed; stderr passes through for diagnostics. Fails on
/// a non-zero exit.
pub fn exec_fastly_cli(path_override: Option<&Path>, params: &CreateParams) -> Result<()> {
    let Some(program) = resolve_cli_path(path_override) else {
        bail!("Fastly CLI not found in the system path");
    };

    let status = Command::new(&program)
        .args(build_args(params))
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to launch Fastly CLI at {}", program.display()))?;

    if !status.success() {
        bail!("Failed initializing Compute application");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_version_line() {
        let stdout = "Fastly CLI version v10.7.0 (2023-09-15)\nBuilt with go version go1.21\n";
        assert_eq!(parse_version_output(stdout), Some("v10.7.0".to_string()));
    }

    #[test]
    fn test_rejects_unexpected_version_output() {
        assert_eq!(parse_version_output("fastly 10.7.0"), None);
        assert_eq!(parse_version_output(""), None);
        // The pattern is anchored to the start of the output.
        assert_eq!(
            parse_version_output("note\nFastly CLI version v10.7.0"),
            None,
        );
    }

    #[test]
    fn test_args_with_authors() {
        let params = CreateParams {
            directory: "./app".to_string(),
            authors: vec!["a@x.com".to_string(), "b@x.com".to_string()],
            from: "https://github.com/fastly/compute-starter-kit-javascript-default".to_string(),
        };

        assert_eq!(
            build_args(&params),
            vec![
                "compute",
                "init",
                "--non-interactive",
                "--quiet",
                "--directory=./app",
                "--language=javascript",
                "--from=https://github.com/fastly/compute-starter-kit-javascript-default",
                "--author=a@x.com",
                "--author=b@x.com",
            ],
        );
    }

    #[test]
    fn test_empty_author_list_emits_single_empty_author() {
        let params = CreateParams {
            directory: "./app".to_string(),
            authors: Vec::new(),
            from: "./local-template".to_string(),
        };

        let args = build_args(&params);
        assert_eq!(args.last().map(String::as_str), Some("--author="));
        assert_eq!(args.iter().filter(|a| a.starts_with("--author")).count(), 1);
    }
}
