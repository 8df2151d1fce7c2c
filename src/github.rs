//! Paginated starter kit lookup against the GitHub organization
//! repository listing.

use anyhow::{Context, Result};
use serde::Deserialize;

const API_ROOT: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("create-compute/", env!("CARGO_PKG_VERSION"));

/// A repository as surfaced to the rest of the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub full_name: String,
    pub description: String,
}

/// Wire shape of one entry in the organization repository listing.
#[derive(Debug, Deserialize)]
struct RepositoryEntry {
    full_name: String,
    description: Option<String>,
}

/// Every repository under `org` whose full name starts with
/// `{org}/{starts_with}`, in API order. Pages are fetched sequentially
/// until the API returns an empty one; there is no retry. A bearer token
/// is attached only when one is supplied; unauthenticated queries are
/// subject to stricter rate limits.
pub fn find_repos_start_with(
    token: Option<&str>,
    org: &str,
    starts_with: &str,
) -> Result<Vec<Repository>> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .build()?;

    let url = format!("{API_ROOT}/orgs/{org}/repos");

    collect_starting_with(org, starts_with, |page| {
        let mut request = client
            .get(&url)
            .query(&[("page", page)])
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }

        request
            .send()
            .context("Failed to connect to GitHub API")?
            .error_for_status()
            .context("GitHub repository listing failed")?
            .json::<Vec<RepositoryEntry>>()
            .context("Unexpected response from GitHub API")
    })
}

/// Drive `fetch_page` from page 1 until a page comes back empty, keeping
/// the entries whose full name matches the `{org}/{starts_with}` prefix.
fn collect_starting_with(
    org: &str,
    starts_with: &str,
    mut fetch_page: impl FnMut(u32) -> Result<Vec<RepositoryEntry>>,
) -> Result<Vec<Repository>> {
    let prefix = format!("{org}/{starts_with}");
    let mut results = Vec::new();

    let mut page = 1;
    loop {
        let entries = fetch_page(page)?;
        if entries.is_empty() {
            break;
        }

        for entry in entries {
            if entry.full_name.starts_with(&prefix) {
                results.push(Repository {
                    full_name: entry.full_name,
                    description: entry.description.unwrap_or_default(),
                });
            }
        }

        page += 1;
    }

    Ok(results)
}

/// URL convention the Fastly CLI accepts for a GitHub-hosted source.
pub fn repo_url(full_name: &str) -> String {
    format!("https://github.com/{full_name}")
}
