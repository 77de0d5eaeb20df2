//! Environment-derived settings
//!
//! Everything configurable is resolved once at startup; nothing in the
//! engine falls back to a baked-in default at decision time.

use anyhow::anyhow;

use crate::forge::CommitAuthor;

/// Organization the repositories live under, unless overridden.
pub const DEFAULT_ORGANIZATION: &str = "mozilla-mobile";
/// Commit author identity used when none is configured.
pub const DEFAULT_AUTHOR_NAME: &str = "MickeyMoz";
pub const DEFAULT_AUTHOR_EMAIL: &str = "sebastian@mozilla.com";

/// Runtime settings, resolved from the environment at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub token: String,
    pub organization: String,
    pub author: CommitAuthor,
    pub dry_run: bool,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Settings> {
        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through an injectable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Settings> {
        let token = lookup("GITHUB_TOKEN").ok_or_else(|| anyhow!("No GITHUB_TOKEN set"))?;
        let organization =
            lookup("GITHUB_REPOSITORY_OWNER").unwrap_or_else(|| DEFAULT_ORGANIZATION.to_string());
        let author = CommitAuthor {
            name: lookup("AUTHOR_NAME").unwrap_or_else(|| DEFAULT_AUTHOR_NAME.to_string()),
            email: lookup("AUTHOR_EMAIL").unwrap_or_else(|| DEFAULT_AUTHOR_EMAIL.to_string()),
        };
        // Only the literal "True" enables dry-run.
        let dry_run = lookup("DRY_RUN").is_some_and(|value| value == "True");

        Ok(Settings {
            token,
            organization,
            author,
            dry_run,
        })
    }

    /// Fully qualified repository name under the configured organization.
    pub fn repo(&self, name: &str) -> String {
        format!("{}/{name}", self.organization)
    }
}
