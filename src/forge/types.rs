use serde::Deserialize;

/// Commit author identity used for every file write the bot makes.
#[derive(Debug, Clone)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

/// A file read through the contents API, decoded, with the blob sha needed
/// to write it back safely.
#[derive(Debug, Clone)]
pub struct RepoFile {
    pub path: String,
    pub sha: String,
    pub content: String,
}

/// An opened pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
}
