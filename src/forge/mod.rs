//! GitHub REST client
//!
//! The thin slice of the GitHub API the bot needs: read a file at a ref,
//! write it back with an author identity, check/create branches, open pull
//! requests, leave comments, list branches and release tags, create releases.
//! Writes carry the file's prior blob sha so a concurrent edit fails the
//! update instead of clobbering it.

pub mod client;
pub mod error;
pub mod types;

pub use client::{DEFAULT_BASE_URL, ForgeClient};
pub use error::ForgeError;
pub use types::{CommitAuthor, PullRequest, RepoFile};
