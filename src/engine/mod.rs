//! The reconciliation engine
//!
//! One parameterized decision procedure drives every update, whatever the
//! dependency: compare the latest available version against the current pin,
//! decide to act or no-op, and stage the change (work branch, file patches,
//! pull request). The work-branch name is a function of the target, never of
//! the proposed version, so re-running while a proposal is in flight lands
//! in `BranchExists` instead of piling up duplicate branches.
//!
//! ```text
//! Start → Inspecting → {UpToDate, DryRun, BranchExists} | Staging → Proposed
//! ```

pub mod patch;

use std::cmp::Ordering;

use thiserror::Error;
use tracing::{info, warn};

use crate::artifact::ArtifactError;
use crate::forge::{CommitAuthor, ForgeClient, ForgeError};
use crate::version::VersionError;

pub use patch::FilePatch;

/// Error boundary for one (dependency, branch) reconciliation. A failure
/// here is logged and must never abort sibling combinations.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Forge(#[from] ForgeError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("Update to {path} resulted in no changes: maybe the file was already up to date?")]
    NothingChanged { path: String },

    #[error("Invalid patch pattern: {0}")]
    BadPattern(#[from] regex::Error),
}

/// Terminal state of one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The pin is already at (or ahead of) the latest available version.
    UpToDate,
    /// Dry-run mode: the proposal was logged and discarded.
    DryRun,
    /// The work branch already exists; a proposal is in flight and a human
    /// has to close or merge it first.
    BranchExists,
    /// A pull request was opened.
    Proposed { url: String },
}

/// A pending change, computed during inspection and either discarded or
/// realized in one pass. Never persisted.
#[derive(Debug, Clone)]
pub struct Proposal {
    /// Target repository, `owner/name`.
    pub repo: String,
    /// Branch the update lands on.
    pub base_branch: String,
    /// Deterministic work branch to stage the change under.
    pub work_branch: String,
    /// Display name of the dependency, for logs ("GeckoView Beta", "A-S").
    pub dependency: String,
    pub current: String,
    pub latest: String,
    pub title: String,
    pub body: String,
    pub patches: Vec<FilePatch>,
    /// Comment posted on the PR after opening, e.g. to request an extended
    /// CI run.
    pub follow_up_comment: Option<String>,
}

/// Decide and, when warranted, stage one update.
///
/// `ordering` is the comparison of the latest available version against the
/// current pin under the dependency's own scheme; the engine acts only on
/// `Greater`. Ties mean "already up to date".
pub async fn propose_update(
    forge: &ForgeClient,
    author: &CommitAuthor,
    dry_run: bool,
    ordering: Ordering,
    proposal: Proposal,
) -> Result<UpdateOutcome, UpdateError> {
    let Proposal {
        repo,
        base_branch,
        work_branch,
        dependency,
        current,
        latest,
        title,
        body,
        patches,
        follow_up_comment,
    } = proposal;

    if ordering != Ordering::Greater {
        warn!(
            "No newer {dependency} release than {current} found for {repo}:{base_branch}. Exiting."
        );
        return Ok(UpdateOutcome::UpToDate);
    }

    info!("We should update {repo}:{base_branch} with {dependency} {latest} (currently {current})");

    if dry_run {
        warn!("Dry-run so not continuing.");
        return Ok(UpdateOutcome::DryRun);
    }

    if forge.branch_exists(&repo, &work_branch).await? {
        warn!("The PR branch {work_branch} already exists. Exiting.");
        return Ok(UpdateOutcome::BranchExists);
    }

    let head = forge.branch_head(&repo, &base_branch).await?;
    info!("Last commit on {base_branch} is {head}");

    forge.create_branch(&repo, &work_branch, &head).await?;
    info!("Created branch {work_branch} on {head}");

    for patch in &patches {
        info!("Updating {}", patch.path);
        let file = forge.get_file(&repo, &patch.path, &work_branch).await?;
        let patched = patch.apply(&file.content)?;
        forge
            .update_file(&repo, &file, &patched, &patch.message, &work_branch, author)
            .await?;
    }

    info!("Creating pull request");
    let pr = forge
        .create_pull(&repo, &title, &body, &work_branch, &base_branch)
        .await?;
    info!("Pull request at {}", pr.html_url);

    if let Some(comment) = follow_up_comment {
        forge.create_issue_comment(&repo, pr.number, &comment).await?;
    }

    Ok(UpdateOutcome::Proposed { url: pr.html_url })
}
