//! Per-product update tasks
//!
//! Each task enumerates its (dependency × branch) combinations and feeds
//! them through the reconciliation engine one at a time. Combinations are
//! independent: a failure is logged with its context and the task moves on
//! to the next one.

pub mod android_components;
pub mod embedded;
pub mod fenix;
pub mod focus_android;
pub mod reference_browser;

use crate::artifact::MavenClient;
use crate::forge::{CommitAuthor, ForgeClient};

/// Shared collaborators for one bot run.
pub struct TaskContext<'a> {
    pub forge: &'a ForgeClient,
    pub maven: &'a MavenClient,
    pub author: &'a CommitAuthor,
    pub dry_run: bool,
}
