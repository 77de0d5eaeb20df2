use thiserror::Error;

use crate::version::VersionError;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Artifact not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Could not find any {artifact} versions for major {major}")]
    NoVersions { artifact: String, major: String },

    #[error("{artifact} {version} has no lite variant yet")]
    IncompletePublication { artifact: String, version: String },

    #[error("Expected exactly one bundled {capability} version, found {found}")]
    BundledVersionConflict {
        capability: &'static str,
        found: usize,
    },

    #[error(transparent)]
    Version(#[from] VersionError),
}
