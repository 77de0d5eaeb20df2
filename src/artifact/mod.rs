//! Latest-version lookups against the Mozilla Maven indexes
//!
//! Two indexes are in play: the release index at `maven.mozilla.org` and the
//! nightly index at `nightly.maven.mozilla.org`. Lookups read the artifact's
//! `maven-metadata.xml`, filter to a major-version constraint when one is
//! given, and select the maximum under the scheme's ordering. For GeckoView
//! the chosen candidate must also exist as the `-lite` artifact variant: the
//! two variants ship in lockstep, and a partial publish must never produce an
//! update proposal.

pub mod error;
pub mod manifest;
pub mod maven;

pub use error::ArtifactError;
pub use maven::MavenClient;
