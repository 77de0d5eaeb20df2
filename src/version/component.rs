//! Dotted component versions (`MAJOR.MINOR.PATCH`)
//!
//! Used for Android-Components and Glean releases. Release versions look like
//! `63.0.2`; Nightly builds record a 14-digit build timestamp in the PATCH
//! slot (`64.0.20201027143116`), which is why PATCH is a `u64`. Both forms
//! order correctly under plain tuple comparison.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::version::error::VersionError;

/// A validated `MAJOR.MINOR.PATCH` version.
///
/// Field order matters: the derived `Ord` is the lexicographic comparison of
/// the `(major, minor, patch)` tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ComponentVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u64,
}

impl ComponentVersion {
    /// The version with the PATCH component incremented by one, used when a
    /// GeckoView bump on a release branch also ships a new dot release.
    pub fn next_patch(&self) -> ComponentVersion {
        ComponentVersion {
            major: self.major,
            minor: self.minor,
            patch: self.patch + 1,
        }
    }

    /// Extract the version from a release tag. `v63.0.2` yields `63.0.2`.
    pub fn from_tag(tag: &str) -> Result<ComponentVersion, VersionError> {
        let version = tag
            .strip_prefix('v')
            .ok_or_else(|| VersionError::InvalidTag(tag.to_string()))?;
        version
            .parse()
            .map_err(|_| VersionError::InvalidTag(tag.to_string()))
    }
}

impl FromStr for ComponentVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = Regex::new(r"^(\d+)\.(\d+)\.(\d+)$").unwrap();
        let invalid = || VersionError::InvalidFormat {
            scheme: "component",
            value: s.to_string(),
        };
        let captures = format.captures(s).ok_or_else(invalid)?;
        Ok(ComponentVersion {
            major: captures[1].parse().map_err(|_| invalid())?,
            minor: captures[2].parse().map_err(|_| invalid())?,
            patch: captures[3].parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for ComponentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
