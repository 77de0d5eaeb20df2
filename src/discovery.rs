//! Release-branch discovery and "relevant version" selection
//!
//! Release branches follow naming conventions that have changed over time, so
//! every parser tries all supported patterns and fails hard on anything else;
//! silently extracting a wrong major would point an update at the wrong
//! branch. "Relevant" means the two most recent release lines, the ones still
//! shipping to users.

use regex::Regex;

use crate::engine::UpdateError;
use crate::forge::ForgeClient;
use crate::pins;
use crate::version::VersionError;

/// How many of the most recent release lines are considered for updates.
pub const RELEVANT_BRANCH_COUNT: usize = 2;

/// First Fenix major using the `releases_vN.0.0` convention; earlier
/// branches were named `releases/vN.0.0`.
const FENIX_UNDERSCORE_FIRST_MAJOR: u32 = 85;

/// Fenix release branches, both naming conventions.
pub fn fenix_release_branches(names: &[String]) -> Vec<String> {
    let re = Regex::new(r"^releases[_/]v\d+\.0\.0$").unwrap();
    names
        .iter()
        .filter(|name| re.is_match(name))
        .cloned()
        .collect()
}

/// Major version of a Fenix release branch name.
pub fn major_from_fenix_branch(name: &str) -> Result<u32, VersionError> {
    let re = Regex::new(r"^releases[_/]v(\d+)\.0\.0$").unwrap();
    re.captures(name)
        .and_then(|captures| captures[1].parse().ok())
        .ok_or_else(|| VersionError::UnexpectedBranchName(name.to_string()))
}

/// Fenix release branch name for a major version, honoring the convention
/// switch at major 85.
pub fn fenix_branch_for_major(major: u32) -> String {
    if major < FENIX_UNDERSCORE_FIRST_MAJOR {
        format!("releases/v{major}.0.0")
    } else {
        format!("releases_v{major}.0.0")
    }
}

/// Focus release branches (`releases_vN.0` only).
pub fn focus_release_branches(names: &[String]) -> Vec<String> {
    let re = Regex::new(r"^releases_v\d+\.0$").unwrap();
    names
        .iter()
        .filter(|name| re.is_match(name))
        .cloned()
        .collect()
}

/// Major version of a Focus release branch name.
pub fn major_from_focus_branch(name: &str) -> Result<u32, VersionError> {
    let re = Regex::new(r"^releases_v(\d+)\.0$").unwrap();
    re.captures(name)
        .and_then(|captures| captures[1].parse().ok())
        .ok_or_else(|| VersionError::UnexpectedBranchName(name.to_string()))
}

/// Focus release branch name for a major version.
pub fn focus_branch_for_major(major: u32) -> String {
    format!("releases_v{major}.0")
}

/// The most recent `RELEVANT_BRANCH_COUNT` majors, ascending.
pub fn recent_majors(mut majors: Vec<u32>) -> Vec<u32> {
    majors.sort_unstable();
    let skip = majors.len().saturating_sub(RELEVANT_BRANCH_COUNT);
    majors.split_off(skip)
}

/// Majors of the most recent Fenix release branches.
pub async fn recent_fenix_majors(
    forge: &ForgeClient,
    fenix_repo: &str,
) -> Result<Vec<u32>, UpdateError> {
    let branches = forge.list_branches(fenix_repo).await?;
    let majors = fenix_release_branches(&branches)
        .iter()
        .map(|name| major_from_fenix_branch(name))
        .collect::<Result<Vec<u32>, VersionError>>()?;
    Ok(recent_majors(majors))
}

/// Majors of the most recent Focus release branches.
pub async fn recent_focus_majors(
    forge: &ForgeClient,
    focus_repo: &str,
) -> Result<Vec<u32>, UpdateError> {
    let branches = forge.list_branches(focus_repo).await?;
    let majors = focus_release_branches(&branches)
        .iter()
        .map(|name| major_from_focus_branch(name))
        .collect::<Result<Vec<u32>, VersionError>>()?;
    Ok(recent_majors(majors))
}

/// Android-Components majors that could use an update check: the ones
/// embedded by the most recent Fenix release branches. This is the fan-out
/// driver for "update all relevant release branches".
pub async fn relevant_components_majors(
    forge: &ForgeClient,
    fenix_repo: &str,
) -> Result<Vec<u32>, UpdateError> {
    let mut majors = Vec::new();
    for fenix_major in recent_fenix_majors(forge, fenix_repo).await? {
        let branch = fenix_branch_for_major(fenix_major);
        let file = forge
            .get_file(fenix_repo, &pins::android_components_kt_path(""), &branch)
            .await?;
        let embedded = pins::embedded_components_version(&file.content)?;
        majors.push(embedded.major);
    }
    majors.sort_unstable();
    Ok(majors)
}
