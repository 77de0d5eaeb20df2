//! Reading dependency pins out of consumer build files
//!
//! Pins are recorded as constants in Kotlin build sources (`Gecko.kt`,
//! `DependenciesPlugin.kt`, `AndroidComponents.kt`) and in the plain-text
//! `version.txt`. Extraction is exact-token regex matching, never general
//! parsing; a file that does not carry the expected token is a hard failure.

use std::str::FromStr;

use regex::Regex;

use crate::version::{
    AppServicesChannel, Channel, ComponentVersion, GeckoVersion, VersionError,
};

/// First Android-Components major living in the firefox-android monorepo
/// layout. Earlier release branches keep the old `buildSrc` file locations.
const MONOREPO_FIRST_MAJOR: u32 = 104;

/// Which line of the Android-Components repository an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentsBranch {
    Main,
    Release(u32),
}

impl ComponentsBranch {
    /// The git branch name the pins live on.
    pub fn branch_name(&self) -> String {
        match self {
            ComponentsBranch::Main => "main".to_string(),
            ComponentsBranch::Release(major) => format!("releases_v{major}"),
        }
    }

    /// Short form used in deterministic work-branch names.
    pub fn short(&self) -> String {
        match self {
            ComponentsBranch::Main => "main".to_string(),
            ComponentsBranch::Release(major) => major.to_string(),
        }
    }

    /// Whether this line uses the firefox-android monorepo file layout (and
    /// its single `const val version` pin style).
    pub fn monorepo_layout(&self) -> bool {
        match self {
            ComponentsBranch::Main => true,
            ComponentsBranch::Release(major) => *major >= MONOREPO_FIRST_MAJOR,
        }
    }
}

/// Path of the file pinning the GeckoView version and channel.
pub fn gecko_kt_path(branch: &ComponentsBranch) -> &'static str {
    if branch.monorepo_layout() {
        "android-components/plugins/dependencies/src/main/java/Gecko.kt"
    } else {
        "buildSrc/src/main/java/Gecko.kt"
    }
}

/// Path of the file pinning the Application-Services and Glean versions.
pub fn dependencies_kt_path(branch: &ComponentsBranch) -> &'static str {
    if branch.monorepo_layout() {
        "android-components/plugins/dependencies/src/main/java/DependenciesPlugin.kt"
    } else {
        "buildSrc/src/main/java/Dependencies.kt"
    }
}

/// Path of the file pinning the embedded Android-Components version in an
/// application repository, under the application's source prefix.
pub fn android_components_kt_path(path_prefix: &str) -> String {
    format!("{path_prefix}buildSrc/src/main/java/AndroidComponents.kt")
}

fn capture<'a>(
    src: &'a str,
    pattern: &str,
    token: &'static str,
    file: &'static str,
) -> Result<&'a str, VersionError> {
    let re = Regex::new(pattern).unwrap();
    re.captures(src)
        .map(|captures| captures.get(1).unwrap().as_str())
        .ok_or(VersionError::TokenNotFound { token, file })
}

/// The GeckoView channel pinned in `Gecko.kt`.
pub fn gecko_channel(src: &str) -> Result<Channel, VersionError> {
    let name = capture(
        src,
        r"(?m)val channel = GeckoChannel\.(NIGHTLY|BETA|RELEASE)",
        "channel",
        "Gecko.kt",
    )?;
    name.to_lowercase().parse()
}

/// The GeckoView version pinned in `Gecko.kt`.
pub fn gecko_version(src: &str) -> Result<GeckoVersion, VersionError> {
    let raw = capture(
        src,
        r#"(?m)const val version = "([^"]*)""#,
        "version",
        "Gecko.kt",
    )?;
    raw.parse()
}

/// The GeckoView version pinned in a pre-monorepo `Gecko.kt`, which keeps
/// one `<channel>_version` constant per channel.
pub fn gecko_channel_version(src: &str, channel: Channel) -> Result<GeckoVersion, VersionError> {
    let pattern = format!(r#"(?m){channel}_version = "([^"]*)""#);
    let raw = capture(src, &pattern, "channel version", "Gecko.kt")?;
    raw.parse()
}

/// The Android-Components version embedded in an application's
/// `AndroidComponents.kt`. Timestamped Nightly pins parse too, since the
/// PATCH slot is wide enough for a build timestamp.
pub fn embedded_components_version(src: &str) -> Result<ComponentVersion, VersionError> {
    let raw = capture(
        src,
        r#"(?m)VERSION = "([^"]*)""#,
        "VERSION",
        "AndroidComponents.kt",
    )?;
    raw.parse()
}

/// The raw Application-Services pin in the dependencies file.
///
/// Returned unparsed: the comparison bypass for leaked timestamped pins has
/// to look at the raw string before any scheme validation runs.
pub fn appservices_pin(src: &str) -> Result<String, VersionError> {
    let raw = capture(
        src,
        r#"(?m)mozilla_appservices = "([^"]*)""#,
        "mozilla_appservices",
        "DependenciesPlugin.kt",
    )?;
    Ok(raw.to_string())
}

/// The Application-Services channel pinned in the dependencies file.
pub fn appservices_channel(src: &str) -> Result<AppServicesChannel, VersionError> {
    let name = capture(
        src,
        r"(?m)val channel = ApplicationServicesChannel\.([A-Z_]+)",
        "channel",
        "DependenciesPlugin.kt",
    )?;
    AppServicesChannel::from_str(&name.to_lowercase())
}

/// The Glean version pinned in the dependencies file.
pub fn glean_version(src: &str) -> Result<ComponentVersion, VersionError> {
    let raw = capture(
        src,
        r#"(?m)mozilla_glean = "([^"]*)""#,
        "mozilla_glean",
        "DependenciesPlugin.kt",
    )?;
    raw.parse()
}

/// The Android-Components version recorded in `version.txt` (the file's
/// entire content is the version string).
pub fn components_version_txt(content: &str) -> Result<ComponentVersion, VersionError> {
    content.trim().parse()
}
