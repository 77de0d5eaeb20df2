//! GeckoView build versions and release channels
//!
//! GeckoView builds are versioned `MAJOR.MINOR.YYYYMMDDHHMMSS`. The build
//! timestamp must be exactly 14 digits and is ordered as a plain integer; no
//! calendar semantics are attached to it.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::version::error::VersionError;

/// A validated GeckoView build version.
///
/// Field order gives the derived `Ord` lexicographic tuple comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GeckoVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u64,
}

impl FromStr for GeckoVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = Regex::new(r"^(\d{2,})\.(\d)\.(\d{14})$").unwrap();
        let invalid = || VersionError::InvalidFormat {
            scheme: "geckoview",
            value: s.to_string(),
        };
        let captures = format.captures(s).ok_or_else(invalid)?;
        Ok(GeckoVersion {
            major: captures[1].parse().map_err(|_| invalid())?,
            minor: captures[2].parse().map_err(|_| invalid())?,
            build: captures[3].parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for GeckoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The build timestamp is fixed-width; leading zeros must survive a
        // parse/render round trip.
        write!(f, "{}.{}.{:014}", self.major, self.minor, self.build)
    }
}

/// GeckoView release channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Nightly,
    Beta,
    Release,
}

impl Channel {
    /// Maven artifact name for this channel's multi-arch .aar.
    pub fn artifact_name(self) -> &'static str {
        match self {
            Channel::Nightly => "geckoview-nightly",
            Channel::Beta => "geckoview-beta",
            Channel::Release => "geckoview",
        }
    }

    /// Capitalized channel name used in commit messages and PR titles.
    pub fn display_name(self) -> &'static str {
        match self {
            Channel::Nightly => "Nightly",
            Channel::Beta => "Beta",
            Channel::Release => "Release",
        }
    }
}

impl FromStr for Channel {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nightly" => Ok(Channel::Nightly),
            "beta" => Ok(Channel::Beta),
            "release" => Ok(Channel::Release),
            _ => Err(VersionError::InvalidChannel(s.to_string())),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Nightly => "nightly",
            Channel::Beta => "beta",
            Channel::Release => "release",
        };
        write!(f, "{name}")
    }
}
