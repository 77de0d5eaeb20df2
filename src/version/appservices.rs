//! Application-Services versions and channels
//!
//! A-S release numbering migrated: releases up to major 97 are
//! `MAJOR.MINOR.PATCH`, releases from major 114 on are `MAJOR.MINOR` (the
//! majors in between were never published). Both eras order correctly as
//! lexicographic integer tuples, and a branch's pin is always internally
//! consistent with one era, so the two formats never meet in a comparison.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::version::error::VersionError;

/// Last major version published with three components.
const LAST_THREE_COMPONENT_MAJOR: u32 = 97;
/// First major version published with two components.
const FIRST_TWO_COMPONENT_MAJOR: u32 = 114;

/// A validated Application-Services version, either era.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AppServicesVersion {
    components: Vec<u32>,
}

impl AppServicesVersion {
    pub fn major(&self) -> u32 {
        self.components[0]
    }
}

impl FromStr for AppServicesVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?$").unwrap();
        let invalid = || VersionError::InvalidFormat {
            scheme: "application-services",
            value: s.to_string(),
        };
        let captures = format.captures(s).ok_or_else(invalid)?;
        let mut components = vec![
            captures[1].parse().map_err(|_| invalid())?,
            captures[2].parse().map_err(|_| invalid())?,
        ];
        if let Some(patch) = captures.get(3) {
            components.push(patch.as_str().parse().map_err(|_| invalid())?);
        }

        // The era is determined by the major version; a two-component 97 or a
        // three-component 114 never shipped.
        let major = components[0];
        let valid_era = match components.len() {
            3 => major <= LAST_THREE_COMPONENT_MAJOR,
            2 => major >= FIRST_TWO_COMPONENT_MAJOR,
            _ => false,
        };
        if !valid_era {
            return Err(invalid());
        }

        Ok(AppServicesVersion { components })
    }
}

impl fmt::Display for AppServicesVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.components.iter().map(u32::to_string).collect();
        write!(f, "{}", rendered.join("."))
    }
}

/// Returns true when a raw A-S pin must not take part in ordered comparison.
///
/// A 19-character pin is a timestamped GeckoView-style build that leaked into
/// a semantic pin slot; comparing it against an indexed release would order
/// the timestamp against a patch number. Such pins are reported as already up
/// to date and left alone.
pub fn comparison_bypass(raw: &str) -> bool {
    raw.len() == 19
}

/// Application-Services release channel.
///
/// Only `release` and `nightly` are indexed; the staging channels exist in
/// consumer configurations but are not served by the public Maven indexes, so
/// they are rejected as unsupported rather than silently misresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppServicesChannel {
    Release,
    Nightly,
}

impl FromStr for AppServicesChannel {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "release" => Ok(AppServicesChannel::Release),
            "nightly" => Ok(AppServicesChannel::Nightly),
            "staging" | "nightly_staging" => {
                Err(VersionError::UnsupportedChannel(s.to_string()))
            }
            _ => Err(VersionError::InvalidChannel(s.to_string())),
        }
    }
}

impl fmt::Display for AppServicesChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppServicesChannel::Release => "release",
            AppServicesChannel::Nightly => "nightly",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cmp::Ordering;

    #[rstest]
    #[case("63.0.2")]
    #[case("97.5.1")]
    #[case("114.0")]
    #[case("121.1")]
    fn parse_accepts_versions_from_either_era(#[case] input: &str) {
        let version: AppServicesVersion = input.parse().unwrap();
        assert_eq!(version.to_string(), input);
    }

    #[rstest]
    #[case("")]
    #[case("lol")]
    #[case("63")]
    #[case("98.0.1")] // three components after the migration cutoff
    #[case("113.2.0")]
    #[case("97.0")] // two components before the migration cutoff
    #[case("113.0")]
    #[case("114.0.0")]
    #[case("63.0-beta.2")]
    fn parse_rejects_versions_from_the_wrong_era(#[case] input: &str) {
        assert!(input.parse::<AppServicesVersion>().is_err());
    }

    #[test]
    fn major_is_the_first_component() {
        let old: AppServicesVersion = "97.5.1".parse().unwrap();
        assert_eq!(old.major(), 97);
        let new: AppServicesVersion = "121.1".parse().unwrap();
        assert_eq!(new.major(), 121);
    }

    #[rstest]
    #[case("63.0.2", "63.0.2", Ordering::Equal)]
    #[case("63.0.9", "63.0.10", Ordering::Less)]
    #[case("97.5.1", "97.4.9", Ordering::Greater)]
    #[case("114.0", "114.1", Ordering::Less)]
    #[case("121.1", "121.0", Ordering::Greater)]
    fn compare_is_tuple_comparison_within_an_era(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: Ordering,
    ) {
        let a: AppServicesVersion = a.parse().unwrap();
        let b: AppServicesVersion = b.parse().unwrap();
        assert_eq!(a.cmp(&b), expected);
    }

    #[test]
    fn bypass_fires_exactly_at_nineteen_characters() {
        assert!(comparison_bypass("81.0.20201012085804")); // 19 chars
        assert!(!comparison_bypass("81.0.2020101208580")); // 18 chars
        assert!(!comparison_bypass("181.0.20201012085804")); // 20 chars
        assert!(!comparison_bypass("121.0"));
        assert!(!comparison_bypass(""));
    }

    #[rstest]
    #[case("release", AppServicesChannel::Release)]
    #[case("nightly", AppServicesChannel::Nightly)]
    fn channel_parses_supported_names(#[case] input: &str, #[case] expected: AppServicesChannel) {
        assert_eq!(input.parse::<AppServicesChannel>().unwrap(), expected);
    }

    #[rstest]
    #[case("staging")]
    #[case("nightly_staging")]
    fn channel_rejects_staging_as_unsupported(#[case] input: &str) {
        assert!(matches!(
            input.parse::<AppServicesChannel>(),
            Err(VersionError::UnsupportedChannel(_))
        ));
    }

    #[test]
    fn channel_rejects_unknown_names_as_invalid() {
        assert!(matches!(
            "Something".parse::<AppServicesChannel>(),
            Err(VersionError::InvalidChannel(_))
        ));
    }
}
