//! Maven index client
//!
//! Versions are mined out of `maven-metadata.xml` with exact-token regexes;
//! the documents are machine generated and stable, and nothing else in them
//! is needed. Every metadata request carries a cache-busting timestamp so a
//! CDN cannot serve a stale version list.

use chrono::Utc;
use regex::Regex;
use tracing::warn;

use crate::artifact::error::ArtifactError;
use crate::artifact::manifest;
use crate::version::{AppServicesChannel, Channel, ComponentVersion, GeckoVersion};

/// Default base URL for the release index.
const DEFAULT_RELEASE_BASE_URL: &str = "https://maven.mozilla.org/maven2";
/// Default base URL for the nightly index.
const DEFAULT_NIGHTLY_BASE_URL: &str = "https://nightly.maven.mozilla.org/maven2";

const GECKOVIEW_GROUP_PATH: &str = "org/mozilla/geckoview";
const COMPONENTS_METADATA_PATH: &str = "org/mozilla/components/ui-widgets";
const APPSERVICES_METADATA_PATH: &str = "org/mozilla/appservices/nimbus";

/// Client for the Mozilla Maven indexes.
pub struct MavenClient {
    client: reqwest::Client,
    release_base_url: String,
    nightly_base_url: String,
}

impl MavenClient {
    /// Creates a new MavenClient with custom base URLs.
    pub fn new(release_base_url: &str, nightly_base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("relbot")
                .build()
                .expect("Failed to create HTTP client"),
            release_base_url: release_base_url.to_string(),
            nightly_base_url: nightly_base_url.to_string(),
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String, ArtifactError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ArtifactError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            warn!("Maven index returned status {}: {}", status, url);
            return Err(ArtifactError::InvalidResponse(format!(
                "Unexpected status: {status}"
            )));
        }

        Ok(response.text().await?)
    }

    async fn fetch_metadata(&self, base: &str, path: &str) -> Result<String, ArtifactError> {
        let url = format!(
            "{base}/{path}/maven-metadata.xml?t={}",
            Utc::now().timestamp()
        );
        self.fetch_text(&url).await
    }

    /// Latest GeckoView build for the given channel, constrained to a major
    /// version when one is given (release branches track their own major,
    /// main always takes the newest).
    ///
    /// The chosen candidate must also have been published as the `-lite`
    /// variant; the two ship in lockstep and a partial publish fails the
    /// whole lookup.
    pub async fn latest_gecko_version(
        &self,
        major: Option<u32>,
        channel: Channel,
    ) -> Result<GeckoVersion, ArtifactError> {
        let artifact = channel.artifact_name();
        let metadata = self
            .fetch_metadata(
                &self.release_base_url,
                &format!("{GECKOVIEW_GROUP_PATH}/{artifact}"),
            )
            .await?;

        let latest = select_latest::<GeckoVersion>(&metadata_versions(&metadata), major)
            .ok_or_else(|| ArtifactError::NoVersions {
                artifact: artifact.to_string(),
                major: major_constraint_label(major),
            })?;

        self.check_lite_published(artifact, &latest).await?;

        Ok(latest)
    }

    /// Probe the lite variant's .pom for the chosen version.
    async fn check_lite_published(
        &self,
        artifact: &str,
        version: &GeckoVersion,
    ) -> Result<(), ArtifactError> {
        let lite = format!("{artifact}-lite");
        let url = format!(
            "{}/{GECKOVIEW_GROUP_PATH}/{lite}/{version}/{lite}-{version}.pom?t={}",
            self.release_base_url,
            Utc::now().timestamp()
        );
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ArtifactError::IncompletePublication {
                artifact: artifact.to_string(),
                version: version.to_string(),
            });
        }
        Ok(())
    }

    /// Latest Android-Components release for the given major version.
    pub async fn latest_components_version(
        &self,
        major: Option<u32>,
    ) -> Result<ComponentVersion, ArtifactError> {
        let metadata = self
            .fetch_metadata(&self.release_base_url, COMPONENTS_METADATA_PATH)
            .await?;

        select_latest::<ComponentVersion>(&metadata_versions(&metadata), major).ok_or_else(|| {
            ArtifactError::NoVersions {
                artifact: "ui-widgets".to_string(),
                major: major_constraint_label(major),
            }
        })
    }

    /// Latest Android-Components Nightly, straight from the nightly index's
    /// `<latest>` entry.
    pub async fn latest_components_nightly_version(
        &self,
    ) -> Result<ComponentVersion, ArtifactError> {
        let metadata = self
            .fetch_metadata(&self.nightly_base_url, COMPONENTS_METADATA_PATH)
            .await?;

        let latest = metadata_latest(&metadata).ok_or_else(|| {
            ArtifactError::InvalidResponse("metadata has no <latest> entry".to_string())
        })?;

        Ok(latest.parse::<ComponentVersion>()?)
    }

    /// Latest Application-Services release on the given channel, constrained
    /// to a major version when one is given.
    pub async fn latest_appservices_version(
        &self,
        major: Option<u32>,
        channel: AppServicesChannel,
    ) -> Result<crate::version::AppServicesVersion, ArtifactError> {
        let base = match channel {
            AppServicesChannel::Release => &self.release_base_url,
            AppServicesChannel::Nightly => &self.nightly_base_url,
        };
        let metadata = self.fetch_metadata(base, APPSERVICES_METADATA_PATH).await?;

        select_latest::<crate::version::AppServicesVersion>(&metadata_versions(&metadata), major)
            .ok_or_else(|| ArtifactError::NoVersions {
                artifact: "nimbus".to_string(),
                major: major_constraint_label(major),
            })
    }

    /// The Glean version bundled inside a specific GeckoView build, read from
    /// that build's Gradle module manifest.
    pub async fn latest_bundled_glean_version(
        &self,
        gecko: &GeckoVersion,
        channel: Channel,
    ) -> Result<ComponentVersion, ArtifactError> {
        let artifact = channel.artifact_name();
        let url = format!(
            "{}/{GECKOVIEW_GROUP_PATH}/{artifact}/{gecko}/{artifact}-{gecko}.module?t={}",
            self.release_base_url,
            Utc::now().timestamp()
        );
        let document = self.fetch_text(&url).await?;
        manifest::bundled_glean_version(&document)
    }
}

impl Default for MavenClient {
    fn default() -> Self {
        Self::new(DEFAULT_RELEASE_BASE_URL, DEFAULT_NIGHTLY_BASE_URL)
    }
}

/// All `<version>` entries of a metadata document, in document order.
fn metadata_versions(metadata: &str) -> Vec<String> {
    let re = Regex::new(r"<version>([^<]+)</version>").unwrap();
    re.captures_iter(metadata)
        .map(|captures| captures[1].to_string())
        .collect()
}

/// The `<latest>` entry of a metadata document.
fn metadata_latest(metadata: &str) -> Option<String> {
    let re = Regex::new(r"<latest>([^<]+)</latest>").unwrap();
    re.captures(metadata).map(|captures| captures[1].to_string())
}

/// Filter to the major constraint and select the maximum under the scheme's
/// own ordering. Entries that do not parse under the scheme (old layouts,
/// stray uploads) are skipped rather than poisoning the lookup.
fn select_latest<V>(versions: &[String], major: Option<u32>) -> Option<V>
where
    V: std::str::FromStr + Ord,
{
    versions
        .iter()
        .filter(|version| match major {
            Some(major) => version.starts_with(&format!("{major}.")),
            None => true,
        })
        .filter_map(|version| version.parse::<V>().ok())
        .max()
}

fn major_constraint_label(major: Option<u32>) -> String {
    match major {
        Some(major) => major.to_string(),
        None => "any".to_string(),
    }
}
