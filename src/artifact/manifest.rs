//! Gradle module manifest lookups
//!
//! Each published GeckoView version carries a Gradle module manifest (the
//! `.module` file next to the .aar) whose variants declare capabilities,
//! among them the Glean version the build was compiled against. A-C must pin
//! exactly that Glean version, so the manifest is the source of truth for the
//! bundled lookup.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::artifact::error::ArtifactError;
use crate::version::ComponentVersion;

const GLEAN_CAPABILITY_GROUP: &str = "org.mozilla.telemetry";
const GLEAN_CAPABILITY_NAME: &str = "glean-native";

#[derive(Debug, Deserialize)]
struct ModuleManifest {
    #[serde(default)]
    variants: Vec<Variant>,
}

#[derive(Debug, Deserialize)]
struct Variant {
    #[serde(default)]
    capabilities: Vec<Capability>,
}

#[derive(Debug, Deserialize)]
struct Capability {
    group: String,
    name: String,
    version: String,
}

/// Extract the bundled Glean version from a module manifest document.
///
/// All variants must agree: zero matching capability entries means the
/// manifest no longer records the capability, more than one distinct version
/// means the variants disagree. Either way no proposal can be made from it.
pub fn bundled_glean_version(manifest: &str) -> Result<ComponentVersion, ArtifactError> {
    let manifest: ModuleManifest = serde_json::from_str(manifest)
        .map_err(|e| ArtifactError::InvalidResponse(e.to_string()))?;

    let versions: BTreeSet<&str> = manifest
        .variants
        .iter()
        .flat_map(|variant| variant.capabilities.iter())
        .filter(|capability| {
            capability.group == GLEAN_CAPABILITY_GROUP && capability.name == GLEAN_CAPABILITY_NAME
        })
        .map(|capability| capability.version.as_str())
        .collect();

    if versions.len() != 1 {
        return Err(ArtifactError::BundledVersionConflict {
            capability: GLEAN_CAPABILITY_NAME,
            found: versions.len(),
        });
    }

    let version = versions.into_iter().next().unwrap();
    Ok(version.parse()?)
}
