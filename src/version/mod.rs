//! Version schemes used across the Android-Components release pipeline
//!
//! Three incompatible schemes coexist and must never be compared against each
//! other:
//!
//! - [`component::ComponentVersion`]: dotted `MAJOR.MINOR.PATCH` releases of
//!   Android-Components itself (and of Glean). On Nightly the PATCH slot
//!   carries a build timestamp, so it is held as a `u64`.
//! - [`gecko::GeckoVersion`]: GeckoView builds, `MAJOR.MINOR.YYYYMMDDHHMMSS`
//!   with an exactly-14-digit build timestamp.
//! - [`appservices::AppServicesVersion`]: Application-Services releases,
//!   which switched from three components (up to major 97) to two components
//!   (from major 114 on).
//!
//! Every scheme validates against an exact format and fails hard on anything
//! else; ordering is plain lexicographic integer-tuple comparison.

pub mod appservices;
pub mod component;
pub mod error;
pub mod gecko;

pub use appservices::{AppServicesChannel, AppServicesVersion};
pub use component::ComponentVersion;
pub use error::VersionError;
pub use gecko::{Channel, GeckoVersion};
