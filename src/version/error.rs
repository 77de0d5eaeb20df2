use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid {scheme} version format: {value:?}")]
    InvalidFormat {
        scheme: &'static str,
        value: String,
    },

    #[error("Invalid channel: {0:?}")]
    InvalidChannel(String),

    #[error("Unsupported application-services channel: {0}")]
    UnsupportedChannel(String),

    #[error("Invalid release tag format: {0:?}")]
    InvalidTag(String),

    #[error("Could not match {token} in {file}")]
    TokenNotFound {
        token: &'static str,
        file: &'static str,
    },

    #[error("Unexpected release branch name: {0}")]
    UnexpectedBranchName(String),
}
