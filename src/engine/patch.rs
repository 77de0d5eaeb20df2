//! File patches applied while staging an update proposal
//!
//! A patch is a bit-exact token replacement or a regex substitution, never
//! general parsing. Producing byte-identical output is a hard failure: it
//! means the matched pattern drifted or the file is already at the target
//! version, and a proposal staged from it would be empty or wrong.

use regex::Regex;

use crate::engine::UpdateError;

/// One file change inside an update proposal.
#[derive(Debug, Clone)]
pub struct FilePatch {
    /// Path of the file inside the target repository.
    pub path: String,
    /// Commit message for this change.
    pub message: String,
    op: PatchOp,
}

#[derive(Debug, Clone)]
enum PatchOp {
    ReplaceToken { old: String, new: String },
    Substitute { pattern: String, replacement: String },
}

impl FilePatch {
    /// Replace every occurrence of an exact token.
    pub fn replace_token(
        path: impl Into<String>,
        message: impl Into<String>,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> FilePatch {
        FilePatch {
            path: path.into(),
            message: message.into(),
            op: PatchOp::ReplaceToken {
                old: old.into(),
                new: new.into(),
            },
        }
    }

    /// Replace every match of a regex pattern.
    pub fn substitute(
        path: impl Into<String>,
        message: impl Into<String>,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> FilePatch {
        FilePatch {
            path: path.into(),
            message: message.into(),
            op: PatchOp::Substitute {
                pattern: pattern.into(),
                replacement: replacement.into(),
            },
        }
    }

    /// Apply the substitution, preserving all surrounding text byte-for-byte.
    pub fn apply(&self, content: &str) -> Result<String, UpdateError> {
        let patched = match &self.op {
            PatchOp::ReplaceToken { old, new } => content.replace(old, new),
            PatchOp::Substitute {
                pattern,
                replacement,
            } => {
                let re = Regex::new(pattern)?;
                re.replace_all(content, replacement.as_str()).into_owned()
            }
        };

        if patched == content {
            return Err(UpdateError::NothingChanged {
                path: self.path.clone(),
            });
        }

        Ok(patched)
    }
}
