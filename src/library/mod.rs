//! Library root sandbox.
//!
//! The catalog stores song and artwork locations relative to a library root.
//! Older rows carry a leading slash; those are accepted and treated as
//! relative. Anything that would leave the root is rejected.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Directory that every catalog path resolves beneath.
#[derive(Debug, Clone)]
pub struct LibraryRoot {
    root: PathBuf,
}

impl LibraryRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve a catalog-relative path to an absolute one under the root.
    pub fn resolve(&self, rel: &str) -> Result<PathBuf> {
        let cleaned = normalize_rel_path(rel)?;
        Ok(self.root.join(cleaned))
    }
}

/// Clean a catalog path lexically and make sure it stays relative.
///
/// `.` segments are dropped and `..` segments cancel the preceding segment.
/// A `..` with nothing left to cancel is traversal.
pub fn normalize_rel_path(rel: &str) -> Result<PathBuf> {
    let trimmed = rel.trim();
    let unified = trimmed.replace('\\', "/");

    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    let mut leading = true;

    for component in Path::new(&unified).components() {
        match component {
            // Legacy leading slash.
            Component::RootDir if leading => {}
            Component::Prefix(_) | Component::RootDir => {
                return Err(Error::invalid_path(format!(
                    "absolute path not allowed: {rel}"
                )));
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(Error::invalid_path(format!(
                        "path traversal not allowed: {rel}"
                    )));
                }
            }
            Component::Normal(part) => parts.push(part),
        }
        leading = false;
    }

    if parts.is_empty() {
        return Err(Error::invalid_path("empty path"));
    }

    Ok(parts.iter().collect())
}
