//! Front-cover artwork loading.
//!
//! Artwork is read from the library root. MIME type comes from the file
//! extension only; image data is never sniffed.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;
use crate::library::LibraryRoot;

pub const FRONT_COVER_DESCRIPTION: &str = "Front Cover";

/// Image bytes ready to embed as a front cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    /// Absolute location, needed by writers that hand the file to another tool
    pub path: PathBuf,
    pub data: Vec<u8>,
    pub mime: &'static str,
}

/// `image/png` for `.png`, `image/jpeg` for everything else.
pub fn mime_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => "image/png",
        _ => "image/jpeg",
    }
}

/// Loads artwork referenced by catalog-relative paths.
#[derive(Debug, Clone)]
pub struct ArtworkLoader {
    root: LibraryRoot,
}

impl ArtworkLoader {
    pub fn new(root: LibraryRoot) -> Self {
        Self { root }
    }

    /// Load the artwork at `rel`.
    ///
    /// A path that escapes the library root is an error. A file that cannot
    /// be read only loses the artwork; the tag write goes ahead without it.
    pub fn load(&self, rel: Option<&str>) -> Result<Option<Artwork>> {
        let Some(rel) = rel.filter(|r| !r.trim().is_empty()) else {
            return Ok(None);
        };

        let path = self.root.resolve(rel)?;
        match std::fs::read(&path) {
            Ok(data) => {
                debug!("Loaded artwork {:?} ({} bytes)", path, data.len());
                let mime = mime_for_path(&path);
                Ok(Some(Artwork { path, data, mime }))
            }
            Err(e) => {
                warn!("Skipping unreadable artwork {:?}: {}", path, e);
                Ok(None)
            }
        }
    }
}
