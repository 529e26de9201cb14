//! Format writers.
//!
//! One writer per container family, picked by file extension:
//!
//! | Extension                      | Format                 | Writer            |
//! |--------------------------------|------------------------|-------------------|
//! | `.mp3`                         | ID3v2.4                | [`Id3Writer`]     |
//! | `.flac`                        | FLAC metadata blocks   | [`FlacWriter`]    |
//! | `.m4a` `.mp4` `.m4b` `.m4p`    | MP4 atoms (via remux)  | [`Mp4Writer`]     |
//! | `.ogg` `.oga`                  | Ogg Vorbis comments    | [`OggWriter`]     |
//!
//! Every writer clears the managed tags the file already has and writes the
//! non-empty pairs from [`managed_fields`](super::fields::managed_fields).

mod flac;
mod id3v2;
mod mp4;
mod ogg;
mod vorbis;

use std::path::{Path, PathBuf};

use tracing::debug;

pub use flac::FlacWriter;
pub use id3v2::Id3Writer;
pub use mp4::{Mp4Writer, remux_tool_version};
pub use ogg::OggWriter;

use super::ResolvedTags;
use super::artwork::{Artwork, ArtworkLoader};
use crate::error::{Error, Result};
use crate::library::LibraryRoot;

/// Container families with a writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFormat {
    Id3,
    Flac,
    Mp4,
    OggVorbis,
}

impl TagFormat {
    /// Pick the format from the lower-cased file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "mp3" => Ok(Self::Id3),
            "flac" => Ok(Self::Flac),
            "m4a" | "mp4" | "m4b" | "m4p" => Ok(Self::Mp4),
            "ogg" | "oga" => Ok(Self::OggVorbis),
            "" => Err(Error::UnsupportedFormat(String::new())),
            other => Err(Error::UnsupportedFormat(format!(".{other}"))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Id3 => "ID3",
            Self::Flac => "FLAC",
            Self::Mp4 => "MP4",
            Self::OggVorbis => "Ogg Vorbis",
        }
    }
}

/// Rewrites one container's metadata in place.
pub trait FormatWriter {
    fn write(&self, path: &Path, tags: &ResolvedTags, artwork: Option<&Artwork>) -> Result<()>;
}

/// Resolves file and artwork paths under the library root and dispatches to
/// the writer for the file's format.
#[derive(Debug, Clone)]
pub struct TagWriter {
    root: LibraryRoot,
    artwork: ArtworkLoader,
    remux_tool: String,
}

impl TagWriter {
    pub fn new(root: LibraryRoot, remux_tool: impl Into<String>) -> Self {
        Self {
            artwork: ArtworkLoader::new(root.clone()),
            root,
            remux_tool: remux_tool.into(),
        }
    }

    pub fn root(&self) -> &LibraryRoot {
        &self.root
    }

    pub fn remux_tool(&self) -> &str {
        &self.remux_tool
    }

    fn writer_for(&self, format: TagFormat) -> Box<dyn FormatWriter> {
        match format {
            TagFormat::Id3 => Box::new(Id3Writer),
            TagFormat::Flac => Box::new(FlacWriter),
            TagFormat::Mp4 => Box::new(Mp4Writer::new(self.remux_tool.clone())),
            TagFormat::OggVorbis => Box::new(OggWriter),
        }
    }

    /// Write `tags` into the file at the catalog-relative `filepath`.
    ///
    /// Blocking; callers on the async runtime go through `spawn_blocking`.
    pub fn write(&self, filepath: &str, tags: &ResolvedTags) -> Result<PathBuf> {
        let path = self.root.resolve(filepath)?;
        let format = TagFormat::from_path(&path)?;
        let artwork = self.artwork.load(tags.artwork_path.as_deref())?;

        debug!(
            "Writing {} tags to {:?} (artwork: {})",
            format.name(),
            path,
            artwork.as_ref().map_or("none", |a| a.mime)
        );

        self.writer_for(format).write(&path, tags, artwork.as_ref())?;
        Ok(path)
    }
}

/// Sibling path the new file is materialised at before the rename.
pub(crate) fn temp_sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

/// Remove a leftover temp file, ignoring a missing one.
pub(crate) fn discard_temp(path: &Path) {
    if let Err(e) = std::fs::remove_file(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!("Failed to remove temp file {:?}: {}", path, e);
    }
}
