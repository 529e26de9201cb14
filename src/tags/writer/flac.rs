//! FLAC metadata block editing.
//!
//! lofty rewrites the comment and picture blocks; STREAMINFO, the trailing
//! padding and the audio frames are copied through. The save goes into a
//! copy of the file that replaces the original once it succeeds.

use std::fs::File;
use std::path::Path;

use lofty::config::{ParseOptions, WriteOptions};
use lofty::file::AudioFile;
use lofty::flac::FlacFile;
use lofty::ogg::OggPictureStorage;
use tracing::debug;

use super::vorbis::{DEFAULT_VENDOR, build_comments, cover_picture};
use super::{FormatWriter, discard_temp, temp_sibling};
use crate::error::{Error, Result, ResultExt};
use crate::tags::ResolvedTags;
use crate::tags::artwork::Artwork;

/// Writes Vorbis comments and the front cover into FLAC files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlacWriter;

impl FormatWriter for FlacWriter {
    fn write(&self, path: &Path, tags: &ResolvedTags, artwork: Option<&Artwork>) -> Result<()> {
        let mut flac = {
            let mut file = File::open(path).with_context(format!("opening {}", path.display()))?;
            FlacFile::read_from(&mut file, ParseOptions::new().read_properties(false))
                .map_err(|e| Error::parse(path, e.to_string()))?
        };

        let vendor = match flac.vorbis_comments() {
            Some(existing) => {
                debug!(
                    "Clearing {} vorbis comments in {:?} (title {:?})",
                    existing.items().count(),
                    path,
                    existing.get("TITLE")
                );
                existing.vendor().to_string()
            }
            None => DEFAULT_VENDOR.to_string(),
        };

        let comments =
            build_comments(&vendor, tags, None).map_err(|e| Error::metadata(path, e.to_string()))?;
        flac.set_vorbis_comments(comments);

        if let Some(art) = artwork {
            let dropped = flac.remove_pictures();
            debug!("Replacing {} picture blocks in {:?}", dropped.len(), path);
            let (picture, info) = cover_picture(art);
            flac.insert_picture(picture, Some(info))
                .map_err(|e| Error::metadata(path, e.to_string()))?;
        }

        let tmp = temp_sibling(path, ".tmp");
        let result = save_via_temp(path, &tmp, &flac);
        if result.is_err() {
            discard_temp(&tmp);
        }
        result
    }
}

fn save_via_temp(path: &Path, tmp: &Path, flac: &FlacFile) -> Result<()> {
    std::fs::copy(path, tmp).with_context(format!("copying {}", path.display()))?;
    flac.save_to_path(tmp, WriteOptions::default())
        .map_err(|e| Error::metadata(path, e.to_string()))?;
    std::fs::rename(tmp, path).with_context(format!("replacing {}", path.display()))
}
