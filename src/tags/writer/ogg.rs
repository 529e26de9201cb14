//! Ogg Vorbis comment writer.
//!
//! lofty handles the Ogg paging. The comment list is rebuilt from scratch,
//! keeping only the vendor string, and saved into a copy of the file that
//! replaces the original once the save succeeds.

use std::fs::File;
use std::path::Path;

use lofty::config::{ParseOptions, WriteOptions};
use lofty::file::AudioFile;
use lofty::ogg::{VorbisComments, VorbisFile};
use lofty::tag::TagExt;
use tracing::debug;

use super::vorbis::build_comments;
use super::{FormatWriter, discard_temp, temp_sibling};
use crate::error::{Error, Result, ResultExt};
use crate::tags::ResolvedTags;
use crate::tags::artwork::Artwork;

#[derive(Debug, Clone, Copy, Default)]
pub struct OggWriter;

impl FormatWriter for OggWriter {
    fn write(&self, path: &Path, tags: &ResolvedTags, artwork: Option<&Artwork>) -> Result<()> {
        let vendor = {
            let mut file = File::open(path).with_context(format!("opening {}", path.display()))?;
            let ogg = VorbisFile::read_from(&mut file, ParseOptions::new().read_properties(false))
                .map_err(|e| Error::parse(path, e.to_string()))?;
            let existing = ogg.vorbis_comments();
            debug!(
                "Clearing {} vorbis comments in {:?}",
                existing.items().count(),
                path
            );
            existing.vendor().to_string()
        };

        let comments = build_comments(&vendor, tags, artwork)
            .map_err(|e| Error::metadata(path, e.to_string()))?;

        let tmp = temp_sibling(path, ".tmp");
        let result = save_via_temp(path, &tmp, &comments);
        if result.is_err() {
            discard_temp(&tmp);
        }
        result
    }
}

fn save_via_temp(path: &Path, tmp: &Path, comments: &VorbisComments) -> Result<()> {
    std::fs::copy(path, tmp).with_context(format!("copying {}", path.display()))?;
    comments
        .save_to_path(tmp, WriteOptions::default())
        .map_err(|e| Error::metadata(path, e.to_string()))?;
    std::fs::rename(tmp, path).with_context(format!("replacing {}", path.display()))
}
