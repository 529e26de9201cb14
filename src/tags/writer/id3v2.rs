//! ID3v2 writer for MP3 files.
//!
//! The existing tag is parsed and then discarded: the new tag starts empty,
//! so frames this crate does not manage are dropped along with stale ones.

use std::path::Path;

use id3::frame::{Picture, PictureType};
use id3::{Tag, TagLike, Version};
use tracing::debug;

use super::FormatWriter;
use crate::error::{Error, Result};
use crate::tags::ResolvedTags;
use crate::tags::artwork::{Artwork, FRONT_COVER_DESCRIPTION};
use crate::tags::fields::managed_fields;

#[derive(Debug, Clone, Copy, Default)]
pub struct Id3Writer;

impl FormatWriter for Id3Writer {
    fn write(&self, path: &Path, tags: &ResolvedTags, artwork: Option<&Artwork>) -> Result<()> {
        let existing = match Tag::read_from_path(path) {
            Ok(tag) => tag.frames().count(),
            Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => 0,
            Err(e) => return Err(Error::parse(path, e.to_string())),
        };

        let mut tag = Tag::new();
        for (field, value) in managed_fields(tags) {
            tag.set_text(field.id3_frame(), value);
        }

        if let Some(art) = artwork {
            tag.add_frame(Picture {
                mime_type: art.mime.to_string(),
                picture_type: PictureType::CoverFront,
                description: FRONT_COVER_DESCRIPTION.to_string(),
                data: art.data.clone(),
            });
        }

        debug!(
            "Replacing {} ID3 frames with {} in {:?}",
            existing,
            tag.frames().count(),
            path
        );

        tag.write_to_path(path, Version::Id3v24)
            .map_err(|e| Error::metadata(path, e.to_string()))
    }
}
