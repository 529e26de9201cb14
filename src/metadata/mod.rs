//! Embedded tag read-back.
//!
//! Uses the lofty crate for format-independent metadata access, so one reader
//! covers every container the writers produce. Used by the `inspect` command
//! and to verify re-muxed MP4 files.

use std::path::Path;

use lofty::config::ParseOptions;
use lofty::file::TaggedFileExt;
use lofty::picture::PictureType;
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag};
use serde::Serialize;

use crate::error::{Error, Result};

/// Tags found in an audio file. `None` means the file has no such value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<u32>,
    pub track_number: Option<u32>,
    pub track_total: Option<u32>,
    /// Producer credit, or the composer field where producers are stored there
    pub producers: Option<String>,
    /// MIME type of the front cover, if one is embedded
    pub cover_mime: Option<String>,
    pub picture_count: usize,
}

/// Read the primary tag of an audio file.
///
/// Audio properties are not decoded; only the tag layer has to be valid.
pub fn inspect(path: &Path) -> Result<EmbeddedTags> {
    let tagged_file = Probe::open(path)
        .map_err(|e| Error::parse(path, e.to_string()))?
        .options(ParseOptions::new().read_properties(false))
        .read()
        .map_err(|e| Error::parse(path, e.to_string()))?;

    // Get the primary tag, or fall back to the first available tag
    let Some(tag) = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())
    else {
        return Ok(EmbeddedTags::default());
    };

    let cover = tag
        .pictures()
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront);

    Ok(EmbeddedTags {
        title: tag.title().map(|s| s.to_string()),
        artist: tag.artist().map(|s| s.to_string()),
        album_artist: item_text(tag, &ItemKey::AlbumArtist),
        album: tag.album().map(|s| s.to_string()),
        genre: tag.genre().map(|s| s.to_string()),
        year: tag.year(),
        track_number: tag.track(),
        track_total: tag.track_total(),
        producers: item_text(tag, &ItemKey::Producer)
            .or_else(|| item_text(tag, &ItemKey::Composer)),
        cover_mime: cover
            .and_then(|p| p.mime_type())
            .map(|m| m.as_str().to_string()),
        picture_count: tag.pictures().len(),
    })
}

fn item_text(tag: &Tag, key: &ItemKey) -> Option<String> {
    tag.items()
        .find(|item| item.key() == key)
        .and_then(|item| item.value().text())
        .map(|s| s.to_string())
}
