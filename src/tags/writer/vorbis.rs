//! Vorbis comment lists shared by the FLAC and Ogg writers.

use lofty::ogg::{OggPictureStorage, VorbisComments};
use lofty::picture::{MimeType, Picture, PictureInformation, PictureType};

use crate::tags::artwork::{Artwork, FRONT_COVER_DESCRIPTION};
use crate::tags::fields::managed_fields;
use crate::tags::ResolvedTags;

pub const DEFAULT_VENDOR: &str = concat!("catalog-tagger ", env!("CARGO_PKG_VERSION"));

/// Key/value comments for `tags`, in field order.
pub fn comments_for(tags: &ResolvedTags) -> Vec<(String, String)> {
    managed_fields(tags)
        .into_iter()
        .map(|(field, value)| (field.vorbis_key().to_string(), value))
        .collect()
}

/// Front cover for `artwork`.
///
/// The image is never decoded, so width, height, depth and palette size
/// are written as 0.
pub fn cover_picture(artwork: &Artwork) -> (Picture, PictureInformation) {
    let picture = Picture::new_unchecked(
        PictureType::CoverFront,
        Some(MimeType::from_str(artwork.mime)),
        Some(FRONT_COVER_DESCRIPTION.to_string()),
        artwork.data.clone(),
    );
    (picture, PictureInformation::default())
}

/// A fresh comment list holding only the managed fields and, when given,
/// the front cover.
pub fn build_comments(
    vendor: &str,
    tags: &ResolvedTags,
    artwork: Option<&Artwork>,
) -> lofty::error::Result<VorbisComments> {
    let mut comments = VorbisComments::default();
    comments.set_vendor(vendor.to_string());

    for (key, value) in comments_for(tags) {
        comments.push(key, value);
    }

    if let Some(art) = artwork {
        let (picture, info) = cover_picture(art);
        comments.insert_picture(picture, Some(info))?;
    }

    Ok(comments)
}
