//! The field policy every format writer shares.
//!
//! Writers never merge: they clear what the file had and write exactly the
//! pairs returned by [`managed_fields`], translated to their own keys.

use super::ResolvedTags;

/// A tag value this crate manages, independent of container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagField {
    Title,
    Artist,
    AlbumArtist,
    Album,
    Genre,
    Year,
    Track,
    Producers,
}

impl TagField {
    pub const ALL: [TagField; 8] = [
        TagField::Title,
        TagField::Artist,
        TagField::AlbumArtist,
        TagField::Album,
        TagField::Genre,
        TagField::Year,
        TagField::Track,
        TagField::Producers,
    ];

    /// Vorbis comment field name (FLAC and Ogg).
    pub fn vorbis_key(self) -> &'static str {
        match self {
            TagField::Title => "TITLE",
            TagField::Artist => "ARTIST",
            TagField::AlbumArtist => "ALBUMARTIST",
            TagField::Album => "ALBUM",
            TagField::Genre => "GENRE",
            TagField::Year => "DATE",
            TagField::Track => "TRACKNUMBER",
            TagField::Producers => "PRODUCER",
        }
    }

    /// ID3v2.4 text frame id.
    pub fn id3_frame(self) -> &'static str {
        match self {
            TagField::Title => "TIT2",
            TagField::Artist => "TPE1",
            TagField::AlbumArtist => "TPE2",
            TagField::Album => "TALB",
            TagField::Genre => "TCON",
            TagField::Year => "TDRC",
            TagField::Track => "TRCK",
            TagField::Producers => "TCOM",
        }
    }

    /// Metadata key understood by the remux tool for MP4 containers.
    pub fn mp4_key(self) -> &'static str {
        match self {
            TagField::Title => "title",
            TagField::Artist => "artist",
            TagField::AlbumArtist => "album_artist",
            TagField::Album => "album",
            TagField::Genre => "genre",
            TagField::Year => "date",
            TagField::Track => "track",
            TagField::Producers => "composer",
        }
    }
}

/// Non-empty resolved values in a fixed order.
pub fn managed_fields(tags: &ResolvedTags) -> Vec<(TagField, String)> {
    TagField::ALL
        .into_iter()
        .filter_map(|field| {
            let value = match field {
                TagField::Title => tags.title.clone(),
                TagField::Artist => tags.artist.clone(),
                TagField::AlbumArtist => tags.album_artist.clone(),
                TagField::Album => tags.album.clone(),
                TagField::Genre => tags.genre.clone(),
                TagField::Year if tags.year > 0 => tags.year.to_string(),
                TagField::Year => String::new(),
                TagField::Track => tags.track_position.clone(),
                TagField::Producers => tags.producers.clone(),
            };
            (!value.trim().is_empty()).then_some((field, value))
        })
        .collect()
}
