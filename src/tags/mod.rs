//! Tag resolution and format writers.
//!
//! [`resolver`] turns a catalog row into [`ResolvedTags`]; [`writer`] embeds
//! them into the audio file, picking the container by extension.

pub mod artwork;
pub mod fields;
mod resolved;
pub mod resolver;
pub mod writer;

pub use resolved::{ResolvedTags, format_track_position};
pub use resolver::{ResolvedSong, resolve, resolve_song};
pub use writer::{TagFormat, TagWriter};
