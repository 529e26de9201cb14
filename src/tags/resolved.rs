use serde::Serialize;

/// Canonical tag values for one song, after inheritance and singles synthesis.
///
/// Built fresh for every write from the current catalog state. Empty strings
/// and zero numbers mean "absent" and are never written to a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTags {
    pub title: String,
    /// Song artists joined for display
    pub artist: String,
    pub album_artist: String,
    pub album: String,
    pub genre: String,
    /// 0 when unknown
    pub year: i64,
    /// 0 when absent
    pub track_number: i64,
    /// 0 when absent or unknown
    pub track_total: i64,
    /// "N" or "N/M"; empty exactly when `track_number` is 0
    pub track_position: String,
    /// Producer credits joined for display
    pub producers: String,
    /// Catalog-relative artwork path
    pub artwork_path: Option<String>,
}

impl ResolvedTags {
    /// Set the track number and total, keeping the position string in step.
    pub fn set_track(&mut self, number: i64, total: i64) {
        self.track_number = number.max(0);
        self.track_total = total.max(0);
        self.track_position = format_track_position(self.track_number, self.track_total);
    }

    /// Drop any track numbering.
    pub fn clear_track(&mut self) {
        self.set_track(0, 0);
    }
}

/// "N/M" when the total is known, "N" otherwise, "" without a number.
pub fn format_track_position(number: i64, total: i64) -> String {
    match (number, total) {
        (n, _) if n <= 0 => String::new(),
        (n, t) if t > 0 => format!("{n}/{t}"),
        (n, _) => n.to_string(),
    }
}
