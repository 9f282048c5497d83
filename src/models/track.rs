use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TrackId;

/// A catalog track with its descriptive metadata and audio features
///
/// Audio features are optional: ingestion may not have analyzed a track yet.
/// Ranges (0–1 ratios, 0–300 BPM tempo, dB loudness) are conventions of the
/// ingestion pipeline and are not enforced here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    /// Duration in seconds
    pub duration: Option<u32>,

    /// Beats per minute
    pub tempo: Option<f64>,
    /// Musical key, e.g. "C#m"
    pub key: Option<String>,
    pub energy: Option<f64>,
    pub danceability: Option<f64>,
    /// Musical positiveness
    pub valence: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
    /// Loudness in dB, usually negative
    pub loudness: Option<f64>,
    pub speechiness: Option<f64>,

    pub created_at: DateTime<Utc>,
}

impl Track {
    /// Creates a track with no album, genre or audio features
    pub fn new(id: TrackId, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            album: None,
            genre: None,
            duration: None,
            tempo: None,
            key: None,
            energy: None,
            danceability: None,
            valence: None,
            acousticness: None,
            instrumentalness: None,
            loudness: None,
            speechiness: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    /// Sets the genre
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Sets the ingestion timestamp
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Whether two tracks share exactly the same genre
    ///
    /// Comparison is case-sensitive; a track without a genre never matches.
    pub fn same_genre(&self, other: &Track) -> bool {
        matches!((&self.genre, &other.genre), (Some(a), Some(b)) if a == b)
    }
}
