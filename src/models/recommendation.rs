use serde::{Deserialize, Serialize};

use super::{Track, TrackId};

/// A ranked suggestion returned by the similarity-based endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub track_id: TrackId,
    pub title: String,
    pub artist: String,
    pub genre: Option<String>,
    /// Weighted similarity after genre boosts; may exceed 1.0 when boosted
    pub similarity_score: f64,
    pub reason: String,
}

impl Recommendation {
    pub fn new(track: &Track, similarity_score: f64, reason: impl Into<String>) -> Self {
        Self {
            track_id: track.id,
            title: track.title.clone(),
            artist: track.artist.clone(),
            genre: track.genre.clone(),
            similarity_score,
            reason: reason.into(),
        }
    }
}

/// A track ranked by how often listeners interacted with it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendingTrack {
    #[serde(flatten)]
    pub track: Track,
    pub interaction_count: u64,
}
