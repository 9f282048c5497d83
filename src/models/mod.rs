use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod interaction;
pub mod recommendation;
pub mod track;

pub use interaction::{ActionKind, Interaction, UnknownAction};
pub use recommendation::{Recommendation, TrendingTrack};
pub use track::Track;

/// Identifier of a catalog track
pub type TrackId = i64;

/// Identifier of a listener
pub type ListenerId = i64;

/// Identifier of a recorded interaction
pub type InteractionId = i64;

/// A listener who owns a history of interactions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listener {
    pub id: ListenerId,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Statistics
// ============================================================================

/// Interaction counts for a single track
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackStatistics {
    pub track_id: TrackId,
    pub play_count: u64,
    pub like_count: u64,
    pub skip_count: u64,
    /// Mean of the ratings given to the track, absent when nobody rated it
    pub average_rating: Option<f64>,
}

/// Aggregate listening facts for a single listener
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListenerStatistics {
    pub user_id: ListenerId,
    pub total_interactions: u64,
    pub favorite_genre: Option<String>,
    /// Seconds listened, absent when no interaction recorded a duration
    pub total_listening_time: Option<u64>,
}

/// Row counts across the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CatalogSummary {
    pub total_users: u64,
    pub total_tracks: u64,
    pub total_interactions: u64,
}
