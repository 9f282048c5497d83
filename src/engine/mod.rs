//! Recommendation engine
//!
//! Pure, synchronous scoring and ranking over records handed in by the
//! caller. Nothing here performs I/O or keeps state between calls; every
//! normalization and profile is scoped to the request that built it.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    Interaction, Listener, ListenerId, ListenerStatistics, Recommendation, Track, TrackId,
    TrackStatistics, TrendingTrack,
};

pub mod collaborative;
pub mod config;
pub mod content;
pub mod features;
pub mod hybrid;
pub mod normalize;
pub mod profile;
pub mod similarity;
pub mod stats;
pub mod trending;

pub use config::{EngineConfig, LimitBounds, PositiveRule};
pub use features::{AudioFeature, FeatureVector, NormalizedVector};
pub use profile::{ListenerProfile, Profile};
pub use similarity::FeatureWeights;

/// Error types for the engine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Track {0} not found")]
    TrackNotFound(TrackId),
    #[error("Listener {0} not found")]
    ListenerNotFound(ListenerId),
    #[error("Limit {requested} outside allowed range {min}..={max}")]
    InvalidLimit {
        requested: usize,
        min: usize,
        max: usize,
    },
}

/// Records supplied by the data-access layer for one request
///
/// `interactions` must hold the complete history of any listener being
/// recommended for, plus every interaction inside the trending window.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogView<'a> {
    pub tracks: &'a [Track],
    pub listeners: &'a [Listener],
    pub interactions: &'a [Interaction],
}

impl<'a> CatalogView<'a> {
    pub fn new(
        tracks: &'a [Track],
        listeners: &'a [Listener],
        interactions: &'a [Interaction],
    ) -> Self {
        Self {
            tracks,
            listeners,
            interactions,
        }
    }

    pub fn track(&self, id: TrackId) -> Option<&'a Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn listener(&self, id: ListenerId) -> Option<&'a Listener> {
        self.listeners.iter().find(|l| l.id == id)
    }

    /// Interactions recorded by one listener
    pub fn history_of(&self, listener_id: ListenerId) -> impl Iterator<Item = &'a Interaction> {
        let interactions: &'a [Interaction] = self.interactions;
        interactions
            .iter()
            .filter(move |i| i.user_id == listener_id)
    }
}

/// Sorts by descending score, ties by ascending track id, keeping `limit`
pub(crate) fn rank_by_score<'a>(
    mut scored: Vec<(&'a Track, f64)>,
    limit: usize,
) -> Vec<(&'a Track, f64)> {
    scored.sort_by(|(a, sa), (b, sb)| sb.total_cmp(sa).then_with(|| a.id.cmp(&b.id)));
    scored.truncate(limit);
    scored
}

/// Entry point bundling the engine operations with one configuration
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    config: EngineConfig,
}

impl RecommendationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Tracks that sound like the reference track
    pub fn similar_tracks(
        &self,
        reference_id: TrackId,
        tracks: &[Track],
        limit: usize,
    ) -> Result<Vec<Recommendation>, EngineError> {
        content::recommend_similar(reference_id, tracks, limit, &self.config)
    }

    /// Aggregates a listener's positive interactions
    pub fn profile(&self, listener_id: ListenerId, view: CatalogView<'_>) -> Profile {
        profile::build_profile(listener_id, view.interactions, view.tracks, &self.config)
    }

    /// Unheard tracks ranked against a built profile
    pub fn collaborative(
        &self,
        listener_id: ListenerId,
        profile: &ListenerProfile,
        view: CatalogView<'_>,
        limit: usize,
    ) -> Result<Vec<Recommendation>, EngineError> {
        collaborative::recommend_for_listener(listener_id, profile, view, limit, &self.config)
    }

    /// Personalized ranking with the trending fallback
    pub fn personalized(
        &self,
        listener_id: ListenerId,
        view: CatalogView<'_>,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<Recommendation>, EngineError> {
        hybrid::recommend_personalized(listener_id, view, limit, now, &self.config)
    }

    /// Most interacted-with tracks
    pub fn trending(
        &self,
        tracks: &[Track],
        interactions: &[Interaction],
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<TrendingTrack> {
        trending::rank_trending(tracks, interactions, limit, now, self.config.trending_window)
    }

    pub fn track_statistics(
        &self,
        track_id: TrackId,
        view: CatalogView<'_>,
    ) -> Result<TrackStatistics, EngineError> {
        stats::track_statistics(track_id, view)
    }

    pub fn listener_statistics(
        &self,
        listener_id: ListenerId,
        view: CatalogView<'_>,
    ) -> Result<ListenerStatistics, EngineError> {
        stats::listener_statistics(listener_id, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_breaks_ties_by_ascending_id() {
        let tracks = [Track::new(3, "c", "x"), Track::new(1, "a", "x"), Track::new(2, "b", "x")];
        let scored = vec![(&tracks[0], 0.5), (&tracks[1], 0.5), (&tracks[2], 0.9)];

        let ranked = rank_by_score(scored, 10);
        let ids: Vec<TrackId> = ranked.iter().map(|(t, _)| t.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_rank_truncates_to_limit() {
        let tracks = [Track::new(1, "a", "x"), Track::new(2, "b", "x")];
        let scored = vec![(&tracks[0], 0.1), (&tracks[1], 0.2)];
        let ranked = rank_by_score(scored, 1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].0.id, 2);
    }

    #[test]
    fn test_engine_error_messages() {
        assert_eq!(EngineError::TrackNotFound(4).to_string(), "Track 4 not found");
        assert_eq!(
            EngineError::InvalidLimit { requested: 0, min: 1, max: 50 }.to_string(),
            "Limit 0 outside allowed range 1..=50"
        );
    }
}
