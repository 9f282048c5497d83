//! Listener profiles built from positive interactions.

use std::collections::{BTreeMap, HashMap};

use super::config::EngineConfig;
use super::features::FeatureVector;
use crate::models::{Interaction, ListenerId, Track, TrackId};

/// Aggregate taste of one listener
#[derive(Debug, Clone, PartialEq)]
pub struct ListenerProfile {
    pub listener_id: ListenerId,
    /// Mean raw feature vector over the positive tracks
    pub features: FeatureVector,
    /// Genre → share of the positive tracks carrying a genre
    pub genre_weights: BTreeMap<String, f64>,
    /// Number of positive interactions that contributed
    pub track_count: usize,
}

impl ListenerProfile {
    pub fn likes_genre(&self, genre: Option<&str>) -> bool {
        genre.is_some_and(|g| self.genre_weights.contains_key(g))
    }
}

/// Outcome of profile building; `Empty` tells the caller to fall back
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    Empty,
    Built(ListenerProfile),
}

impl Profile {
    pub fn is_empty(&self) -> bool {
        matches!(self, Profile::Empty)
    }

    pub fn built(&self) -> Option<&ListenerProfile> {
        match self {
            Profile::Built(profile) => Some(profile),
            Profile::Empty => None,
        }
    }
}

/// Builds the profile of one listener from their interactions
///
/// Interactions of other listeners, and interactions whose track is not in
/// `tracks`, are ignored. Order only matters when
/// `profile_history_limit` is set, in which case the most recent positives win.
pub fn build_profile(
    listener_id: ListenerId,
    interactions: &[Interaction],
    tracks: &[Track],
    config: &EngineConfig,
) -> Profile {
    let by_id: HashMap<TrackId, &Track> = tracks.iter().map(|t| (t.id, t)).collect();

    let mut positives: Vec<&Interaction> = interactions
        .iter()
        .filter(|i| i.user_id == listener_id)
        .filter(|i| config.positive.is_positive(i))
        .collect();

    if let Some(limit) = config.profile_history_limit {
        positives.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        positives.truncate(limit);
    }

    let liked: Vec<&Track> = positives
        .iter()
        .filter_map(|i| by_id.get(&i.track_id).copied())
        .collect();

    if liked.is_empty() {
        return Profile::Empty;
    }

    let vectors: Vec<FeatureVector> = liked.iter().map(|t| FeatureVector::from_track(t)).collect();
    let features = FeatureVector::mean(&vectors);

    let mut genre_counts: BTreeMap<String, usize> = BTreeMap::new();
    for genre in liked.iter().filter_map(|t| t.genre.as_ref()) {
        *genre_counts.entry(genre.clone()).or_default() += 1;
    }
    let tagged: usize = genre_counts.values().sum();
    let genre_weights = genre_counts
        .into_iter()
        .map(|(genre, count)| (genre, count as f64 / tagged as f64))
        .collect();

    Profile::Built(ListenerProfile {
        listener_id,
        features,
        genre_weights,
        track_count: liked.len(),
    })
}
