//! Profile-driven recommendations over tracks the listener has not touched.

use std::collections::HashSet;

use super::config::EngineConfig;
use super::features::FeatureVector;
use super::normalize::Normalizer;
use super::profile::ListenerProfile;
use super::similarity::weighted_cosine;
use super::{rank_by_score, CatalogView, EngineError};
use crate::models::{ListenerId, Recommendation, Track, TrackId};

pub const HISTORY_REASON: &str = "Based on your listening history";

/// Ranks unheard tracks against the listener's profile
///
/// Any interaction at all, skips included, removes a track from the pool.
/// Candidates whose genre appears anywhere in the profile get the flat
/// `collaborative_genre_boost`, whatever that genre's share is.
pub fn recommend_for_listener(
    listener_id: ListenerId,
    profile: &ListenerProfile,
    view: CatalogView<'_>,
    limit: usize,
    config: &EngineConfig,
) -> Result<Vec<Recommendation>, EngineError> {
    if view.listener(listener_id).is_none() {
        return Err(EngineError::ListenerNotFound(listener_id));
    }

    let heard: HashSet<TrackId> = view.history_of(listener_id).map(|i| i.track_id).collect();
    let candidates: Vec<&Track> = view.tracks.iter().filter(|t| !heard.contains(&t.id)).collect();
    let candidate_raw: Vec<FeatureVector> = candidates
        .iter()
        .map(|t| FeatureVector::from_track(t))
        .collect();

    let normalizer =
        Normalizer::fit(std::iter::once(&profile.features).chain(candidate_raw.iter()));
    let profile_vec = normalizer.transform(&profile.features);

    let scored: Vec<(&Track, f64)> = candidates
        .iter()
        .zip(candidate_raw.iter())
        .map(|(track, raw)| {
            let candidate_vec = normalizer.transform(raw);
            let mut score = weighted_cosine(&profile_vec, &candidate_vec, &config.weights);
            if profile.likes_genre(track.genre.as_deref()) {
                score *= config.collaborative_genre_boost;
            }
            (*track, score)
        })
        .collect();

    tracing::debug!(
        listener_id,
        candidates = scored.len(),
        excluded = heard.len(),
        "Scored collaborative candidates"
    );

    Ok(rank_by_score(scored, limit)
        .into_iter()
        .map(|(track, score)| Recommendation::new(track, score, HISTORY_REASON))
        .collect())
}
