//! Content-based recommendations: tracks that sound like a reference track.

use super::config::EngineConfig;
use super::features::FeatureVector;
use super::normalize::Normalizer;
use super::similarity::weighted_cosine;
use super::{rank_by_score, EngineError};
use crate::models::{Recommendation, Track, TrackId};

/// Ranks every other track by weighted similarity to the reference track
///
/// The reference and all candidates share one min-max scale. Candidates with
/// exactly the reference's genre get `content_genre_boost` applied after
/// scoring; boosted scores are left unclamped.
pub fn recommend_similar(
    reference_id: TrackId,
    tracks: &[Track],
    limit: usize,
    config: &EngineConfig,
) -> Result<Vec<Recommendation>, EngineError> {
    let reference = tracks
        .iter()
        .find(|t| t.id == reference_id)
        .ok_or(EngineError::TrackNotFound(reference_id))?;

    let candidates: Vec<&Track> = tracks.iter().filter(|t| t.id != reference_id).collect();

    let reference_raw = FeatureVector::from_track(reference);
    let candidate_raw: Vec<FeatureVector> = candidates
        .iter()
        .map(|t| FeatureVector::from_track(t))
        .collect();

    let normalizer = Normalizer::fit(std::iter::once(&reference_raw).chain(candidate_raw.iter()));
    let reference_vec = normalizer.transform(&reference_raw);

    let scored: Vec<(&Track, f64)> = candidates
        .iter()
        .zip(candidate_raw.iter())
        .map(|(track, raw)| {
            let candidate_vec = normalizer.transform(raw);
            let mut score = weighted_cosine(&reference_vec, &candidate_vec, &config.weights);
            if track.same_genre(reference) {
                score *= config.content_genre_boost;
            }
            (*track, score)
        })
        .collect();

    let reason = format!("Similar audio features to {}", reference.title);

    Ok(rank_by_score(scored, limit)
        .into_iter()
        .map(|(track, score)| Recommendation::new(track, score, reason.as_str()))
        .collect())
}
