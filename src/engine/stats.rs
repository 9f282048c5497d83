//! Per-track and per-listener interaction aggregates.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{CatalogView, EngineError};
use crate::models::{
    ActionKind, ListenerId, ListenerStatistics, Track, TrackId, TrackStatistics,
};

pub fn track_statistics(
    track_id: TrackId,
    view: CatalogView<'_>,
) -> Result<TrackStatistics, EngineError> {
    if view.track(track_id).is_none() {
        return Err(EngineError::TrackNotFound(track_id));
    }

    let mut stats = TrackStatistics {
        track_id,
        play_count: 0,
        like_count: 0,
        skip_count: 0,
        average_rating: None,
    };
    let mut rating_sum = 0_u64;
    let mut rating_count = 0_u64;

    for interaction in view.interactions.iter().filter(|i| i.track_id == track_id) {
        match interaction.action {
            ActionKind::Play => stats.play_count += 1,
            ActionKind::Like => stats.like_count += 1,
            ActionKind::Skip => stats.skip_count += 1,
            ActionKind::PlaylistAdd | ActionKind::Dislike => {}
        }
        if let Some(rating) = interaction.rating {
            rating_sum += u64::from(rating);
            rating_count += 1;
        }
    }

    if rating_count > 0 {
        stats.average_rating = Some(rating_sum as f64 / rating_count as f64);
    }

    Ok(stats)
}

/// Totals for one listener; the favorite genre is the most frequent genre
/// across interacted tracks, ties going to the alphabetically first
pub fn listener_statistics(
    listener_id: ListenerId,
    view: CatalogView<'_>,
) -> Result<ListenerStatistics, EngineError> {
    if view.listener(listener_id).is_none() {
        return Err(EngineError::ListenerNotFound(listener_id));
    }

    let by_id: HashMap<TrackId, &Track> = view.tracks.iter().map(|t| (t.id, t)).collect();

    let mut total_interactions = 0_u64;
    let mut listening_time: Option<u64> = None;
    let mut genre_counts: BTreeMap<&str, u64> = BTreeMap::new();

    for interaction in view.history_of(listener_id) {
        total_interactions += 1;
        if let Some(seconds) = interaction.listen_duration {
            *listening_time.get_or_insert(0) += u64::from(seconds);
        }
        if let Some(genre) = by_id.get(&interaction.track_id).and_then(|t| t.genre.as_deref()) {
            *genre_counts.entry(genre).or_default() += 1;
        }
    }

    let favorite_genre = genre_counts
        .iter()
        .max_by(|(ga, ca), (gb, cb)| ca.cmp(cb).then_with(|| gb.cmp(ga)))
        .map(|(genre, _)| genre.to_string());

    Ok(ListenerStatistics {
        user_id: listener_id,
        total_interactions,
        favorite_genre,
        total_listening_time: listening_time,
    })
}

/// Distinct genres present in the catalog, sorted
pub fn genres(tracks: &[Track]) -> Vec<String> {
    tracks
        .iter()
        .filter_map(|t| t.genre.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
