//! Popularity ranking by interaction counts.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::models::{Interaction, Track, TrackId, TrendingTrack};

/// Ranks tracks by how many interactions they received
///
/// With a `window`, only interactions at or after `now - window` count. A
/// window reaching past the earliest representable instant counts everything.
/// Ties go to the lower track id. When nothing was counted, the newest
/// catalog tracks are returned instead, each with a count of zero.
pub fn rank_trending(
    tracks: &[Track],
    interactions: &[Interaction],
    limit: usize,
    now: DateTime<Utc>,
    window: Option<Duration>,
) -> Vec<TrendingTrack> {
    let cutoff = window.and_then(|w| now.checked_sub_signed(w));

    let mut counts: HashMap<TrackId, u64> = HashMap::new();
    for interaction in interactions {
        if cutoff.is_some_and(|c| interaction.created_at < c) {
            continue;
        }
        *counts.entry(interaction.track_id).or_default() += 1;
    }

    let mut ranked: Vec<(&Track, u64)> = tracks
        .iter()
        .filter_map(|t| counts.get(&t.id).map(|&count| (t, count)))
        .collect();

    if ranked.is_empty() {
        return newest_tracks(tracks, limit);
    }

    ranked.sort_by(|(a, ca), (b, cb)| cb.cmp(ca).then_with(|| a.id.cmp(&b.id)));
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|(track, interaction_count)| TrendingTrack {
            track: track.clone(),
            interaction_count,
        })
        .collect()
}

fn newest_tracks(tracks: &[Track], limit: usize) -> Vec<TrendingTrack> {
    let mut newest: Vec<&Track> = tracks.iter().collect();
    newest.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    newest
        .into_iter()
        .take(limit)
        .map(|track| TrendingTrack {
            track: track.clone(),
            interaction_count: 0,
        })
        .collect()
}
