//! Personalized entry point choosing between the profile and trending.
//!
//! Two states only: a listener with a usable profile gets collaborative
//! results, anyone else gets the trending ranking unchanged. Scores are
//! never blended.

use chrono::{DateTime, Utc};

use super::collaborative::recommend_for_listener;
use super::config::EngineConfig;
use super::profile::{build_profile, Profile};
use super::trending::rank_trending;
use super::{CatalogView, EngineError};
use crate::models::{ListenerId, Recommendation, TrendingTrack};

pub const FALLBACK_REASON: &str = "fallback: no history";

pub fn recommend_personalized(
    listener_id: ListenerId,
    view: CatalogView<'_>,
    limit: usize,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Result<Vec<Recommendation>, EngineError> {
    if view.listener(listener_id).is_none() {
        return Err(EngineError::ListenerNotFound(listener_id));
    }

    match build_profile(listener_id, view.interactions, view.tracks, config) {
        Profile::Built(profile) => {
            recommend_for_listener(listener_id, &profile, view, limit, config)
        }
        Profile::Empty => {
            tracing::debug!(listener_id, "No positive history, falling back to trending");
            let trending = rank_trending(
                view.tracks,
                view.interactions,
                limit,
                now,
                config.trending_window,
            );
            Ok(trending.iter().map(fallback_recommendation).collect())
        }
    }
}

/// Fallback entries keep the trending order and carry no similarity
fn fallback_recommendation(trending: &TrendingTrack) -> Recommendation {
    Recommendation::new(&trending.track, 0.0, FALLBACK_REASON)
}
