use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    cached,
    db::{Cache, CacheKey},
    engine::{CatalogView, EngineError, RecommendationEngine},
    error::AppResult,
    models::{Interaction, ListenerId, Recommendation, TrackId, TrendingTrack},
    services::catalog::CatalogSource,
};

/// Tracks whose audio features resemble the reference track
pub async fn similar_tracks(
    catalog: Arc<dyn CatalogSource>,
    engine: &RecommendationEngine,
    track_id: TrackId,
    limit: usize,
) -> AppResult<Vec<Recommendation>> {
    let tracks = catalog.tracks().await?;
    let recommendations = engine.similar_tracks(track_id, &tracks, limit)?;

    tracing::info!(
        track_id,
        limit,
        returned = recommendations.len(),
        "Computed similar tracks"
    );

    Ok(recommendations)
}

/// Recommendations for a listener, falling back to trending without history
///
/// The trending window is only loaded when the listener has no usable
/// profile, since only the fallback path needs it.
pub async fn personalized(
    catalog: Arc<dyn CatalogSource>,
    engine: &RecommendationEngine,
    listener_id: ListenerId,
    limit: usize,
    now: DateTime<Utc>,
) -> AppResult<Vec<Recommendation>> {
    let (listener, history, tracks) = tokio::try_join!(
        catalog.listener(listener_id),
        catalog.listener_history(listener_id),
        catalog.tracks(),
    )?;

    let listener = listener.ok_or(EngineError::ListenerNotFound(listener_id))?;
    let listeners = [listener];

    let profile = engine.profile(listener_id, CatalogView::new(&tracks, &listeners, &history));
    let interactions = if profile.is_empty() {
        let since = trending_cutoff(engine, now);
        let window = catalog.interactions_since(since).await?;
        merge_interactions(history, window)
    } else {
        history
    };

    let recommendations = engine.personalized(
        listener_id,
        CatalogView::new(&tracks, &listeners, &interactions),
        limit,
        now,
    )?;

    tracing::info!(
        listener_id,
        limit,
        fallback = profile.is_empty(),
        returned = recommendations.len(),
        source = catalog.name(),
        "Computed personalized recommendations"
    );

    Ok(recommendations)
}

/// Most interacted-with tracks as of `now`
pub async fn trending(
    catalog: Arc<dyn CatalogSource>,
    engine: &RecommendationEngine,
    limit: usize,
    now: DateTime<Utc>,
) -> AppResult<Vec<TrendingTrack>> {
    let since = trending_cutoff(engine, now);
    let (tracks, interactions) =
        tokio::try_join!(catalog.tracks(), catalog.interactions_since(since))?;

    let trending = engine.trending(&tracks, &interactions, limit, now);

    tracing::info!(
        limit,
        counted_interactions = interactions.len(),
        returned = trending.len(),
        "Computed trending tracks"
    );

    Ok(trending)
}

/// Trending tracks served through the Redis cache when one is configured
pub async fn trending_cached(
    catalog: Arc<dyn CatalogSource>,
    engine: &RecommendationEngine,
    cache: Option<&Cache>,
    ttl: u64,
    limit: usize,
) -> AppResult<Vec<TrendingTrack>> {
    let Some(cache) = cache else {
        return trending(catalog, engine, limit, Utc::now()).await;
    };

    let key = CacheKey::Trending {
        limit,
        window_days: engine.config().trending_window.map(|w| w.num_days()),
    };

    cached!(cache, key, ttl, trending(catalog, engine, limit, Utc::now()))
}

fn trending_cutoff(engine: &RecommendationEngine, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    engine
        .config()
        .trending_window
        .and_then(|window| now.checked_sub_signed(window))
}

/// Union of two interaction sets, each interaction kept once
fn merge_interactions(mut history: Vec<Interaction>, window: Vec<Interaction>) -> Vec<Interaction> {
    history.extend(window);
    history.sort_by_key(|i| i.id);
    history.dedup_by_key(|i| i.id);
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::error::AppError;
    use crate::models::{ActionKind, Listener, Track};
    use crate::services::catalog::{InMemoryCatalog, MockCatalogSource};
    use chrono::Duration;

    fn at(days: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(days)
    }

    fn listener(id: ListenerId) -> Listener {
        Listener {
            id,
            email: format!("listener{id}@example.com"),
            display_name: None,
            created_at: at(0),
        }
    }

    fn track(id: TrackId, genre: &str, energy: f64, tempo: f64) -> Track {
        Track {
            energy: Some(energy),
            tempo: Some(tempo),
            danceability: Some(energy / 2.0),
            ..Track::new(id, format!("Track {id}"), "Artist").with_genre(genre)
        }
    }

    fn catalog() -> Arc<dyn CatalogSource> {
        Arc::new(InMemoryCatalog::new(
            vec![
                track(1, "Pop", 0.8, 120.0),
                track(2, "Pop", 0.7, 118.0),
                track(3, "Rock", 0.9, 140.0),
                track(4, "Jazz", 0.2, 90.0),
            ],
            vec![listener(1), listener(2)],
            vec![
                Interaction::new(1, 1, 1, ActionKind::Like, at(10)),
                Interaction::new(2, 2, 3, ActionKind::Play, at(11)),
                Interaction::new(3, 2, 3, ActionKind::Play, at(12)),
                Interaction::new(4, 2, 4, ActionKind::Skip, at(13)),
            ],
        ))
    }

    #[tokio::test]
    async fn test_similar_tracks_excludes_reference() {
        let engine = RecommendationEngine::default();
        let results = similar_tracks(catalog(), &engine, 1, 10).await.unwrap();

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.track_id != 1));
        assert_eq!(results[0].track_id, 2);
    }

    #[tokio::test]
    async fn test_similar_tracks_unknown_reference() {
        let engine = RecommendationEngine::default();
        let err = similar_tracks(catalog(), &engine, 99, 10).await.unwrap_err();
        assert!(matches!(err, AppError::Engine(EngineError::TrackNotFound(99))));
    }

    #[tokio::test]
    async fn test_personalized_with_history_skips_heard_tracks() {
        let engine = RecommendationEngine::default();
        let results = personalized(catalog(), &engine, 1, 10, at(20)).await.unwrap();

        assert!(results.iter().all(|r| r.track_id != 1));
        assert_eq!(results[0].track_id, 2);
        assert_eq!(results[0].reason, "Based on your listening history");
    }

    #[tokio::test]
    async fn test_personalized_fallback_matches_trending() {
        let engine = RecommendationEngine::default();
        let catalog = catalog();

        // Listener 2 only played and skipped, so has no positive history
        let fallback = personalized(catalog.clone(), &engine, 2, 3, at(20)).await.unwrap();
        let trending = trending(catalog, &engine, 3, at(20)).await.unwrap();

        let fallback_ids: Vec<TrackId> = fallback.iter().map(|r| r.track_id).collect();
        let trending_ids: Vec<TrackId> = trending.iter().map(|t| t.track.id).collect();
        assert_eq!(fallback_ids, trending_ids);
        assert!(fallback.iter().all(|r| r.similarity_score == 0.0));
    }

    #[tokio::test]
    async fn test_trending_respects_window() {
        let engine = RecommendationEngine::new(EngineConfig {
            trending_window: Some(Duration::days(2)),
            ..EngineConfig::default()
        });
        let results = trending(catalog(), &engine, 10, at(13)).await.unwrap();

        let ids: Vec<TrackId> = results.iter().map(|t| t.track.id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert_eq!(results[0].interaction_count, 2);
    }

    #[tokio::test]
    async fn test_oversized_window_counts_all_history() {
        let engine = RecommendationEngine::new(EngineConfig {
            trending_window: Duration::try_days(1_000_000_000),
            ..EngineConfig::default()
        });

        let results = trending(catalog(), &engine, 5, Utc::now()).await.unwrap();
        assert_eq!(results[0].track.id, 3);
        assert_eq!(results[0].interaction_count, 2);

        let fallback = personalized(catalog(), &engine, 2, 5, Utc::now()).await.unwrap();
        assert_eq!(fallback[0].track_id, 3);
    }

    #[tokio::test]
    async fn test_trending_cached_without_cache_computes_directly() {
        let engine = RecommendationEngine::default();
        let results = trending_cached(catalog(), &engine, None, 60, 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].track.id, 3);
    }

    #[tokio::test]
    async fn test_personalized_missing_listener_short_circuits() {
        let mut mock = MockCatalogSource::new();
        mock.expect_listener().returning(|_| Ok(None));
        mock.expect_listener_history().returning(|_| Ok(vec![]));
        mock.expect_tracks().returning(|| Ok(vec![]));
        mock.expect_interactions_since().never();

        let engine = RecommendationEngine::default();
        let err = personalized(Arc::new(mock), &engine, 42, 10, at(1))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Engine(EngineError::ListenerNotFound(42))));
    }

    #[tokio::test]
    async fn test_personalized_propagates_catalog_failure() {
        let mut mock = MockCatalogSource::new();
        mock.expect_listener().returning(|id| Ok(Some(listener(id))));
        mock.expect_listener_history()
            .returning(|_| Err(AppError::Internal("connection reset".to_string())));
        mock.expect_tracks().returning(|| Ok(vec![]));

        let engine = RecommendationEngine::default();
        let err = personalized(Arc::new(mock), &engine, 1, 10, at(1)).await.unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_merge_interactions_dedups_by_id() {
        let history = vec![
            Interaction::new(1, 1, 1, ActionKind::Play, at(1)),
            Interaction::new(3, 1, 2, ActionKind::Skip, at(3)),
        ];
        let window = vec![
            Interaction::new(2, 2, 1, ActionKind::Play, at(2)),
            Interaction::new(3, 1, 2, ActionKind::Skip, at(3)),
        ];

        let ids: Vec<i64> = merge_interactions(history, window).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
