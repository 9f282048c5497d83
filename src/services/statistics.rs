use std::sync::Arc;

use crate::{
    engine::{stats, CatalogView, EngineError, RecommendationEngine},
    error::AppResult,
    models::{CatalogSummary, ListenerId, ListenerStatistics, TrackId, TrackStatistics},
    services::catalog::CatalogSource,
};

pub async fn track_statistics(
    catalog: Arc<dyn CatalogSource>,
    engine: &RecommendationEngine,
    track_id: TrackId,
) -> AppResult<TrackStatistics> {
    let (track, interactions) =
        tokio::try_join!(catalog.track(track_id), catalog.track_interactions(track_id))?;

    let track = track.ok_or(EngineError::TrackNotFound(track_id))?;
    let tracks = [track];
    let stats = engine.track_statistics(track_id, CatalogView::new(&tracks, &[], &interactions))?;

    tracing::info!(track_id, play_count = stats.play_count, "Computed track statistics");
    Ok(stats)
}

pub async fn listener_statistics(
    catalog: Arc<dyn CatalogSource>,
    engine: &RecommendationEngine,
    listener_id: ListenerId,
) -> AppResult<ListenerStatistics> {
    let (listener, history, tracks) = tokio::try_join!(
        catalog.listener(listener_id),
        catalog.listener_history(listener_id),
        catalog.tracks(),
    )?;

    let listener = listener.ok_or(EngineError::ListenerNotFound(listener_id))?;
    let listeners = [listener];
    let stats =
        engine.listener_statistics(listener_id, CatalogView::new(&tracks, &listeners, &history))?;

    tracing::info!(
        listener_id,
        total_interactions = stats.total_interactions,
        "Computed listener statistics"
    );
    Ok(stats)
}

/// Distinct genres across the catalog, sorted
pub async fn genres(catalog: Arc<dyn CatalogSource>) -> AppResult<Vec<String>> {
    let tracks = catalog.tracks().await?;
    Ok(stats::genres(&tracks))
}

pub async fn summary(catalog: Arc<dyn CatalogSource>) -> AppResult<CatalogSummary> {
    catalog.summary().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{ActionKind, Interaction, Listener, Track};
    use crate::services::catalog::{InMemoryCatalog, MockCatalogSource};
    use chrono::{DateTime, Utc};

    fn catalog() -> Arc<dyn CatalogSource> {
        let epoch = DateTime::<Utc>::UNIX_EPOCH;
        Arc::new(InMemoryCatalog::new(
            vec![
                Track::new(1, "Blue in Green", "Miles Davis").with_genre("Jazz"),
                Track::new(2, "Paranoid", "Black Sabbath").with_genre("Metal"),
                Track::new(3, "Untitled", "Unknown"),
            ],
            vec![Listener {
                id: 1,
                email: "bob@example.com".to_string(),
                display_name: Some("bob_beats".to_string()),
                created_at: epoch,
            }],
            vec![
                Interaction::new(1, 1, 1, ActionKind::Play, epoch).listened_for(200).rated(5),
                Interaction::new(2, 1, 1, ActionKind::Like, epoch).rated(4),
                Interaction::new(3, 1, 2, ActionKind::Skip, epoch).listened_for(10),
            ],
        ))
    }

    #[tokio::test]
    async fn test_track_statistics() {
        let engine = RecommendationEngine::default();
        let stats = track_statistics(catalog(), &engine, 1).await.unwrap();

        assert_eq!(stats.play_count, 1);
        assert_eq!(stats.like_count, 1);
        assert_eq!(stats.skip_count, 0);
        assert_eq!(stats.average_rating, Some(4.5));
    }

    #[tokio::test]
    async fn test_track_statistics_unknown_track() {
        let engine = RecommendationEngine::default();
        let err = track_statistics(catalog(), &engine, 77).await.unwrap_err();
        assert!(matches!(err, AppError::Engine(EngineError::TrackNotFound(77))));
    }

    #[tokio::test]
    async fn test_listener_statistics() {
        let engine = RecommendationEngine::default();
        let stats = listener_statistics(catalog(), &engine, 1).await.unwrap();

        assert_eq!(stats.total_interactions, 3);
        assert_eq!(stats.favorite_genre.as_deref(), Some("Jazz"));
        assert_eq!(stats.total_listening_time, Some(210));
    }

    #[tokio::test]
    async fn test_listener_statistics_unknown_listener() {
        let mut mock = MockCatalogSource::new();
        mock.expect_listener().returning(|_| Ok(None));
        mock.expect_listener_history().returning(|_| Ok(vec![]));
        mock.expect_tracks().returning(|| Ok(vec![]));

        let engine = RecommendationEngine::default();
        let err = listener_statistics(Arc::new(mock), &engine, 5).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_genres_and_summary() {
        let catalog = catalog();

        let listed = tokio_test::block_on(genres(catalog.clone())).unwrap();
        assert_eq!(listed, vec!["Jazz".to_string(), "Metal".to_string()]);

        let totals = tokio_test::block_on(summary(catalog)).unwrap();
        assert_eq!(
            totals,
            CatalogSummary {
                total_users: 1,
                total_tracks: 3,
                total_interactions: 3,
            }
        );
    }
}
