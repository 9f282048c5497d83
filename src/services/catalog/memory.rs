use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    error::AppResult,
    models::{CatalogSummary, Interaction, Listener, ListenerId, Track, TrackId},
    services::catalog::CatalogSource,
};

/// Catalog held in process memory
///
/// Clones share the same underlying records.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    inner: Arc<RwLock<InMemoryCatalogInner>>,
}

#[derive(Default)]
struct InMemoryCatalogInner {
    tracks: Vec<Track>,
    listeners: Vec<Listener>,
    interactions: Vec<Interaction>,
}

impl InMemoryCatalog {
    pub fn new(
        tracks: Vec<Track>,
        listeners: Vec<Listener>,
        interactions: Vec<Interaction>,
    ) -> Self {
        let mut inner = InMemoryCatalogInner {
            tracks,
            listeners,
            interactions,
        };
        inner.tracks.sort_by_key(|t| t.id);
        inner.interactions.sort_by_key(|i| (i.created_at, i.id));

        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    pub async fn add_track(&self, track: Track) {
        let mut inner = self.inner.write().await;
        inner.tracks.retain(|t| t.id != track.id);
        inner.tracks.push(track);
        inner.tracks.sort_by_key(|t| t.id);
    }

    pub async fn add_listener(&self, listener: Listener) {
        let mut inner = self.inner.write().await;
        inner.listeners.retain(|l| l.id != listener.id);
        inner.listeners.push(listener);
    }

    pub async fn record(&self, interaction: Interaction) {
        let mut inner = self.inner.write().await;
        inner.interactions.push(interaction);
        inner.interactions.sort_by_key(|i| (i.created_at, i.id));
    }
}

#[async_trait::async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn tracks(&self) -> AppResult<Vec<Track>> {
        Ok(self.inner.read().await.tracks.clone())
    }

    async fn track(&self, id: TrackId) -> AppResult<Option<Track>> {
        let inner = self.inner.read().await;
        Ok(inner.tracks.iter().find(|t| t.id == id).cloned())
    }

    async fn listener(&self, id: ListenerId) -> AppResult<Option<Listener>> {
        let inner = self.inner.read().await;
        Ok(inner.listeners.iter().find(|l| l.id == id).cloned())
    }

    async fn listener_history(&self, id: ListenerId) -> AppResult<Vec<Interaction>> {
        let inner = self.inner.read().await;
        Ok(inner
            .interactions
            .iter()
            .filter(|i| i.user_id == id)
            .cloned()
            .collect())
    }

    async fn track_interactions(&self, id: TrackId) -> AppResult<Vec<Interaction>> {
        let inner = self.inner.read().await;
        Ok(inner
            .interactions
            .iter()
            .filter(|i| i.track_id == id)
            .cloned()
            .collect())
    }

    async fn interactions_since(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<Interaction>> {
        let inner = self.inner.read().await;
        Ok(inner
            .interactions
            .iter()
            .filter(|i| since.map_or(true, |cutoff| i.created_at >= cutoff))
            .cloned()
            .collect())
    }

    async fn summary(&self) -> AppResult<CatalogSummary> {
        let inner = self.inner.read().await;
        Ok(CatalogSummary {
            total_users: inner.listeners.len() as u64,
            total_tracks: inner.tracks.len() as u64,
            total_interactions: inner.interactions.len() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
