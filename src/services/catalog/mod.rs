//! Catalog data access
//!
//! The engine only ever sees slices of records. A `CatalogSource` is where
//! those slices come from: Postgres in production, an in-memory catalog in
//! tests and local runs.
use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::{CatalogSummary, Interaction, Listener, ListenerId, Track, TrackId},
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCatalog;
pub use postgres::PostgresCatalog;

/// Read access to tracks, listeners and their interactions
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Every track in the catalog, ordered by id
    async fn tracks(&self) -> AppResult<Vec<Track>>;

    async fn track(&self, id: TrackId) -> AppResult<Option<Track>>;

    async fn listener(&self, id: ListenerId) -> AppResult<Option<Listener>>;

    /// All interactions recorded by one listener, oldest first
    async fn listener_history(&self, id: ListenerId) -> AppResult<Vec<Interaction>>;

    /// All interactions recorded against one track
    async fn track_interactions(&self, id: TrackId) -> AppResult<Vec<Interaction>>;

    /// Interactions at or after `since`, or every interaction when `None`
    async fn interactions_since(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<Interaction>>;

    async fn summary(&self) -> AppResult<CatalogSummary>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}
