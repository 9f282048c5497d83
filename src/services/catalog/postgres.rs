use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::{
        ActionKind, CatalogSummary, Interaction, Listener, ListenerId, Track, TrackId,
    },
    services::catalog::CatalogSource,
};

const TRACK_COLUMNS: &str = "id, title, artist, album, genre, duration, tempo, key, energy, \
     danceability, valence, acousticness, instrumentalness, loudness, speechiness, created_at";

const INTERACTION_COLUMNS: &str =
    "id, user_id, track_id, action, rating, listen_duration, created_at";

/// Catalog backed by the `tracks`, `users` and `interactions` tables
#[derive(Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TrackRow {
    id: i64,
    title: String,
    artist: String,
    album: Option<String>,
    genre: Option<String>,
    duration: Option<i32>,
    tempo: Option<f64>,
    key: Option<String>,
    energy: Option<f64>,
    danceability: Option<f64>,
    valence: Option<f64>,
    acousticness: Option<f64>,
    instrumentalness: Option<f64>,
    loudness: Option<f64>,
    speechiness: Option<f64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TrackRow> for Track {
    type Error = AppError;

    fn try_from(row: TrackRow) -> Result<Self, Self::Error> {
        let duration = row
            .duration
            .map(|seconds| {
                u32::try_from(seconds).map_err(|_| {
                    AppError::Internal(format!("Track {} has negative duration", row.id))
                })
            })
            .transpose()?;

        Ok(Track {
            id: row.id,
            title: row.title,
            artist: row.artist,
            album: row.album,
            genre: row.genre,
            duration,
            tempo: row.tempo,
            key: row.key,
            energy: row.energy,
            danceability: row.danceability,
            valence: row.valence,
            acousticness: row.acousticness,
            instrumentalness: row.instrumentalness,
            loudness: row.loudness,
            speechiness: row.speechiness,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ListenerRow {
    id: i64,
    email: String,
    username: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ListenerRow> for Listener {
    fn from(row: ListenerRow) -> Self {
        Listener {
            id: row.id,
            email: row.email,
            display_name: row.username,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InteractionRow {
    id: i64,
    user_id: i64,
    track_id: i64,
    action: String,
    rating: Option<i16>,
    listen_duration: Option<i32>,
    created_at: DateTime<Utc>,
}

impl TryFrom<InteractionRow> for Interaction {
    type Error = AppError;

    fn try_from(row: InteractionRow) -> Result<Self, Self::Error> {
        let action: ActionKind = row
            .action
            .parse()
            .map_err(|e| AppError::Internal(format!("Interaction {}: {}", row.id, e)))?;

        let rating = row
            .rating
            .map(|r| {
                u8::try_from(r).map_err(|_| {
                    AppError::Internal(format!("Interaction {} has rating {}", row.id, r))
                })
            })
            .transpose()?;

        let listen_duration = row
            .listen_duration
            .map(|seconds| {
                u32::try_from(seconds).map_err(|_| {
                    AppError::Internal(format!(
                        "Interaction {} has negative listen duration",
                        row.id
                    ))
                })
            })
            .transpose()?;

        Ok(Interaction {
            id: row.id,
            user_id: row.user_id,
            track_id: row.track_id,
            action,
            rating,
            listen_duration,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    total_users: i64,
    total_tracks: i64,
    total_interactions: i64,
}

fn convert_all<R, T>(rows: Vec<R>) -> AppResult<Vec<T>>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[async_trait::async_trait]
impl CatalogSource for PostgresCatalog {
    async fn tracks(&self) -> AppResult<Vec<Track>> {
        let rows: Vec<TrackRow> =
            sqlx::query_as(&format!("SELECT {} FROM tracks ORDER BY id", TRACK_COLUMNS))
                .fetch_all(&self.pool)
                .await?;

        tracing::debug!(count = rows.len(), "Loaded tracks");
        convert_all(rows)
    }

    async fn track(&self, id: TrackId) -> AppResult<Option<Track>> {
        let row: Option<TrackRow> =
            sqlx::query_as(&format!("SELECT {} FROM tracks WHERE id = $1", TRACK_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Track::try_from).transpose()
    }

    async fn listener(&self, id: ListenerId) -> AppResult<Option<Listener>> {
        let row: Option<ListenerRow> =
            sqlx::query_as("SELECT id, email, username, created_at FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Listener::from))
    }

    async fn listener_history(&self, id: ListenerId) -> AppResult<Vec<Interaction>> {
        let rows: Vec<InteractionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM interactions WHERE user_id = $1 ORDER BY created_at, id",
            INTERACTION_COLUMNS
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    async fn track_interactions(&self, id: TrackId) -> AppResult<Vec<Interaction>> {
        let rows: Vec<InteractionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM interactions WHERE track_id = $1 ORDER BY created_at, id",
            INTERACTION_COLUMNS
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    async fn interactions_since(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<Interaction>> {
        let rows: Vec<InteractionRow> = match since {
            Some(cutoff) => {
                sqlx::query_as(&format!(
                    "SELECT {} FROM interactions WHERE created_at >= $1 ORDER BY created_at, id",
                    INTERACTION_COLUMNS
                ))
                .bind(cutoff)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {} FROM interactions ORDER BY created_at, id",
                    INTERACTION_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        tracing::debug!(count = rows.len(), since = ?since, "Loaded interactions");
        convert_all(rows)
    }

    async fn summary(&self) -> AppResult<CatalogSummary> {
        let row: SummaryRow = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM tracks) AS total_tracks,
                (SELECT COUNT(*) FROM interactions) AS total_interactions
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(CatalogSummary {
            total_users: row.total_users.max(0) as u64,
            total_tracks: row.total_tracks.max(0) as u64,
            total_interactions: row.total_interactions.max(0) as u64,
        })
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
