use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use super::{InteractionId, ListenerId, TrackId};

/// What a listener did with a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Play,
    Like,
    Skip,
    PlaylistAdd,
    Dislike,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::Play,
        ActionKind::Like,
        ActionKind::Skip,
        ActionKind::PlaylistAdd,
        ActionKind::Dislike,
    ];

    /// Storage and wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Play => "play",
            ActionKind::Like => "like",
            ActionKind::Skip => "skip",
            ActionKind::PlaylistAdd => "playlist_add",
            ActionKind::Dislike => "dislike",
        }
    }

    /// Skips and dislikes express rejection regardless of any rating attached
    pub fn is_negative(self) -> bool {
        matches!(self, ActionKind::Skip | ActionKind::Dislike)
    }
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when a stored action string is not one of the known kinds
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown interaction action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for ActionKind {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

/// An append-only fact: a listener acted on a track at a point in time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    pub id: InteractionId,
    pub user_id: ListenerId,
    pub track_id: TrackId,
    pub action: ActionKind,
    /// Optional 1–5 rating
    pub rating: Option<u8>,
    /// Seconds listened
    pub listen_duration: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl Interaction {
    /// Creates an unrated interaction without a listen duration
    pub fn new(
        id: InteractionId,
        user_id: ListenerId,
        track_id: TrackId,
        action: ActionKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            track_id,
            action,
            rating: None,
            listen_duration: None,
            created_at,
        }
    }

    /// Attaches a rating
    pub fn rated(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Attaches a listen duration in seconds
    pub fn listened_for(mut self, seconds: u32) -> Self {
        self.listen_duration = Some(seconds);
        self
    }
}
