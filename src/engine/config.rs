use chrono::Duration;

use super::similarity::FeatureWeights;
use super::EngineError;
use crate::models::{ActionKind, Interaction};

/// Decides which interactions count as a listener liking a track
#[derive(Debug, Clone, PartialEq)]
pub struct PositiveRule {
    /// Action kinds that are positive on their own
    pub kinds: Vec<ActionKind>,
    /// Ratings at or above this value are positive for any non-negative action
    pub min_rating: Option<u8>,
}

impl Default for PositiveRule {
    fn default() -> Self {
        Self {
            kinds: vec![ActionKind::Like, ActionKind::PlaylistAdd],
            min_rating: Some(4),
        }
    }
}

impl PositiveRule {
    pub fn is_positive(&self, interaction: &Interaction) -> bool {
        if interaction.action.is_negative() {
            return false;
        }
        if self.kinds.contains(&interaction.action) {
            return true;
        }
        matches!((self.min_rating, interaction.rating), (Some(min), Some(r)) if r >= min)
    }
}

/// Accepted range for result limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitBounds {
    pub min: usize,
    pub max: usize,
    pub default: usize,
}

impl LimitBounds {
    pub fn new(min: usize, max: usize, default: usize) -> Self {
        Self { min, max, default }
    }

    /// Resolves an optional requested limit, rejecting values out of range
    pub fn resolve(&self, requested: Option<usize>) -> Result<usize, EngineError> {
        let limit = requested.unwrap_or(self.default);
        if limit < self.min || limit > self.max {
            return Err(EngineError::InvalidLimit {
                requested: limit,
                min: self.min,
                max: self.max,
            });
        }
        Ok(limit)
    }
}

/// Every tunable of the engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub weights: FeatureWeights,
    /// Multiplier for candidates sharing the reference track's genre
    pub content_genre_boost: f64,
    /// Multiplier for candidates in any genre of the listener's profile
    pub collaborative_genre_boost: f64,
    pub positive: PositiveRule,
    /// Bounds for the similarity-based endpoints
    pub limits: LimitBounds,
    /// Bounds for the trending endpoint
    pub trending_limits: LimitBounds,
    /// Only interactions this recent count towards trending; `None` counts all
    pub trending_window: Option<Duration>,
    /// Only this many most recent positive interactions feed a profile
    pub profile_history_limit: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: FeatureWeights::default(),
            content_genre_boost: 1.2,
            collaborative_genre_boost: 1.3,
            positive: PositiveRule::default(),
            limits: LimitBounds::new(1, 50, 10),
            trending_limits: LimitBounds::new(1, 100, 20),
            trending_window: None,
            profile_history_limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn interaction(action: ActionKind) -> Interaction {
        Interaction::new(1, 1, 1, action, Utc::now())
    }

    #[test]
    fn test_default_positive_kinds() {
        let rule = PositiveRule::default();
        assert!(rule.is_positive(&interaction(ActionKind::Like)));
        assert!(rule.is_positive(&interaction(ActionKind::PlaylistAdd)));
        assert!(!rule.is_positive(&interaction(ActionKind::Play)));
        assert!(!rule.is_positive(&interaction(ActionKind::Skip)));
        assert!(!rule.is_positive(&interaction(ActionKind::Dislike)));
    }

    #[test]
    fn test_high_rating_makes_play_positive() {
        let rule = PositiveRule::default();
        assert!(rule.is_positive(&interaction(ActionKind::Play).rated(4)));
        assert!(rule.is_positive(&interaction(ActionKind::Play).rated(5)));
        assert!(!rule.is_positive(&interaction(ActionKind::Play).rated(3)));
    }

    #[test]
    fn test_negative_actions_ignore_rating() {
        let rule = PositiveRule::default();
        assert!(!rule.is_positive(&interaction(ActionKind::Skip).rated(5)));
        assert!(!rule.is_positive(&interaction(ActionKind::Dislike).rated(5)));
    }

    #[test]
    fn test_custom_rule() {
        let rule = PositiveRule {
            kinds: vec![ActionKind::Play],
            min_rating: None,
        };
        assert!(rule.is_positive(&interaction(ActionKind::Play)));
        assert!(!rule.is_positive(&interaction(ActionKind::Like).rated(5)));
    }

    #[test]
    fn test_limit_bounds_resolve() {
        let bounds = LimitBounds::new(1, 50, 10);
        assert_eq!(bounds.resolve(None).unwrap(), 10);
        assert_eq!(bounds.resolve(Some(1)).unwrap(), 1);
        assert_eq!(bounds.resolve(Some(50)).unwrap(), 50);
        assert!(matches!(
            bounds.resolve(Some(0)),
            Err(EngineError::InvalidLimit { requested: 0, min: 1, max: 50 })
        ));
        assert!(bounds.resolve(Some(51)).is_err());
    }

    #[test]
    fn test_default_config_matches_reference_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.content_genre_boost, 1.2);
        assert_eq!(config.collaborative_genre_boost, 1.3);
        assert_eq!(config.trending_window, None);
        assert_eq!(config.limits.max, 50);
    }
}
