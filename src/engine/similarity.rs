//! Weighted cosine similarity between normalized feature vectors.
//!
//! Weights scale each dimension first; the score is then the plain cosine of
//! the two weighted vectors. For non-negative normalized inputs the result
//! lies in [0, 1]. A zero-magnitude side scores 0.0.

use serde::{Deserialize, Serialize};

use super::features::{AudioFeature, NormalizedVector, FEATURE_COUNT};

/// Per-dimension importance, indexed in vector order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeights([f64; FEATURE_COUNT]);

impl Default for FeatureWeights {
    fn default() -> Self {
        Self::new([
            0.15, // tempo
            0.20, // energy
            0.15, // danceability
            0.15, // valence
            0.10, // acousticness
            0.10, // instrumentalness
            0.05, // loudness
            0.10, // speechiness
        ])
    }
}

impl FeatureWeights {
    pub fn new(weights: [f64; FEATURE_COUNT]) -> Self {
        Self(weights)
    }

    pub fn weight(&self, feature: AudioFeature) -> f64 {
        self.0[feature.index()]
    }

    /// Returns a copy with one weight replaced
    pub fn with(mut self, feature: AudioFeature, weight: f64) -> Self {
        self.0[feature.index()] = weight;
        self
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    fn apply(&self, vector: &NormalizedVector) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = vector.0[i] * self.0[i];
        }
        out
    }
}

/// Cosine similarity of the two vectors after weighting
pub fn weighted_cosine(
    a: &NormalizedVector,
    b: &NormalizedVector,
    weights: &FeatureWeights,
) -> f64 {
    let wa = weights.apply(a);
    let wb = weights.apply(b);

    let dot: f64 = wa.iter().zip(wb.iter()).map(|(x, y)| x * y).sum();
    let norm_a = wa.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = wb.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
