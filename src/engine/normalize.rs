//! Per-request min-max normalization.
//!
//! Ranges are fitted to the candidate pool of a single request and never
//! shared, so the same track can normalize differently in different pools.

use super::features::{AudioFeature, FeatureVector, NormalizedVector, FEATURE_COUNT};

/// Value given to every member of a dimension whose pool range is flat
pub const FLAT_DIMENSION_VALUE: f64 = 0.5;

/// Observed range of one dimension across a pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionRange {
    pub min: f64,
    pub max: f64,
}

impl DimensionRange {
    fn include(self, value: f64) -> Self {
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
        }
    }

    fn scale(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            FLAT_DIMENSION_VALUE
        } else {
            (value - self.min) / span
        }
    }
}

/// Min-max ranges fitted to one candidate pool
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Normalizer {
    ranges: [Option<DimensionRange>; FEATURE_COUNT],
}

impl Normalizer {
    /// Fits ranges over the present values of every vector in the pool
    pub fn fit<'a, I>(pool: I) -> Self
    where
        I: IntoIterator<Item = &'a FeatureVector>,
    {
        let mut ranges: [Option<DimensionRange>; FEATURE_COUNT] = [None; FEATURE_COUNT];

        for vector in pool {
            for (range, value) in ranges.iter_mut().zip(vector.0.iter()) {
                if let Some(v) = *value {
                    *range = Some(match *range {
                        Some(r) => r.include(v),
                        None => DimensionRange { min: v, max: v },
                    });
                }
            }
        }

        Self { ranges }
    }

    pub fn range(&self, feature: AudioFeature) -> Option<DimensionRange> {
        self.ranges[feature.index()]
    }

    /// Rescales a vector; absent values become 0.0
    pub fn transform(&self, vector: &FeatureVector) -> NormalizedVector {
        let mut out = [0.0; FEATURE_COUNT];
        for (i, value) in vector.0.iter().enumerate() {
            out[i] = match (value, self.ranges[i]) {
                (Some(v), Some(range)) => range.scale(*v),
                (Some(_), None) => FLAT_DIMENSION_VALUE,
                (None, _) => 0.0,
            };
        }
        NormalizedVector(out)
    }
}

/// Fits a normalizer to the pool and rescales every member of it
pub fn normalize_pool(pool: &[FeatureVector]) -> Vec<NormalizedVector> {
    let normalizer = Normalizer::fit(pool);
    pool.iter().map(|v| normalizer.transform(v)).collect()
}
