//! Fixed-order audio feature vectors.
//!
//! The musical key is categorical and never enters a vector. Absent values
//! stay absent here; the normalizer decides what they become.

use serde::{Deserialize, Serialize};

use crate::models::Track;

pub const FEATURE_COUNT: usize = 8;

/// One dimension of a feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFeature {
    Tempo,
    Energy,
    Danceability,
    Valence,
    Acousticness,
    Instrumentalness,
    Loudness,
    Speechiness,
}

impl AudioFeature {
    /// Every feature, in vector order
    pub const ALL: [AudioFeature; FEATURE_COUNT] = [
        AudioFeature::Tempo,
        AudioFeature::Energy,
        AudioFeature::Danceability,
        AudioFeature::Valence,
        AudioFeature::Acousticness,
        AudioFeature::Instrumentalness,
        AudioFeature::Loudness,
        AudioFeature::Speechiness,
    ];

    /// Position of this feature inside a vector
    pub fn index(self) -> usize {
        self as usize
    }

    /// Reads this feature's raw value from a track
    pub fn read(self, track: &Track) -> Option<f64> {
        match self {
            AudioFeature::Tempo => track.tempo,
            AudioFeature::Energy => track.energy,
            AudioFeature::Danceability => track.danceability,
            AudioFeature::Valence => track.valence,
            AudioFeature::Acousticness => track.acousticness,
            AudioFeature::Instrumentalness => track.instrumentalness,
            AudioFeature::Loudness => track.loudness,
            AudioFeature::Speechiness => track.speechiness,
        }
    }
}

/// Raw feature values of a track (or an aggregate of tracks)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureVector(pub [Option<f64>; FEATURE_COUNT]);

impl FeatureVector {
    /// Extracts the vector of a track. Non-finite values count as absent.
    pub fn from_track(track: &Track) -> Self {
        let mut values = [None; FEATURE_COUNT];
        for feature in AudioFeature::ALL {
            values[feature.index()] = feature.read(track).filter(|v| v.is_finite());
        }
        Self(values)
    }

    pub fn get(&self, feature: AudioFeature) -> Option<f64> {
        self.0[feature.index()]
    }

    /// True when no feature value is present
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    /// Per-dimension arithmetic mean over the vectors that have a value there
    ///
    /// A dimension absent from every input stays absent.
    pub fn mean<'a, I>(vectors: I) -> Self
    where
        I: IntoIterator<Item = &'a FeatureVector>,
    {
        let mut sums = [0.0_f64; FEATURE_COUNT];
        let mut counts = [0_usize; FEATURE_COUNT];

        for vector in vectors {
            for (i, value) in vector.0.iter().enumerate() {
                if let Some(v) = value {
                    sums[i] += v;
                    counts[i] += 1;
                }
            }
        }

        let mut values = [None; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            if counts[i] > 0 {
                values[i] = Some(sums[i] / counts[i] as f64);
            }
        }
        Self(values)
    }
}

impl From<&Track> for FeatureVector {
    fn from(track: &Track) -> Self {
        FeatureVector::from_track(track)
    }
}

/// Feature values rescaled against one candidate pool
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedVector(pub [f64; FEATURE_COUNT]);

impl NormalizedVector {
    pub fn get(&self, feature: AudioFeature) -> f64 {
        self.0[feature.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzed_track() -> Track {
        Track {
            tempo: Some(120.0),
            energy: Some(0.8),
            danceability: Some(0.7),
            valence: Some(0.6),
            acousticness: Some(0.1),
            instrumentalness: Some(0.0),
            loudness: Some(-5.5),
            speechiness: Some(0.04),
            key: Some("F#".to_string()),
            ..Track::new(1, "Blinding Lights", "The Weeknd")
        }
    }

    #[test]
    fn test_extraction_follows_fixed_order() {
        let vector = FeatureVector::from_track(&analyzed_track());
        assert_eq!(
            vector.0,
            [
                Some(120.0),
                Some(0.8),
                Some(0.7),
                Some(0.6),
                Some(0.1),
                Some(0.0),
                Some(-5.5),
                Some(0.04),
            ]
        );
        assert_eq!(vector.get(AudioFeature::Loudness), Some(-5.5));
    }

    #[test]
    fn test_missing_features_stay_absent() {
        let track = Track {
            energy: Some(0.5),
            ..Track::new(2, "Untitled", "Unknown")
        };
        let vector = FeatureVector::from_track(&track);

        assert_eq!(vector.get(AudioFeature::Energy), Some(0.5));
        assert_eq!(vector.get(AudioFeature::Tempo), None);
        assert!(!vector.is_blank());
        assert!(FeatureVector::from_track(&Track::new(3, "a", "b")).is_blank());
    }

    #[test]
    fn test_non_finite_values_are_dropped() {
        let track = Track {
            tempo: Some(f64::NAN),
            loudness: Some(f64::NEG_INFINITY),
            ..Track::new(4, "Noise", "Static")
        };
        assert!(FeatureVector::from_track(&track).is_blank());
    }

    #[test]
    fn test_mean_skips_absent_values() {
        let mut a = FeatureVector::default();
        a.0[AudioFeature::Energy.index()] = Some(0.9);
        a.0[AudioFeature::Tempo.index()] = Some(100.0);

        let mut b = FeatureVector::default();
        b.0[AudioFeature::Energy.index()] = Some(0.7);

        let mean = FeatureVector::mean([&a, &b]);
        assert!((mean.get(AudioFeature::Energy).unwrap() - 0.8).abs() < 1e-12);
        assert_eq!(mean.get(AudioFeature::Tempo), Some(100.0));
        assert_eq!(mean.get(AudioFeature::Valence), None);
    }

    #[test]
    fn test_mean_of_single_vector_is_identity() {
        let vector = FeatureVector::from_track(&analyzed_track());
        assert_eq!(FeatureVector::mean([&vector]), vector);
    }
}
