use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::feature::FeatureBundle;

/// Forme d'onde mono à taux fixe. Éphémère : vit le temps d'une extraction.
///
/// # Example
/// ```
/// use cp_core::sample::Waveform;
/// let wave = Waveform::new(vec![0.0; 22050], 22050);
/// assert!((wave.duration_secs() - 1.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Waveform {
    /// Mono samples, nominally in [-1, 1].
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Waveform {
    /// Wrap decoded samples.
    #[must_use]
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration in seconds (0 when the rate is 0).
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.samples.len() as f64 / f64::from(self.sample_rate)
        }
    }
}

/// Source-specific details attached to a sample.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SampleMetadata {
    /// Dataset name, e.g. `GuitarSet`.
    pub source: String,
    /// Rate the audio was analysed at.
    pub sample_rate: u32,
    /// Performer id (structured source).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performer: Option<String>,
    /// Playing style (structured source).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Original file stem (unstructured source).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Le label provient du tirage de repli, pas du nom de fichier.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub label_guessed: bool,
}

/// Une observation étiquetée. Créée une fois par un adaptateur, jamais modifiée.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Sample {
    /// Source-qualified identifier.
    pub id: String,
    /// Chord label, best effort.
    pub chord: String,
    /// Instrument tag.
    pub instrument: String,
    /// Recording quality tag.
    pub quality: String,
    /// Path the audio was read from.
    pub audio_file: PathBuf,
    /// Duration in seconds.
    pub duration: f64,
    /// Extracted features, possibly empty.
    pub features: FeatureBundle,
    /// Source-specific metadata.
    pub metadata: SampleMetadata,
}

impl Sample {
    /// True if the Training-Set Builder can use this sample.
    #[must_use]
    pub fn has_usable_features(&self) -> bool {
        !self.features.is_empty()
    }
}

/// Unité de travail indépendante : un fichier classé, pas encore analysé.
///
/// Pure data. Processing it (load → extract → [`SampleJob::into_sample`])
/// touches no shared state, so jobs can be retried or mapped in parallel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleJob {
    /// Source-qualified identifier.
    pub id: String,
    /// Chord label assigned at classification.
    pub chord: String,
    /// Instrument tag.
    pub instrument: String,
    /// Quality tag.
    pub quality: String,
    /// Audio file to load.
    pub path: PathBuf,
    /// Metadata; `sample_rate` is filled in at assembly.
    pub metadata: SampleMetadata,
}

impl SampleJob {
    /// Assemble the immutable [`Sample`] once features are known.
    #[must_use]
    pub fn into_sample(self, features: FeatureBundle, duration: f64, sample_rate: u32) -> Sample {
        Sample {
            id: self.id,
            chord: self.chord,
            instrument: self.instrument,
            quality: self.quality,
            audio_file: self.path,
            duration,
            features,
            metadata: SampleMetadata {
                sample_rate,
                ..self.metadata
            },
        }
    }
}
