use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::FeatureConfig;
use crate::error::CoreError;
use crate::sample::Sample;

/// Statistiques agrégées du corpus.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CorpusMetadata {
    /// Number of samples in `samples`.
    pub total_samples: usize,
    /// Number of distinct chord labels.
    pub unique_chords: usize,
    /// Label → count, sorted by label.
    pub chord_distribution: BTreeMap<String, usize>,
    /// Distinct instrument tags, sorted.
    pub instruments: Vec<String>,
    /// Distinct quality tags, sorted.
    pub qualities: Vec<String>,
    /// RFC 3339 UTC timestamp of aggregation.
    pub processing_date: String,
    /// The configuration every sample was extracted with.
    pub feature_config: FeatureConfig,
}

/// The persisted document: metadata block plus ordered samples.
///
/// Sample order is adapter invocation order, then per-adapter discovery
/// order (sorted file paths).
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Corpus {
    /// Aggregate statistics.
    pub metadata: CorpusMetadata,
    /// All samples, features inline.
    pub samples: Vec<Sample>,
}

impl Corpus {
    /// Check the document against its own metadata.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] if the declared count disagrees with the
    /// sample list, or [`CoreError::InconsistentConfig`] if any sample was
    /// extracted with a different configuration.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.metadata.total_samples != self.samples.len() {
            return Err(CoreError::Config(format!(
                "total_samples = {} mais {} échantillons",
                self.metadata.total_samples,
                self.samples.len()
            )));
        }
        for sample in &self.samples {
            check_sample_config(sample, &self.metadata.feature_config)?;
        }
        Ok(())
    }

    /// Samples the Training-Set Builder can use.
    pub fn usable_samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter().filter(|s| s.has_usable_features())
    }
}

/// Vérifie qu'un échantillon a été extrait avec `config`.
///
/// # Errors
/// Returns [`CoreError::InconsistentConfig`] on a rate or shape mismatch, or a
/// non-empty bundle whose arrays disagree in length.
pub fn check_sample_config(sample: &Sample, config: &FeatureConfig) -> Result<(), CoreError> {
    if sample.metadata.sample_rate != config.sample_rate {
        return Err(CoreError::InconsistentConfig {
            id: sample.id.clone(),
            detail: format!(
                "sample_rate {} ≠ {}",
                sample.metadata.sample_rate, config.sample_rate
            ),
        });
    }
    if !sample.features.matches_config(config) {
        return Err(CoreError::InconsistentConfig {
            id: sample.id.clone(),
            detail: format!("forme {:?}", sample.features.shape),
        });
    }
    if !sample.features.is_consistent() {
        return Err(CoreError::InconsistentConfig {
            id: sample.id.clone(),
            detail: "tableaux de longueurs différentes".into(),
        });
    }
    Ok(())
}
