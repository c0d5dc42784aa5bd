use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, SecondsFormat, Utc};
use cp_core::config::FeatureConfig;
use cp_core::corpus::{Corpus, CorpusMetadata, check_sample_config};
use cp_core::sample::Sample;

use crate::error::ExportError;

/// Agrège les échantillons de toutes les sources en un corpus horodaté.
///
/// `samples` must already be in adapter invocation order, then discovery
/// order; it is kept as given.
///
/// # Errors
/// Returns [`ExportError::EmptyCorpus`] if `samples` is empty and
/// [`ExportError::Core`] if a sample was extracted with another configuration.
pub fn aggregate(samples: Vec<Sample>, config: &FeatureConfig) -> Result<Corpus, ExportError> {
    aggregate_at(samples, config, Utc::now())
}

/// [`aggregate`] with an explicit timestamp.
///
/// # Errors
/// Same as [`aggregate`].
pub fn aggregate_at(
    samples: Vec<Sample>,
    config: &FeatureConfig,
    now: DateTime<Utc>,
) -> Result<Corpus, ExportError> {
    if samples.is_empty() {
        return Err(ExportError::EmptyCorpus);
    }
    for sample in &samples {
        check_sample_config(sample, config)?;
    }

    let mut chord_distribution = BTreeMap::new();
    let mut instruments = BTreeSet::new();
    let mut qualities = BTreeSet::new();
    for sample in &samples {
        *chord_distribution.entry(sample.chord.clone()).or_insert(0) += 1;
        instruments.insert(sample.instrument.clone());
        qualities.insert(sample.quality.clone());
    }

    let metadata = CorpusMetadata {
        total_samples: samples.len(),
        unique_chords: chord_distribution.len(),
        chord_distribution,
        instruments: instruments.into_iter().collect(),
        qualities: qualities.into_iter().collect(),
        processing_date: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        feature_config: *config,
    };
    log::info!(
        "Corpus : {} échantillons, {} accords distincts",
        metadata.total_samples,
        metadata.unique_chords
    );
    Ok(Corpus { metadata, samples })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{bundle, one_hot, sample};
    use chrono::TimeZone;
    use cp_core::error::CoreError;
    use cp_core::feature::FeatureBundle;

    #[test]
    fn counts_and_histogram() -> Result<(), ExportError> {
        let samples = vec![
            sample("a", "G", "studio", bundle(4, &one_hot(7))),
            sample("b", "C", "mixed", bundle(2, &one_hot(0))),
            sample("c", "G", "studio", FeatureBundle::empty()),
        ];
        let now = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .unwrap_or_default();
        let corpus = aggregate_at(samples, &FeatureConfig::STANDARD, now)?;
        let m = &corpus.metadata;
        assert_eq!(m.total_samples, 3);
        assert_eq!(m.unique_chords, 2);
        assert_eq!(m.chord_distribution.get("G"), Some(&2));
        assert_eq!(m.qualities, vec!["mixed", "studio"]);
        assert_eq!(m.instruments, vec!["guitar"]);
        assert_eq!(m.processing_date, "2024-05-01T12:00:00Z");
        let ids: Vec<_> = corpus.samples.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(corpus.validate().is_ok());
        Ok(())
    }

    #[test]
    fn empty_input_is_fatal() {
        let err = aggregate(Vec::new(), &FeatureConfig::STANDARD);
        assert!(matches!(err, Err(ExportError::EmptyCorpus)));
    }

    #[test]
    fn foreign_configuration_is_rejected() {
        let mut odd = sample("x", "C", "studio", bundle(3, &one_hot(0)));
        odd.metadata.sample_rate = 44100;
        let err = aggregate(vec![odd], &FeatureConfig::STANDARD);
        assert!(matches!(
            err,
            Err(ExportError::Core(CoreError::InconsistentConfig { .. }))
        ));
    }
}
