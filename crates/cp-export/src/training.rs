use cp_core::config::FeatureConfig;
use cp_core::error::CoreError;
use cp_core::sample::Sample;
use cp_core::training::TrainingSet;
use cp_core::vocab::{label_index, vocabulary};

use crate::error::ExportError;

/// Réduit chaque échantillon exploitable à son chroma moyen.
///
/// Samples with an empty bundle are skipped. Rows keep corpus order. Labels
/// outside the vocabulary resolve to index 0.
///
/// # Errors
/// Returns [`ExportError::EmptyTrainingSet`] if no sample has usable
/// features, and [`ExportError::Core`] if a chroma width disagrees with
/// `config`.
pub fn build_training_set(
    samples: &[Sample],
    config: &FeatureConfig,
) -> Result<TrainingSet, ExportError> {
    let cols = config.n_chroma;
    let mut features = Vec::new();
    let mut labels = Vec::new();

    for sample in samples {
        let Some(mean) = sample.features.mean_chroma() else {
            continue;
        };
        if mean.len() != cols {
            return Err(CoreError::InconsistentConfig {
                id: sample.id.clone(),
                detail: format!("{} classes de chroma, attendu {cols}", mean.len()),
            }
            .into());
        }
        features.extend_from_slice(&mean);
        labels.push(label_index(&sample.chord) as u32);
    }

    if labels.is_empty() {
        return Err(ExportError::EmptyTrainingSet {
            total: samples.len(),
        });
    }

    let rows = labels.len();
    let skipped = samples.len() - rows;
    if skipped > 0 {
        log::warn!("{skipped} échantillons sans features exclus du jeu d'entraînement");
    }
    log::info!("Jeu d'entraînement : {rows}×{cols}");
    Ok(TrainingSet::new(features, rows, cols, labels, vocabulary())?)
}
