use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use cp_core::config::{FeatureConfig, PipelineConfig, SourceKind};
use cp_core::corpus::Corpus;
use cp_core::traits::SourceAdapter;
use cp_export::{aggregate, build_training_set, write_corpus, write_training_set};
use cp_source::{AdapterReport, GuitarSetAdapter, IdmtAdapter, run_adapter};

use crate::report::{RunOutcome, RunSummary};

/// Construit les adaptateurs demandés, dans l'ordre d'invocation.
#[must_use]
pub fn build_adapters(config: &PipelineConfig) -> Vec<Box<dyn SourceAdapter>> {
    config
        .sources
        .iter()
        .map(|&kind| -> Box<dyn SourceAdapter> {
            let every = config.progress_every(kind);
            match kind {
                SourceKind::GuitarSet => Box::new(GuitarSetAdapter::new(
                    config.dataset_root.join("guitarset").join("audio"),
                    every,
                )),
                SourceKind::Idmt => Box::new(IdmtAdapter::with_seed(
                    config.dataset_root.join("idmt-guitar"),
                    every,
                    config.seed,
                )),
            }
        })
        .collect()
}

/// Exécute le pipeline complet : extraction, agrégation, persistance.
///
/// # Errors
/// Fails without writing anything if the run is interrupted, no source
/// produced a sample, a sample disagrees with the corpus configuration, or
/// the corpus cannot be written. A training-set failure is not an error: it
/// yields [`RunOutcome::CorpusOnly`].
pub fn run(config: &PipelineConfig, cancel: &AtomicBool) -> Result<RunSummary> {
    let features = FeatureConfig::STANDARD;
    let mut reports: Vec<AdapterReport> = Vec::new();
    let mut samples = Vec::new();

    for mut adapter in build_adapters(config) {
        log::info!("=== {} ===", adapter.name());
        let outcome = run_adapter(adapter.as_mut(), &features, config.parallel, cancel);
        if outcome.report.interrupted() {
            anyhow::bail!("Interrompu pendant {} : rien n'a été écrit", adapter.name());
        }
        samples.extend(outcome.samples);
        reports.push(outcome.report);
    }

    let corpus = aggregate(samples, &features).context("Agrégation du corpus")?;
    if cancel.load(Ordering::Relaxed) {
        anyhow::bail!("Interrompu avant l'écriture : rien n'a été écrit");
    }

    let outcome = persist(&corpus, config)?;
    Ok(RunSummary {
        reports,
        total_samples: corpus.metadata.total_samples,
        unique_chords: corpus.metadata.unique_chords,
        outcome,
    })
}

/// Écrit le corpus, puis le jeu d'entraînement s'il peut être construit.
///
/// # Errors
/// Returns an error only if the corpus itself cannot be written.
pub fn persist(corpus: &Corpus, config: &PipelineConfig) -> Result<RunOutcome> {
    let corpus_path = config.corpus_path();
    write_corpus(corpus, &corpus_path)?;

    let training_path = config.training_path();
    let written = build_training_set(&corpus.samples, &corpus.metadata.feature_config)
        .map_err(anyhow::Error::from)
        .and_then(|set| write_training_set(&set, &training_path).map(|()| set.rows));

    Ok(match written {
        Ok(rows) => RunOutcome::CorpusAndTraining {
            corpus: corpus_path,
            training: training_path,
            rows,
        },
        Err(e) => {
            log::error!("Jeu d'entraînement non écrit : {e:#}");
            let mut cause = format!("{e:#}");
            // an older artifact would no longer match the corpus just written
            if let Err(stale) = remove_stale(&training_path) {
                log::error!("{stale:#}");
                cause = format!("{cause} ; {stale:#}");
            }
            RunOutcome::CorpusOnly {
                corpus: corpus_path,
                cause,
            }
        }
    })
}

/// Supprime un jeu d'entraînement laissé par un lancement précédent.
fn remove_stale(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            log::warn!("Ancien jeu d'entraînement supprimé : {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| {
            format!("Ancien jeu d'entraînement non supprimé : {}", path.display())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cp_core::feature::FeatureBundle;
    use cp_export::{load_corpus, load_training_set};
    use cp_source::AdapterStatus;

    fn write_tone(path: &Path, freq: f32) -> Result<()> {
        write_tone_frames(path, freq, 6615)
    }

    fn write_tone_frames(path: &Path, freq: f32, frames: usize) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        for i in 0..frames {
            let t = i as f32 / 22050.0;
            writer.write_sample((f32::sin(2.0 * std::f32::consts::PI * freq * t) * 10000.0) as i16)?;
        }
        writer.finalize()?;
        Ok(())
    }

    fn config_for(root: &Path, sources: Vec<SourceKind>) -> PipelineConfig {
        PipelineConfig {
            dataset_root: root.join("datasets"),
            output_dir: root.join("out"),
            sources,
            seed: Some(11),
            ..PipelineConfig::default()
        }
    }

    fn seed_guitarset(root: &Path) -> Result<()> {
        let audio = root.join("datasets/guitarset/audio");
        write_tone(&audio.join("p1_C_fingerstyle.wav"), 261.63)?;
        write_tone(&audio.join("p1_Am_strum.wav"), 220.0)?;
        write_tone(&audio.join("p2_G_pick.wav"), 196.0)?;
        Ok(())
    }

    #[test]
    fn three_structured_files_end_to_end() -> Result<()> {
        let dir = tempfile::tempdir()?;
        seed_guitarset(dir.path())?;
        let config = config_for(dir.path(), vec![SourceKind::GuitarSet]);

        let summary = run(&config, &AtomicBool::new(false))?;
        assert!(matches!(summary.outcome, RunOutcome::CorpusAndTraining { rows: 3, .. }));

        let corpus = load_corpus(&config.corpus_path())?;
        assert_eq!(corpus.metadata.total_samples, 3);
        assert_eq!(corpus.metadata.unique_chords, 3);

        let set = load_training_set(&config.training_path())?;
        assert_eq!((set.rows, set.cols), (3, 12));
        // discovery order is sorted by path: Am, C, G
        assert_eq!(set.labels, vec![21, 0, 7]);
        Ok(())
    }

    #[test]
    fn missing_unstructured_root_is_skipped_not_failed() -> Result<()> {
        let dir = tempfile::tempdir()?;
        seed_guitarset(dir.path())?;
        let config = config_for(dir.path(), SourceKind::ALL.to_vec());

        let summary = run(&config, &AtomicBool::new(false))?;
        let idmt = summary.reports.iter().find(|r| r.source == SourceKind::Idmt);
        assert_eq!(idmt.map(|r| &r.status), Some(&AdapterStatus::MissingRoot));
        assert_eq!(idmt.map(|r| r.produced), Some(0));
        assert_eq!(summary.total_samples, 3);
        Ok(())
    }

    #[test]
    fn rerun_gives_identical_metadata_counts() -> Result<()> {
        let dir = tempfile::tempdir()?;
        seed_guitarset(dir.path())?;
        write_tone(&dir.path().join("datasets/idmt-guitar/chords/riff_gm_1.wav"), 196.0)?;
        write_tone(&dir.path().join("datasets/idmt-guitar/chords/hit_02.wav"), 330.0)?;
        let config = config_for(dir.path(), SourceKind::ALL.to_vec());

        run(&config, &AtomicBool::new(false))?;
        let first = load_corpus(&config.corpus_path())?.metadata;
        run(&config, &AtomicBool::new(false))?;
        let second = load_corpus(&config.corpus_path())?.metadata;

        assert_eq!(first.total_samples, 5);
        assert_eq!(first.total_samples, second.total_samples);
        assert_eq!(first.chord_distribution, second.chord_distribution);
        assert_eq!(first.chord_distribution.get("Gm"), Some(&1));
        Ok(())
    }

    #[test]
    fn empty_corpus_writes_nothing() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = config_for(dir.path(), SourceKind::ALL.to_vec());
        assert!(run(&config, &AtomicBool::new(false)).is_err());
        assert!(!config.corpus_path().exists());
        assert!(!config.training_path().exists());
        Ok(())
    }

    #[test]
    fn interrupted_run_writes_nothing() -> Result<()> {
        let dir = tempfile::tempdir()?;
        seed_guitarset(dir.path())?;
        let config = config_for(dir.path(), vec![SourceKind::GuitarSet]);
        assert!(run(&config, &AtomicBool::new(true)).is_err());
        assert!(!config.corpus_path().exists());
        Ok(())
    }

    #[test]
    fn featureless_corpus_is_written_alone() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = config_for(dir.path(), vec![SourceKind::GuitarSet]);
        let job = cp_core::sample::SampleJob {
            id: "GuitarSet_p1_C_strum".into(),
            chord: "C".into(),
            instrument: "guitar".into(),
            quality: "studio".into(),
            path: dir.path().join("p1_C_strum.wav"),
            metadata: cp_core::sample::SampleMetadata::default(),
        };
        let sample = job.into_sample(FeatureBundle::empty(), 0.0, 22050);
        let corpus = aggregate(vec![sample], &FeatureConfig::STANDARD)?;

        let outcome = persist(&corpus, &config)?;
        assert!(matches!(outcome, RunOutcome::CorpusOnly { .. }));
        assert!(config.corpus_path().exists());
        assert!(!config.training_path().exists());
        assert_eq!(load_corpus(&config.corpus_path())?, corpus);
        Ok(())
    }

    #[test]
    fn corpus_only_run_removes_previous_training_set() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let audio = dir.path().join("datasets/guitarset/audio");
        write_tone(&audio.join("p1_C_strum.wav"), 261.63)?;
        let config = config_for(dir.path(), vec![SourceKind::GuitarSet]);

        let first = run(&config, &AtomicBool::new(false))?;
        assert_eq!(first.outcome.exit_code(), 0);
        assert!(config.training_path().exists());

        std::fs::remove_file(audio.join("p1_C_strum.wav"))?;
        write_tone_frames(&audio.join("p9_Em_pick.wav"), 329.63, 0)?;
        let second = run(&config, &AtomicBool::new(false))?;

        assert_eq!(second.outcome.exit_code(), 2);
        assert_eq!(second.reports[0].empty_features, 1);
        let corpus = load_corpus(&config.corpus_path())?;
        assert_eq!(corpus.metadata.chord_distribution.get("Em"), Some(&1));
        assert!(!config.training_path().exists());
        Ok(())
    }
}
