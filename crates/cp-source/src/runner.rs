//! Drive one adapter: discover, classify, then load and extract every job.
//!
//! Classification runs sequentially in discovery order. Extraction runs
//! either sequentially or on the rayon pool with one [`FeatureExtractor`] per
//! worker; both paths return samples in discovery order.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::{Context, Result};
use cp_audio::decode::load_mono;
use cp_audio::extractor::FeatureExtractor;
use cp_core::config::{FeatureConfig, SourceKind};
use cp_core::sample::{Sample, SampleJob};
use cp_core::traits::SourceAdapter;
use rayon::prelude::*;

use crate::scan::discover_audio;

/// Un fichier qui n'a pas pu être chargé.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub cause: String,
}

/// How an adapter run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdapterStatus {
    /// Every discovered file was handled.
    Completed,
    /// Le répertoire racine n'existe pas : source ignorée.
    MissingRoot,
    /// Root exists but could not be listed.
    Unreadable(String),
    /// Cancelled between two files; the partial samples must not be persisted.
    Interrupted,
}

/// Per-adapter counters for the run summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterReport {
    pub source: SourceKind,
    pub status: AdapterStatus,
    /// Audio files found under the root.
    pub discovered: usize,
    /// Files whose name did not fit the naming convention.
    pub skipped_naming: usize,
    /// Files that could not be decoded or resampled.
    pub failures: Vec<FileFailure>,
    /// Samples kept with an empty feature bundle.
    pub empty_features: usize,
    /// Samples whose label came from the fallback draw.
    pub guessed_labels: usize,
    /// Samples produced.
    pub produced: usize,
}

impl AdapterReport {
    fn new(source: SourceKind, status: AdapterStatus) -> Self {
        Self {
            source,
            status,
            discovered: 0,
            skipped_naming: 0,
            failures: Vec::new(),
            empty_features: 0,
            guessed_labels: 0,
            produced: 0,
        }
    }

    /// True if the run was cancelled.
    #[must_use]
    pub fn interrupted(&self) -> bool {
        self.status == AdapterStatus::Interrupted
    }
}

/// Samples plus the report describing how they were obtained.
#[derive(Debug)]
pub struct AdapterOutcome {
    pub samples: Vec<Sample>,
    pub report: AdapterReport,
}

enum JobOutcome {
    Done(Sample),
    Failed(FileFailure),
    Cancelled,
}

/// Charge, analyse et assemble un échantillon.
///
/// A decoding failure is an error; a file that decodes but yields no
/// features still produces a sample, with an empty bundle.
///
/// # Errors
/// Returns an error if the audio cannot be decoded or resampled.
pub fn process_job(job: SampleJob, extractor: &mut FeatureExtractor) -> Result<Sample> {
    let sample_rate = extractor.config().sample_rate;
    let wave = load_mono(&job.path, sample_rate)
        .with_context(|| format!("Cannot load {}", job.path.display()))?;
    let features = extractor.extract(&wave);
    Ok(job.into_sample(features, wave.duration_secs(), sample_rate))
}

/// Exécute un adaptateur de bout en bout.
///
/// A missing root is not an error: the adapter is reported as
/// [`AdapterStatus::MissingRoot`] with no samples. `cancel` is checked before
/// each file.
pub fn run_adapter(
    adapter: &mut dyn SourceAdapter,
    config: &FeatureConfig,
    parallel: bool,
    cancel: &AtomicBool,
) -> AdapterOutcome {
    let name = adapter.name();
    let root = adapter.root().to_path_buf();

    if !root.is_dir() {
        log::warn!("[{name}] Dataset introuvable : {}", root.display());
        return AdapterOutcome {
            samples: Vec::new(),
            report: AdapterReport::new(adapter.kind(), AdapterStatus::MissingRoot),
        };
    }

    log::info!("[{name}] Recherche des fichiers audio dans {}...", root.display());
    let files = match discover_audio(&root) {
        Ok(files) => files,
        Err(e) => {
            log::error!("[{name}] {e:#}");
            return AdapterOutcome {
                samples: Vec::new(),
                report: AdapterReport::new(adapter.kind(), AdapterStatus::Unreadable(e.to_string())),
            };
        }
    };

    let mut report = AdapterReport::new(adapter.kind(), AdapterStatus::Completed);
    report.discovered = files.len();

    let jobs: Vec<SampleJob> = files.iter().filter_map(|p| adapter.classify(p)).collect();
    report.skipped_naming = files.len() - jobs.len();
    report.guessed_labels = jobs.iter().filter(|j| j.metadata.label_guessed).count();
    log::info!(
        "[{name}] {} fichiers, {} retenus, {} ignorés (nommage)",
        report.discovered,
        jobs.len(),
        report.skipped_naming
    );

    let total = jobs.len();
    let every = adapter.progress_every().max(1);
    let done = AtomicUsize::new(0);
    let tick = || {
        let n = done.fetch_add(1, Ordering::Relaxed) + 1;
        if n % every == 0 {
            log::info!("[{name}] Progress: {n}/{total}");
        }
    };

    let run_one = |extractor: &mut FeatureExtractor, job: SampleJob| -> JobOutcome {
        if cancel.load(Ordering::Relaxed) {
            return JobOutcome::Cancelled;
        }
        let path = job.path.clone();
        let outcome = match process_job(job, extractor) {
            Ok(sample) => JobOutcome::Done(sample),
            Err(e) => {
                log::warn!("[{name}] Échec {} : {e:#}", path.display());
                JobOutcome::Failed(FileFailure {
                    path,
                    cause: format!("{e:#}"),
                })
            }
        };
        tick();
        outcome
    };

    let outcomes: Vec<JobOutcome> = if parallel {
        jobs.into_par_iter()
            .map_init(|| FeatureExtractor::new(*config), |ex, job| run_one(ex, job))
            .collect()
    } else {
        let mut extractor = FeatureExtractor::new(*config);
        jobs.into_iter()
            .map(|job| run_one(&mut extractor, job))
            .collect()
    };

    let mut samples = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            JobOutcome::Done(sample) => {
                if !sample.has_usable_features() {
                    report.empty_features += 1;
                }
                samples.push(sample);
            }
            JobOutcome::Failed(failure) => report.failures.push(failure),
            JobOutcome::Cancelled => report.status = AdapterStatus::Interrupted,
        }
    }
    report.produced = samples.len();

    if report.interrupted() {
        log::warn!("[{name}] Interrompu après {} échantillons", samples.len());
    } else {
        log::info!(
            "[{name}] {} échantillons, {} échecs, {} sans features",
            report.produced,
            report.failures.len(),
            report.empty_features
        );
    }

    AdapterOutcome { samples, report }
}
