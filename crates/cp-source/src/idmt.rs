use std::path::{Path, PathBuf};

use cp_core::config::SourceKind;
use cp_core::sample::{SampleJob, SampleMetadata};
use cp_core::traits::SourceAdapter;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::labels::LabelTable;

/// Nom du dataset tel qu'il apparaît dans les métadonnées.
pub const SOURCE_NAME: &str = "IDMT-SMT-Guitar";

/// Adaptateur pour la source non structurée : label déduit du nom de fichier.
///
/// The random source for fallback labels is injected so runs can be made
/// reproducible. Classification is sequential, so the draw order follows
/// discovery order.
pub struct IdmtAdapter {
    root: PathBuf,
    progress_every: usize,
    table: LabelTable,
    rng: Box<dyn RngCore + Send>,
}

impl IdmtAdapter {
    /// Adapter drawing fallback labels from `rng`.
    #[must_use]
    pub fn new(root: PathBuf, progress_every: usize, rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            root,
            progress_every: progress_every.max(1),
            table: LabelTable::IDMT,
            rng,
        }
    }

    /// Seeded when `seed` is given, otherwise seeded from OS entropy.
    #[must_use]
    pub fn with_seed(root: PathBuf, progress_every: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(root, progress_every, Box::new(rng))
    }
}

impl SourceAdapter for IdmtAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Idmt
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn progress_every(&self) -> usize {
        self.progress_every
    }

    fn classify(&mut self, path: &Path) -> Option<SampleJob> {
        let stem = path.file_stem()?.to_str()?;
        let label = self.table.infer(stem, self.rng.as_mut());
        if label.is_guess() {
            log::debug!("[{SOURCE_NAME}] {stem} : label tiré au hasard ({})", label.chord());
        }
        Some(SampleJob {
            id: format!("IDMT_{stem}"),
            chord: label.chord().to_string(),
            instrument: "guitar".into(),
            quality: "mixed".into(),
            path: path.to_path_buf(),
            metadata: SampleMetadata {
                source: SOURCE_NAME.into(),
                filename: Some(stem.to_string()),
                label_guessed: label.is_guess(),
                ..SampleMetadata::default()
            },
        })
    }
}
