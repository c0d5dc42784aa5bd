use cp_core::error::CoreError;
use thiserror::Error;

/// Errors that abort an export step before anything is written.
#[derive(Error, Debug)]
pub enum ExportError {
    /// No adapter produced a sample: the run persists nothing.
    #[error("Corpus vide : aucune source n'a produit d'échantillon")]
    EmptyCorpus,

    /// The corpus holds no sample with usable features.
    #[error("Aucun échantillon exploitable sur {total} pour le jeu d'entraînement")]
    EmptyTrainingSet {
        /// Samples in the corpus.
        total: usize,
    },

    /// A sample disagrees with the corpus configuration.
    #[error(transparent)]
    Core(#[from] CoreError),
}
