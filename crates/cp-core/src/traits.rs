use std::path::Path;

use crate::config::SourceKind;
use crate::sample::SampleJob;

/// Adapte une disposition de dataset brute au modèle commun.
///
/// Implémenté par : `GuitarSetAdapter`, `IdmtAdapter`.
///
/// The adapter only classifies; loading and extraction are done by the
/// shared runner so every source gets the same resampling, extraction and
/// failure accounting.
///
/// # Example
/// ```
/// use cp_core::traits::SourceAdapter;
/// use cp_core::config::SourceKind;
/// use cp_core::sample::SampleJob;
/// use std::path::{Path, PathBuf};
///
/// struct DummyAdapter(PathBuf);
/// impl SourceAdapter for DummyAdapter {
///     fn kind(&self) -> SourceKind { SourceKind::GuitarSet }
///     fn root(&self) -> &Path { &self.0 }
///     fn progress_every(&self) -> usize { 10 }
///     fn classify(&mut self, _path: &Path) -> Option<SampleJob> { None }
/// }
/// ```
pub trait SourceAdapter: Send {
    /// Which source this is.
    fn kind(&self) -> SourceKind;

    /// Répertoire lu par l'adaptateur. Son absence n'est pas fatale.
    fn root(&self) -> &Path;

    /// Log a progress line every this many completed samples.
    fn progress_every(&self) -> usize;

    /// Derive label and identity for one discovered file.
    ///
    /// Retourne `None` si le fichier ne respecte pas la convention de nommage
    /// (ignoré silencieusement, compté dans le rapport).
    fn classify(&mut self, path: &Path) -> Option<SampleJob>;

    /// Human-readable dataset name.
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}
