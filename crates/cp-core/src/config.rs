use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Paramètres d'extraction, identiques pour tout le corpus.
///
/// There is exactly one value of this type in a run, [`FeatureConfig::STANDARD`].
/// It is threaded explicitly into the extractor, the adapters, the aggregator
/// and the training builder, and recorded verbatim in the corpus metadata.
///
/// # Example
/// ```
/// use cp_core::config::FeatureConfig;
/// let config = FeatureConfig::STANDARD;
/// assert_eq!(config.n_chroma, 12);
/// assert_eq!(config.frame_count(22050), 44);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeatureConfig {
    /// Taux d'échantillonnage cible (Hz). Tout l'audio est rééchantillonné ici.
    pub sample_rate: u32,
    /// Hop between successive analysis frames, in samples.
    pub hop_length: usize,
    /// FFT window size, in samples.
    pub n_fft: usize,
    /// Nombre de bandes mel.
    pub n_mels: usize,
    /// Number of pitch-class bins.
    pub n_chroma: usize,
    /// Number of cepstral coefficients kept.
    pub n_mfcc: usize,
}

impl FeatureConfig {
    /// The one configuration every corpus is built with.
    pub const STANDARD: Self = Self {
        sample_rate: 22050,
        hop_length: 512,
        n_fft: 2048,
        n_mels: 128,
        n_chroma: 12,
        n_mfcc: 13,
    };

    /// Number of centered analysis frames for `len` samples (0 for empty input).
    #[must_use]
    pub fn frame_count(&self, len: usize) -> usize {
        if len == 0 || self.hop_length == 0 {
            0
        } else {
            1 + len / self.hop_length
        }
    }

    /// Number of non-negative frequency bins of one FFT frame.
    #[must_use]
    pub fn n_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// The dataset sources the pipeline knows how to read.
///
/// # Example
/// ```
/// use cp_core::config::SourceKind;
/// let kind: SourceKind = "idmt-guitar".parse().unwrap();
/// assert_eq!(kind, SourceKind::Idmt);
/// assert_eq!(kind.to_string(), "idmt-guitar");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum SourceKind {
    /// Structured source: `<performer>_<chord>_<style>.wav`.
    #[serde(rename = "guitarset")]
    GuitarSet,
    /// Unstructured source: chord inferred from the filename.
    #[serde(rename = "idmt-guitar")]
    Idmt,
}

impl SourceKind {
    /// All sources, in invocation order.
    pub const ALL: [Self; 2] = [Self::GuitarSet, Self::Idmt];

    /// Identifiant CLI / TOML.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GuitarSet => "guitarset",
            Self::Idmt => "idmt-guitar",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "guitarset" => Ok(Self::GuitarSet),
            "idmt-guitar" | "idmt" => Ok(Self::Idmt),
            other => Err(CoreError::UnknownSource {
                name: other.to_string(),
            }),
        }
    }
}

/// Configuration du lancement : où lire, où écrire, quelles sources.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine. The
/// feature-extraction parameters are deliberately absent: they are
/// [`FeatureConfig::STANDARD`] and cannot be overridden.
///
/// # Example
/// ```
/// use cp_core::config::PipelineConfig;
/// let config = PipelineConfig::default();
/// assert_eq!(config.progress_every_guitarset, 50);
/// assert!(config.seed.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Répertoire racine contenant `guitarset/` et `idmt-guitar/`.
    pub dataset_root: PathBuf,
    /// Destination directory for the corpus and the training artifact.
    pub output_dir: PathBuf,
    /// Corpus document filename, inside `output_dir`.
    pub corpus_file: String,
    /// Training artifact filename, inside `output_dir`.
    pub training_file: String,
    /// Sources to run, in this order.
    pub sources: Vec<SourceKind>,
    /// Seed for the fallback chord draw. None = OS entropy.
    pub seed: Option<u64>,
    /// Extract files on the rayon pool instead of sequentially.
    pub parallel: bool,
    /// Progress log period for the structured source.
    pub progress_every_guitarset: usize,
    /// Progress log period for the unstructured source.
    pub progress_every_idmt: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_root: PathBuf::from("datasets"),
            output_dir: PathBuf::from("datasets/processed"),
            corpus_file: "chord_corpus.json".to_string(),
            training_file: "training_data.bin".to_string(),
            sources: SourceKind::ALL.to_vec(),
            seed: None,
            parallel: false,
            progress_every_guitarset: 50,
            progress_every_idmt: 100,
        }
    }
}

impl PipelineConfig {
    /// Clamp numeric fields and normalise the source list.
    /// Called after TOML deserialization.
    pub fn clamp_all(&mut self) {
        self.progress_every_guitarset = self.progress_every_guitarset.max(1);
        self.progress_every_idmt = self.progress_every_idmt.max(1);
        // invocation order is fixed regardless of how the list was written
        self.sources.sort();
        self.sources.dedup();
    }

    /// Full path of the corpus document.
    #[must_use]
    pub fn corpus_path(&self) -> PathBuf {
        self.output_dir.join(&self.corpus_file)
    }

    /// Full path of the training artifact.
    #[must_use]
    pub fn training_path(&self) -> PathBuf {
        self.output_dir.join(&self.training_file)
    }

    /// Progress period for the given source.
    #[must_use]
    pub fn progress_every(&self, kind: SourceKind) -> usize {
        match kind {
            SourceKind::GuitarSet => self.progress_every_guitarset,
            SourceKind::Idmt => self.progress_every_idmt,
        }
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    pipeline: Option<PipelineSection>,
    sources: Option<SourcesSection>,
}

/// Pipeline section, all fields optional for partial override.
#[derive(Deserialize)]
struct PipelineSection {
    dataset_root: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    corpus_file: Option<String>,
    training_file: Option<String>,
    seed: Option<u64>,
    parallel: Option<bool>,
}

/// Sources section, all fields optional.
#[derive(Deserialize)]
struct SourcesSection {
    enabled: Option<Vec<SourceKind>>,
    progress_every_guitarset: Option<usize>,
    progress_every_idmt: Option<usize>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or names no source.
///
/// # Example
/// ```no_run
/// use cp_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))?;
    log::info!("Configuration chargée depuis {}", path.display());
    Ok(config)
}

/// Parse TOML text into a [`PipelineConfig`], merged over the defaults.
///
/// # Errors
/// Returns an error on malformed TOML or an empty source list.
pub fn parse_config(content: &str) -> Result<PipelineConfig> {
    let file: ConfigFile = toml::from_str(content)?;
    let mut config = PipelineConfig::default();

    if let Some(p) = file.pipeline {
        if let Some(v) = p.dataset_root {
            config.dataset_root = v;
        }
        if let Some(v) = p.output_dir {
            config.output_dir = v;
        }
        if let Some(v) = p.corpus_file {
            config.corpus_file = v;
        }
        if let Some(v) = p.training_file {
            config.training_file = v;
        }
        if p.seed.is_some() {
            config.seed = p.seed;
        }
        if let Some(v) = p.parallel {
            config.parallel = v;
        }
    }

    if let Some(s) = file.sources {
        if let Some(v) = s.enabled {
            if v.is_empty() {
                return Err(CoreError::Config("sources.enabled est vide".into()).into());
            }
            config.sources = v;
        }
        if let Some(v) = s.progress_every_guitarset {
            config.progress_every_guitarset = v;
        }
        if let Some(v) = s.progress_every_idmt {
            config.progress_every_idmt = v;
        }
    }

    config.clamp_all();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_count_follows_centered_framing() {
        let c = FeatureConfig::STANDARD;
        assert_eq!(c.frame_count(0), 0);
        assert_eq!(c.frame_count(1), 1);
        assert_eq!(c.frame_count(511), 1);
        assert_eq!(c.frame_count(512), 2);
        assert_eq!(c.n_bins(), 1025);
    }

    #[test]
    fn partial_toml_overrides_defaults() -> Result<()> {
        let config = parse_config(
            r#"
            [pipeline]
            dataset_root = "/data/raw"
            seed = 7

            [sources]
            enabled = ["idmt-guitar", "guitarset"]
            progress_every_idmt = 0
            "#,
        )?;
        assert_eq!(config.dataset_root, PathBuf::from("/data/raw"));
        assert_eq!(config.output_dir, PathBuf::from("datasets/processed"));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.sources, vec![SourceKind::GuitarSet, SourceKind::Idmt]);
        assert_eq!(config.progress_every_idmt, 1);
        assert_eq!(config.progress_every_guitarset, 50);
        Ok(())
    }

    #[test]
    fn empty_source_list_is_rejected() {
        assert!(parse_config("[sources]\nenabled = []\n").is_err());
    }

    #[test]
    fn unknown_source_name_is_an_error() {
        assert!("midi".parse::<SourceKind>().is_err());
        assert!(parse_config("[sources]\nenabled = [\"midi\"]\n").is_err());
    }

    #[test]
    fn load_config_reads_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("chordprep.toml");
        std::fs::write(&path, "[pipeline]\nparallel = true\n")?;
        let config = load_config(&path)?;
        assert!(config.parallel);
        assert_eq!(config.corpus_path(), PathBuf::from("datasets/processed/chord_corpus.json"));
        Ok(())
    }

    #[test]
    fn shipped_default_file_matches_defaults() -> Result<()> {
        let shipped = parse_config(include_str!("../../../config/default.toml"))?;
        assert_eq!(shipped, PipelineConfig::default());
        Ok(())
    }
}
