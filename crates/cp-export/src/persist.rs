//! Atomic persistence of the two artifacts.
//!
//! Each document is written to a temporary file in the destination directory,
//! flushed and synced, then renamed over the target. A failed write leaves the
//! previous file (or nothing) in place, never a truncated document.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use cp_core::corpus::Corpus;
use cp_core::training::TrainingSet;
use tempfile::NamedTempFile;

fn write_atomic<F>(dest: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)
        .with_context(|| format!("Impossible de créer {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Fichier temporaire impossible dans {}", dir.display()))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(dest)
        .with_context(|| format!("Impossible de remplacer {}", dest.display()))?;
    Ok(())
}

/// Écrit le corpus en JSON indenté.
///
/// # Errors
/// Returns an error if the directory cannot be created or the file written.
pub fn write_corpus(corpus: &Corpus, dest: &Path) -> Result<()> {
    write_atomic(dest, |w| {
        serde_json::to_writer_pretty(w, corpus).context("Sérialisation JSON du corpus")
    })?;
    log::info!(
        "Corpus écrit : {} ({} échantillons)",
        dest.display(),
        corpus.metadata.total_samples
    );
    Ok(())
}

/// Relit un corpus persisté et vérifie sa cohérence.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or if its metadata
/// disagrees with its sample list.
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    let file = File::open(path).with_context(|| format!("Impossible d'ouvrir {}", path.display()))?;
    let corpus: Corpus = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("JSON invalide : {}", path.display()))?;
    corpus.validate()?;
    Ok(corpus)
}

/// Écrit le jeu d'entraînement en bincode.
///
/// # Errors
/// Returns an error if the directory cannot be created or the file written.
pub fn write_training_set(set: &TrainingSet, dest: &Path) -> Result<()> {
    write_atomic(dest, |w| {
        bincode::serialize_into(w, set).context("Sérialisation bincode du jeu d'entraînement")
    })?;
    log::info!(
        "Jeu d'entraînement écrit : {} ({}×{})",
        dest.display(),
        set.rows,
        set.cols
    );
    Ok(())
}

/// Relit un jeu d'entraînement persisté.
///
/// # Errors
/// Returns an error if the file cannot be read or decoded, or if its
/// dimensions are inconsistent.
pub fn load_training_set(path: &Path) -> Result<TrainingSet> {
    let file = File::open(path).with_context(|| format!("Impossible d'ouvrir {}", path.display()))?;
    let set: TrainingSet = bincode::deserialize_from(BufReader::new(file))
        .with_context(|| format!("Binaire invalide : {}", path.display()))?;
    anyhow::ensure!(set.is_consistent(), "Dimensions incohérentes dans {}", path.display());
    Ok(set)
}
