use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use cp_export::load_corpus;

/// Décrit un corpus persisté sans relancer l'extraction.
///
/// # Errors
/// Returns an error if the file cannot be loaded or is inconsistent.
pub fn describe(path: &Path) -> Result<String> {
    let corpus = load_corpus(path)?;
    let mut out = serde_json::to_string_pretty(&corpus.metadata)?;
    let usable = corpus.usable_samples().count();
    let guessed = corpus
        .samples
        .iter()
        .filter(|s| s.metadata.label_guessed)
        .count();
    write!(
        out,
        "\n{usable}/{} échantillons exploitables, {guessed} labels devinés",
        corpus.samples.len()
    )?;
    Ok(out)
}
