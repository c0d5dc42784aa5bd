use std::fmt;
use std::path::PathBuf;

use cp_source::{AdapterReport, AdapterStatus};

/// Ce qui a été écrit sur disque.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Both artifacts were written.
    CorpusAndTraining {
        corpus: PathBuf,
        training: PathBuf,
        rows: usize,
    },
    /// The corpus was written; the training set was not.
    CorpusOnly { corpus: PathBuf, cause: String },
}

impl RunOutcome {
    /// Code de sortie du processus : 0 si tout est écrit, 2 si corpus seul.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::CorpusAndTraining { .. } => 0,
            Self::CorpusOnly { .. } => 2,
        }
    }
}

/// Final report of a successful run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub reports: Vec<AdapterReport>,
    pub total_samples: usize,
    pub unique_chords: usize,
    pub outcome: RunOutcome,
}

fn status_label(status: &AdapterStatus) -> String {
    match status {
        AdapterStatus::Completed => "terminé".into(),
        AdapterStatus::MissingRoot => "ignoré (dataset introuvable)".into(),
        AdapterStatus::Unreadable(cause) => format!("illisible ({cause})"),
        AdapterStatus::Interrupted => "interrompu".into(),
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Résumé du traitement")?;
        for r in &self.reports {
            writeln!(
                f,
                "  {:<12} {:<28} trouvés {:>5}  retenus {:>5}  échecs {:>4}  nommage {:>4}  sans features {:>4}  labels devinés {:>4}",
                r.source.as_str(),
                status_label(&r.status),
                r.discovered,
                r.produced,
                r.failures.len(),
                r.skipped_naming,
                r.empty_features,
                r.guessed_labels,
            )?;
            for failure in &r.failures {
                writeln!(f, "      échec {} : {}", failure.path.display(), failure.cause)?;
            }
        }
        writeln!(
            f,
            "  Corpus : {} échantillons, {} accords distincts",
            self.total_samples, self.unique_chords
        )?;
        match &self.outcome {
            RunOutcome::CorpusAndTraining {
                corpus,
                training,
                rows,
            } => {
                writeln!(f, "  Écrit : corpus {}", corpus.display())?;
                write!(f, "  Écrit : jeu d'entraînement {} ({rows} lignes)", training.display())
            }
            RunOutcome::CorpusOnly { corpus, cause } => {
                writeln!(f, "  Écrit : corpus {} (corpus seul)", corpus.display())?;
                write!(f, "  Jeu d'entraînement non écrit : {cause}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cp_core::config::SourceKind;

    fn report(source: SourceKind, status: AdapterStatus, produced: usize) -> AdapterReport {
        AdapterReport {
            source,
            status,
            discovered: produced,
            skipped_naming: 0,
            failures: Vec::new(),
            empty_features: 0,
            guessed_labels: 0,
            produced,
        }
    }

    #[test]
    fn exit_codes_distinguish_outcomes() {
        let both = RunOutcome::CorpusAndTraining {
            corpus: "c.json".into(),
            training: "t.bin".into(),
            rows: 3,
        };
        let alone = RunOutcome::CorpusOnly {
            corpus: "c.json".into(),
            cause: "vide".into(),
        };
        assert_eq!(both.exit_code(), 0);
        assert_eq!(alone.exit_code(), 2);
    }

    #[test]
    fn summary_marks_skipped_sources_and_corpus_only() {
        let summary = RunSummary {
            reports: vec![
                report(SourceKind::GuitarSet, AdapterStatus::Completed, 3),
                report(SourceKind::Idmt, AdapterStatus::MissingRoot, 0),
            ],
            total_samples: 3,
            unique_chords: 3,
            outcome: RunOutcome::CorpusOnly {
                corpus: "out/chord_corpus.json".into(),
                cause: "aucun échantillon exploitable".into(),
            },
        };
        let text = summary.to_string();
        assert!(text.contains("idmt-guitar"));
        assert!(text.contains("ignoré"));
        assert!(text.contains("corpus seul"));
        assert!(!text.contains("lignes"));
    }
}
