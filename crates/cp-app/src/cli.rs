use std::path::PathBuf;

use clap::Parser;
use cp_core::config::{PipelineConfig, SourceKind};

/// chordprep : prépare les corpus d'accords de guitare pour l'entraînement.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Sources à traiter : guitarset, idmt-guitar. Défaut : celles de la config.
    #[arg(long, num_args = 1..)]
    pub datasets: Vec<SourceKind>,

    /// Répertoire racine des datasets.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Répertoire de sortie du corpus et du jeu d'entraînement.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Graine du tirage des labels de repli.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Extraire les fichiers en parallèle (rayon).
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Afficher les métadonnées d'un corpus existant et quitter.
    #[arg(long, value_name = "FILE")]
    pub inspect: Option<PathBuf>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Apply command-line overrides on top of the file configuration.
    pub fn apply_overrides(&self, config: &mut PipelineConfig) {
        if !self.datasets.is_empty() {
            config.sources.clone_from(&self.datasets);
        }
        if let Some(ref root) = self.root {
            config.dataset_root.clone_from(root);
        }
        if let Some(ref out) = self.output_dir {
            config.output_dir.clone_from(out);
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.parallel {
            config.parallel = true;
        }
        config.clamp_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datasets_accept_both_spellings() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["chordprep", "--datasets", "idmt", "guitarset"])?;
        let mut config = PipelineConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.sources, vec![SourceKind::GuitarSet, SourceKind::Idmt]);
        Ok(())
    }

    #[test]
    fn unknown_dataset_is_rejected() {
        assert!(Cli::try_parse_from(["chordprep", "--datasets", "nsynth"]).is_err());
    }

    #[test]
    fn flags_override_file_values() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from([
            "chordprep",
            "--datasets",
            "guitarset",
            "--root",
            "/data",
            "--output-dir",
            "/out",
            "--seed",
            "42",
            "--parallel",
        ])?;
        let mut config = PipelineConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.sources, vec![SourceKind::GuitarSet]);
        assert_eq!(config.dataset_root, PathBuf::from("/data"));
        assert_eq!(config.corpus_path(), PathBuf::from("/out/chord_corpus.json"));
        assert_eq!(config.seed, Some(42));
        assert!(config.parallel);
        Ok(())
    }

    #[test]
    fn no_flags_keep_file_values() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["chordprep"])?;
        let mut config = PipelineConfig {
            seed: Some(7),
            parallel: true,
            ..PipelineConfig::default()
        };
        cli.apply_overrides(&mut config);
        assert_eq!(config.seed, Some(7));
        assert!(config.parallel);
        assert_eq!(config.sources, SourceKind::ALL.to_vec());
        Ok(())
    }
}
