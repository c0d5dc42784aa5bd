use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use clap::Parser;
use cp_core::config::PipelineConfig;

pub mod cli;
pub mod inspect;
pub mod pipeline;
pub mod report;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            log::error!("{err:#}");
            eprintln!("Erreur : {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    // 3. Inspection seule : pas d'extraction
    if let Some(ref path) = cli.inspect {
        println!("{}", inspect::describe(path)?);
        return Ok(ExitCode::SUCCESS);
    }

    // 4. Charger la config, puis appliquer les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config);
    log::info!(
        "Sources : {:?}, racine {}, sortie {}",
        config.sources,
        config.dataset_root.display(),
        config.output_dir.display()
    );

    // 5. Ctrl-C : arrêt propre entre deux fichiers
    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_handler = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        log::warn!("Interruption demandée, arrêt après le fichier en cours...");
        cancel_handler.store(true, Ordering::Relaxed);
    })
    .context("Impossible d'installer le gestionnaire Ctrl-C")?;

    // 6. Pipeline
    let summary = pipeline::run(&config, &cancel)?;
    println!("{summary}");
    Ok(ExitCode::from(summary.outcome.exit_code()))
}

fn resolve_config(cli: &cli::Cli) -> Result<PipelineConfig> {
    if cli.config.exists() {
        cp_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(PipelineConfig::default())
    }
}
