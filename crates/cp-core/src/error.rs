use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Unknown dataset source name.
    #[error("Source inconnue : {name}")]
    UnknownSource {
        /// The name that did not match any adapter.
        name: String,
    },

    /// A sample was extracted with a configuration other than the corpus one.
    #[error("Configuration incohérente pour {id} : {detail}")]
    InconsistentConfig {
        /// Sample id.
        id: String,
        /// What disagreed.
        detail: String,
    },

    /// A training matrix whose dimensions disagree with its contents.
    #[error("Dimensions invalides : {rows}×{cols} pour {len} valeurs")]
    InvalidDimensions {
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
        /// Actual number of values.
        len: usize,
    },
}
