use thiserror::Error;

/// Errors originating from the audio module.
#[derive(Error, Debug)]
pub enum AudioError {
    /// Unsupported audio format.
    #[error("Format audio non supporté : {0}")]
    UnsupportedFormat(String),

    /// Audio decode error.
    #[error("Erreur de décodage : {0}")]
    DecodeError(String),

    /// Sample-rate conversion error.
    #[error("Erreur de rééchantillonnage : {0}")]
    ResampleError(String),

    /// Waveform unusable for analysis (empty, wrong rate, non-finite).
    #[error("Forme d'onde invalide : {0}")]
    InvalidWaveform(String),

    /// FFT failure.
    #[error("Erreur FFT : {0}")]
    FftError(String),
}
