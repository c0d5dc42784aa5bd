use cp_core::config::FeatureConfig;
use cp_core::feature::{BundleShape, FeatureBundle};
use cp_core::sample::Waveform;

use crate::chroma::ChromaFilterbank;
use crate::error::AudioError;
use crate::features::{rms_frames, spectral_centroid, zero_crossing_frames};
use crate::fft::FftPipeline;
use crate::mel::{Dct, MelFilterbank, peak, power_to_db};

/// Extracteur de features pour le traitement offline en lot.
///
/// Holds the FFT plan and the filterbanks for one [`FeatureConfig`]. Calls
/// are independent: nothing computed for one waveform influences the next.
/// One instance per worker thread.
pub struct FeatureExtractor {
    config: FeatureConfig,
    fft: FftPipeline,
    chroma: ChromaFilterbank,
    mel: MelFilterbank,
    dct: Dct,
}

impl FeatureExtractor {
    /// Crée un extracteur pour `config`.
    ///
    /// # Panics
    /// Panics if `config.n_fft` is 0.
    ///
    /// # Example
    /// ```
    /// use cp_audio::extractor::FeatureExtractor;
    /// use cp_core::config::FeatureConfig;
    /// let extractor = FeatureExtractor::new(FeatureConfig::STANDARD);
    /// ```
    #[must_use]
    pub fn new(config: FeatureConfig) -> Self {
        Self {
            config,
            fft: FftPipeline::new(config.n_fft),
            chroma: ChromaFilterbank::new(config.sample_rate, config.n_fft, config.n_chroma),
            mel: MelFilterbank::new(config.sample_rate, config.n_fft, config.n_mels),
            dct: Dct::new(config.n_mels, config.n_mfcc),
        }
    }

    /// The configuration this extractor applies.
    #[must_use]
    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Analyse une forme d'onde complète.
    ///
    /// Never fails: on any internal error the empty bundle is returned and a
    /// warning is logged. Callers treat an empty bundle as "no usable features".
    ///
    /// # Example
    /// ```
    /// use cp_audio::extractor::FeatureExtractor;
    /// use cp_core::config::FeatureConfig;
    /// use cp_core::sample::Waveform;
    ///
    /// let mut extractor = FeatureExtractor::new(FeatureConfig::STANDARD);
    /// let bundle = extractor.extract(&Waveform::new(vec![0.0; 22050], 22050));
    /// assert_eq!(bundle.shape.time_steps, 44);
    /// assert!(extractor.extract(&Waveform::new(vec![], 22050)).is_empty());
    /// ```
    #[must_use]
    pub fn extract(&mut self, wave: &Waveform) -> FeatureBundle {
        match self.try_extract(wave) {
            Ok(bundle) => bundle,
            Err(e) => {
                log::warn!("Extraction abandonnée : {e}");
                FeatureBundle::empty()
            }
        }
    }

    /// Fallible core of [`Self::extract`].
    ///
    /// # Errors
    /// Returns [`AudioError::InvalidWaveform`] for empty, non-finite or
    /// wrongly-sampled input, and propagates FFT failures.
    pub fn try_extract(&mut self, wave: &Waveform) -> Result<FeatureBundle, AudioError> {
        let c = self.config;
        if wave.samples.is_empty() {
            return Err(AudioError::InvalidWaveform("aucun échantillon".into()));
        }
        if wave.sample_rate != c.sample_rate {
            return Err(AudioError::InvalidWaveform(format!(
                "taux {} Hz, attendu {} Hz",
                wave.sample_rate, c.sample_rate
            )));
        }
        if wave.samples.iter().any(|s| !s.is_finite()) {
            return Err(AudioError::InvalidWaveform("valeurs non finies".into()));
        }

        let power = self.fft.spectrogram(&wave.samples, c.hop_length)?;
        let n_frames = power.len();

        let chroma: Vec<Vec<f32>> = power.iter().map(|p| self.chroma.apply(p)).collect();
        let mel_power: Vec<Vec<f32>> = power.iter().map(|p| self.mel.apply(p)).collect();

        // MFCC use an absolute reference; the stored mel is relative to its own peak
        let mut mel_db_abs = mel_power.clone();
        power_to_db(&mut mel_db_abs, 1.0);
        let mfcc: Vec<Vec<f32>> = mel_db_abs.iter().map(|m| self.dct.apply(m)).collect();

        let mel_peak = peak(&mel_power);
        let mut mel_spectrogram = mel_power;
        power_to_db(&mut mel_spectrogram, mel_peak);

        let spectral_centroid: Vec<f32> = power
            .iter()
            .map(|p| spectral_centroid(p, c.sample_rate, c.n_fft))
            .collect();
        let rms = rms_frames(&wave.samples, c.n_fft, c.hop_length);
        let zcr = zero_crossing_frames(&wave.samples, c.n_fft, c.hop_length);

        let bundle = FeatureBundle {
            chroma,
            mel_spectrogram,
            mfcc,
            spectral_centroid,
            rms,
            zcr,
            shape: BundleShape {
                time_steps: n_frames,
                chroma_bins: c.n_chroma,
                mel_bins: c.n_mels,
                mfcc_coeffs: c.n_mfcc,
            },
        };

        if !bundle.is_consistent() {
            return Err(AudioError::InvalidWaveform(format!(
                "bundle incohérent ({n_frames} frames)"
            )));
        }

        log::debug!(
            "Extracted {n_frames} frames from {:.2}s of audio",
            wave.duration_secs()
        );
        Ok(bundle)
    }
}
