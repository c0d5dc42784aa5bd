use serde::{Deserialize, Serialize};

use crate::config::FeatureConfig;

/// Self-description of a bundle's dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BundleShape {
    /// Number of analysis frames (first axis of every per-frame array).
    pub time_steps: usize,
    /// Width of each chroma row.
    pub chroma_bins: usize,
    /// Width of each mel row.
    pub mel_bins: usize,
    /// Width of each cepstral row.
    pub mfcc_coeffs: usize,
}

/// Descripteurs spectraux/temporels d'une forme d'onde, alignés par frame.
///
/// Every array is indexed `[frame][bin]` (time first). A bundle is either
/// complete, with all arrays sharing `shape.time_steps` rows, or empty.
///
/// # Example
/// ```
/// use cp_core::feature::FeatureBundle;
/// let bundle = FeatureBundle::empty();
/// assert!(bundle.is_empty());
/// assert!(bundle.is_consistent());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct FeatureBundle {
    /// `[time][n_chroma]`, each frame scaled to a peak of 1.
    pub chroma: Vec<Vec<f32>>,
    /// `[time][n_mels]`, dB relative to the bundle's own peak.
    pub mel_spectrogram: Vec<Vec<f32>>,
    /// `[time][n_mfcc]`.
    pub mfcc: Vec<Vec<f32>>,
    /// Spectral centroid per frame, Hz.
    pub spectral_centroid: Vec<f32>,
    /// RMS energy per frame.
    pub rms: Vec<f32>,
    /// Zero-crossing rate per frame, in [0, 1].
    pub zcr: Vec<f32>,
    /// Dimensions.
    pub shape: BundleShape,
}

impl FeatureBundle {
    /// The "no usable features" bundle returned on extraction failure.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no frame was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chroma.is_empty()
    }

    /// Nombre de frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.chroma.len()
    }

    /// All arrays are empty, or all share one frame count matching `shape`
    /// with rows of the declared widths.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let n = self.chroma.len();
        let lengths = [
            self.mel_spectrogram.len(),
            self.mfcc.len(),
            self.spectral_centroid.len(),
            self.rms.len(),
            self.zcr.len(),
        ];
        if lengths.iter().any(|&l| l != n) || self.shape.time_steps != n {
            return false;
        }
        self.chroma.iter().all(|r| r.len() == self.shape.chroma_bins)
            && self.mel_spectrogram.iter().all(|r| r.len() == self.shape.mel_bins)
            && self.mfcc.iter().all(|r| r.len() == self.shape.mfcc_coeffs)
    }

    /// Whether this bundle could have been produced with `config`.
    /// Empty bundles match every configuration.
    #[must_use]
    pub fn matches_config(&self, config: &FeatureConfig) -> bool {
        self.is_empty()
            || (self.shape.chroma_bins == config.n_chroma
                && self.shape.mel_bins == config.n_mels
                && self.shape.mfcc_coeffs == config.n_mfcc)
    }

    /// Arithmetic mean of the chroma rows over time.
    ///
    /// Returns `None` for an empty bundle. The result always has
    /// `shape.chroma_bins` entries, whatever the duration.
    ///
    /// # Example
    /// ```
    /// use cp_core::feature::{BundleShape, FeatureBundle};
    /// let bundle = FeatureBundle {
    ///     chroma: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
    ///     shape: BundleShape { time_steps: 2, chroma_bins: 2, ..BundleShape::default() },
    ///     ..FeatureBundle::default()
    /// };
    /// assert_eq!(bundle.mean_chroma(), Some(vec![0.5, 0.5]));
    /// ```
    #[must_use]
    pub fn mean_chroma(&self) -> Option<Vec<f32>> {
        if self.chroma.is_empty() {
            return None;
        }
        let mut mean = vec![0.0f64; self.shape.chroma_bins];
        for row in &self.chroma {
            for (acc, &v) in mean.iter_mut().zip(row) {
                *acc += f64::from(v);
            }
        }
        let n = self.chroma.len() as f64;
        Some(mean.into_iter().map(|s| (s / n) as f32).collect())
    }
}
