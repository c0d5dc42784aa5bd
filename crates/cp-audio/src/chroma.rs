//! Short-time Fourier chroma.
//!
//! Each FFT bin spreads its energy over neighbouring pitch classes with a
//! Gaussian whose width follows the bin spacing, weighted by a broad
//! octave-domain Gaussian centred on octave 5. Bin 0 is C.

/// Centre of the octave weighting (C5 region).
const CENTER_OCTAVE: f64 = 5.0;
/// Width of the octave weighting, in octaves.
const OCTAVE_WIDTH: f64 = 2.0;
/// A4 / 16, the reference for octave numbering (tuning fixed at 0 cents).
const A0_REF_HZ: f64 = 440.0 / 16.0;

/// Pitch-class filterbank over the bins of one FFT frame.
///
/// # Example
/// ```
/// use cp_audio::chroma::ChromaFilterbank;
/// let bank = ChromaFilterbank::new(22050, 2048, 12);
/// let chroma = bank.apply(&vec![0.0; 1025]);
/// assert_eq!(chroma, vec![0.0; 12]);
/// ```
pub struct ChromaFilterbank {
    /// `[n_chroma][n_bins]`.
    weights: Vec<Vec<f32>>,
}

impl ChromaFilterbank {
    /// Build the filterbank.
    #[must_use]
    pub fn new(sample_rate: u32, n_fft: usize, n_chroma: usize) -> Self {
        let n_bins = n_fft / 2 + 1;
        let nc = n_chroma as f64;
        let sr = f64::from(sample_rate);

        // fractional chroma position of every bin, bin 0 pushed 1.5 octaves below bin 1
        let mut frq = vec![0.0f64; n_bins + 1];
        for (k, slot) in frq.iter_mut().enumerate().skip(1) {
            let hz = k as f64 * sr / n_fft as f64;
            *slot = nc * (hz / A0_REF_HZ).log2();
        }
        frq[0] = frq[1] - 1.5 * nc;

        let widths: Vec<f64> = (0..n_bins).map(|k| (frq[k + 1] - frq[k]).max(1.0)).collect();

        let half = (nc / 2.0).round();
        let mut weights = vec![vec![0.0f64; n_bins]; n_chroma];
        for k in 0..n_bins {
            for (c, row) in weights.iter_mut().enumerate() {
                let d = (frq[k] - c as f64 + half + 10.0 * nc).rem_euclid(nc) - half;
                row[k] = (-0.5 * (2.0 * d / widths[k]).powi(2)).exp();
            }
            let norm = weights.iter().map(|row| row[k] * row[k]).sum::<f64>().sqrt();
            let octave = (-0.5 * ((frq[k] / nc - CENTER_OCTAVE) / OCTAVE_WIDTH).powi(2)).exp();
            for row in &mut weights {
                if norm > f64::MIN_POSITIVE {
                    row[k] /= norm;
                }
                row[k] *= octave;
            }
        }

        // the reference above is A; rotate so that row 0 is C
        weights.rotate_left(3 * (n_chroma / 12));

        Self {
            weights: weights
                .into_iter()
                .map(|row| row.into_iter().map(|w| w as f32).collect())
                .collect(),
        }
    }

    /// Chroma vector of one power spectrum, scaled so its largest bin is 1.
    /// Frames without energy stay at zero.
    #[must_use]
    pub fn apply(&self, power: &[f32]) -> Vec<f32> {
        let mut chroma: Vec<f32> = self
            .weights
            .iter()
            .map(|row| row.iter().zip(power).map(|(w, p)| w * p).sum())
            .collect();
        let max = chroma.iter().fold(0.0f32, |m, v| m.max(v.abs()));
        if max > f32::MIN_POSITIVE {
            for v in &mut chroma {
                *v /= max;
            }
        }
        chroma
    }

    /// Number of pitch classes.
    #[must_use]
    pub fn n_chroma(&self) -> usize {
        self.weights.len()
    }
}
