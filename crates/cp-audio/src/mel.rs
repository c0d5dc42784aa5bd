//! Mel filterbank, decibel conversion and cepstral coefficients.
//!
//! Slaney mel scale (linear below 1 kHz, logarithmic above) with Slaney area
//! normalisation, the usual convention for chord/timbre front-ends.

const F_SP: f64 = 200.0 / 3.0;
const MIN_LOG_HZ: f64 = 1000.0;
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

/// Floor applied before taking logarithms.
pub const AMIN: f32 = 1e-10;
/// Dynamic range kept by [`power_to_db`].
pub const TOP_DB: f32 = 80.0;

fn logstep() -> f64 {
    6.4f64.ln() / 27.0
}

/// Hz → mel (Slaney).
#[must_use]
pub fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / logstep()
    } else {
        hz / F_SP
    }
}

/// Mel → Hz (Slaney).
#[must_use]
pub fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (logstep() * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

/// Triangular mel filterbank over the bins of one FFT frame.
///
/// # Example
/// ```
/// use cp_audio::mel::MelFilterbank;
/// let bank = MelFilterbank::new(22050, 2048, 128);
/// let mel = bank.apply(&vec![1.0; 1025]);
/// assert_eq!(mel.len(), 128);
/// ```
pub struct MelFilterbank {
    /// `[n_mels][n_bins]`.
    weights: Vec<Vec<f32>>,
}

impl MelFilterbank {
    /// Build `n_mels` filters spanning 0 Hz to Nyquist.
    #[must_use]
    pub fn new(sample_rate: u32, n_fft: usize, n_mels: usize) -> Self {
        let n_bins = n_fft / 2 + 1;
        let sr = f64::from(sample_rate);
        let fft_freqs: Vec<f64> = (0..n_bins).map(|k| k as f64 * sr / n_fft as f64).collect();

        let mel_max = hz_to_mel(sr / 2.0);
        let mel_points: Vec<f64> = (0..n_mels + 2)
            .map(|i| mel_to_hz(mel_max * i as f64 / (n_mels + 1) as f64))
            .collect();

        let weights = (0..n_mels)
            .map(|m| {
                let (lo, mid, hi) = (mel_points[m], mel_points[m + 1], mel_points[m + 2]);
                let enorm = 2.0 / (hi - lo);
                fft_freqs
                    .iter()
                    .map(|&f| {
                        let lower = (f - lo) / (mid - lo);
                        let upper = (hi - f) / (hi - mid);
                        (lower.min(upper).max(0.0) * enorm) as f32
                    })
                    .collect()
            })
            .collect();

        Self { weights }
    }

    /// Project one power spectrum onto the mel bands.
    #[must_use]
    pub fn apply(&self, power: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .map(|row| row.iter().zip(power).map(|(w, p)| w * p).sum())
            .collect()
    }

    /// Number of bands.
    #[must_use]
    pub fn n_mels(&self) -> usize {
        self.weights.len()
    }
}

/// Convert a power spectrogram to dB relative to `reference`, in place,
/// keeping at most [`TOP_DB`] of dynamic range below the loudest cell.
///
/// # Example
/// ```
/// use cp_audio::mel::power_to_db;
/// let mut s = vec![vec![1.0, 0.1], vec![0.0, 1.0]];
/// power_to_db(&mut s, 1.0);
/// assert!((s[0][1] + 10.0).abs() < 1e-4);
/// assert!((s[1][0] + 80.0).abs() < 1e-4);
/// ```
pub fn power_to_db(spec: &mut [Vec<f32>], reference: f32) {
    let ref_db = 10.0 * reference.abs().max(AMIN).log10();
    let mut max_db = f32::NEG_INFINITY;
    for v in spec.iter_mut().flat_map(|row| row.iter_mut()) {
        *v = 10.0 * v.max(AMIN).log10() - ref_db;
        max_db = max_db.max(*v);
    }
    let floor = max_db - TOP_DB;
    for v in spec.iter_mut().flat_map(|row| row.iter_mut()) {
        *v = v.max(floor);
    }
}

/// Largest value of a spectrogram (0 when empty).
#[must_use]
pub fn peak(spec: &[Vec<f32>]) -> f32 {
    spec.iter()
        .flat_map(|row| row.iter().copied())
        .fold(0.0f32, f32::max)
}

/// Orthonormal DCT-II, truncated to the first `n_coeffs` outputs.
pub struct Dct {
    /// `[n_coeffs][n_inputs]`.
    basis: Vec<Vec<f32>>,
}

impl Dct {
    /// Precompute the basis.
    #[must_use]
    pub fn new(n_inputs: usize, n_coeffs: usize) -> Self {
        let n = n_inputs as f64;
        let basis = (0..n_coeffs)
            .map(|k| {
                let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
                (0..n_inputs)
                    .map(|i| {
                        let angle = std::f64::consts::PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n);
                        (scale * angle.cos()) as f32
                    })
                    .collect()
            })
            .collect();
        Self { basis }
    }

    /// Transform one frame.
    #[must_use]
    pub fn apply(&self, input: &[f32]) -> Vec<f32> {
        self.basis
            .iter()
            .map(|row| row.iter().zip(input).map(|(b, x)| b * x).sum())
            .collect()
    }
}
