use realfft::RealFftPlanner;

use crate::error::AudioError;

/// How the signal is extended before centered framing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PadMode {
    /// Zeros on both sides.
    Constant,
    /// Repeat the first/last sample.
    Edge,
}

/// Extend `samples` by `frame_len / 2` on each side so frame `i` is centered
/// on sample `i * hop`.
///
/// # Example
/// ```
/// use cp_audio::fft::{pad_centered, PadMode};
/// assert_eq!(pad_centered(&[1.0, 2.0], 4, PadMode::Edge), vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
/// ```
#[must_use]
pub fn pad_centered(samples: &[f32], frame_len: usize, mode: PadMode) -> Vec<f32> {
    let pad = frame_len / 2;
    let (head, tail) = match mode {
        PadMode::Constant => (0.0, 0.0),
        PadMode::Edge => (
            samples.first().copied().unwrap_or(0.0),
            samples.last().copied().unwrap_or(0.0),
        ),
    };
    let mut out = Vec::with_capacity(samples.len() + 2 * pad);
    out.resize(pad, head);
    out.extend_from_slice(samples);
    out.resize(out.len() + pad, tail);
    out
}

/// Iterate the `n_frames` windows of a padded buffer.
pub fn frames(padded: &[f32], frame_len: usize, hop: usize, n_frames: usize) -> impl Iterator<Item = &[f32]> {
    (0..n_frames).map(move |i| {
        let start = (i * hop).min(padded.len());
        let end = (start + frame_len).min(padded.len());
        &padded[start..end]
    })
}

/// FFT pipeline: windowed real FFT using realfft.
///
/// Pre-allocates the FFT plan and scratch buffers; reused across frames and
/// files by one extractor.
///
/// # Example
/// ```
/// use cp_audio::fft::FftPipeline;
/// let fft = FftPipeline::new(2048);
/// assert_eq!(fft.n_bins(), 1025);
/// ```
pub struct FftPipeline {
    fft_size: usize,
    input_buf: Vec<f32>,
    spectrum_buf: Vec<realfft::num_complex::Complex<f32>>,
    scratch: Vec<realfft::num_complex::Complex<f32>>,
    plan: std::sync::Arc<dyn realfft::RealToComplex<f32>>,
    /// Periodic Hann window coefficients.
    window: Vec<f32>,
}

impl FftPipeline {
    /// Create a new FFT pipeline with the given window size.
    ///
    /// # Panics
    /// Panics if `size` is 0.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "FFT size must be > 0");

        let mut planner = RealFftPlanner::<f32>::new();
        let plan = planner.plan_fft_forward(size);

        let input_buf = plan.make_input_vec();
        let spectrum_buf = plan.make_output_vec();
        let scratch = plan.make_scratch_vec();

        // Periodic Hann (spectral analysis convention)
        let window: Vec<f32> = (0..size)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / size as f32).cos()))
            .collect();

        Self {
            fft_size: size,
            input_buf,
            spectrum_buf,
            scratch,
            plan,
            window,
        }
    }

    /// Power spectrum |X|² of one windowed frame (N/2+1 bins).
    ///
    /// Frames shorter than the FFT size are zero-padded.
    ///
    /// # Errors
    /// Returns [`AudioError::FftError`] if realfft rejects the buffers.
    ///
    /// # Example
    /// ```
    /// use cp_audio::fft::FftPipeline;
    /// let mut fft = FftPipeline::new(256);
    /// let spectrum = fft.power_spectrum(&[0.0f32; 256]).unwrap();
    /// assert_eq!(spectrum.len(), 129); // N/2 + 1
    /// ```
    pub fn power_spectrum(&mut self, frame: &[f32]) -> Result<Vec<f32>, AudioError> {
        let n = self.fft_size.min(frame.len());

        // Copy and window
        for (i, slot) in self.input_buf.iter_mut().enumerate() {
            *slot = if i < n { frame[i] * self.window[i] } else { 0.0 };
        }

        self.plan
            .process_with_scratch(&mut self.input_buf, &mut self.spectrum_buf, &mut self.scratch)
            .map_err(|e| AudioError::FftError(e.to_string()))?;

        Ok(self
            .spectrum_buf
            .iter()
            .map(|c| c.re * c.re + c.im * c.im)
            .collect())
    }

    /// Centered short-time power spectrogram, `[frame][bin]`.
    ///
    /// Frame count is `1 + len / hop`; empty input gives no frames.
    ///
    /// # Errors
    /// Propagates FFT failures.
    pub fn spectrogram(&mut self, samples: &[f32], hop: usize) -> Result<Vec<Vec<f32>>, AudioError> {
        if samples.is_empty() || hop == 0 {
            return Ok(Vec::new());
        }
        let n_frames = 1 + samples.len() / hop;
        let padded = pad_centered(samples, self.fft_size, PadMode::Constant);
        frames(&padded, self.fft_size, hop, n_frames)
            .map(|frame| self.power_spectrum(frame))
            .collect()
    }

    /// FFT window size.
    #[must_use]
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of output bins.
    #[must_use]
    pub fn n_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spectrogram_frame_count_is_centered() -> Result<(), AudioError> {
        let mut fft = FftPipeline::new(64);
        for len in [1usize, 15, 16, 17, 100] {
            let spec = fft.spectrogram(&vec![0.5; len], 16)?;
            assert_eq!(spec.len(), 1 + len / 16, "len {len}");
            assert!(spec.iter().all(|f| f.len() == 33));
        }
        assert!(fft.spectrogram(&[], 16)?.is_empty());
        Ok(())
    }

    #[test]
    fn sine_peaks_at_its_bin() -> Result<(), AudioError> {
        let n = 512;
        let mut fft = FftPipeline::new(n);
        // bin 32 exactly
        let frame: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * 32.0 * i as f32 / n as f32).sin())
            .collect();
        let spec = fft.power_spectrum(&frame)?;
        let peak = spec
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(peak, Some(32));
        Ok(())
    }

    #[test]
    fn edge_padding_repeats_boundaries() {
        let padded = pad_centered(&[3.0, 4.0, 5.0], 6, PadMode::Edge);
        assert_eq!(padded, vec![3.0, 3.0, 3.0, 3.0, 4.0, 5.0, 5.0, 5.0, 5.0]);
        let zeros = pad_centered(&[3.0], 4, PadMode::Constant);
        assert_eq!(zeros, vec![0.0, 0.0, 3.0, 0.0, 0.0]);
    }
}
