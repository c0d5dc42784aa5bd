use crate::fft::{PadMode, frames, pad_centered};

/// Amplitudes at or below this count as zero (positive) for crossings.
const ZCR_THRESHOLD: f32 = 1e-10;

/// Spectral centroid (Hz) of one power spectrum.
///
/// Computed on magnitudes; frames without energy give 0.
///
/// # Example
/// ```
/// use cp_audio::features::spectral_centroid;
/// let mut power = vec![0.0f32; 1025];
/// power[100] = 4.0;
/// let hz = spectral_centroid(&power, 22050, 2048);
/// assert!((hz - 100.0 * 22050.0 / 2048.0).abs() < 1e-2);
/// ```
#[must_use]
pub fn spectral_centroid(power: &[f32], sample_rate: u32, n_fft: usize) -> f32 {
    let bin_hz = f64::from(sample_rate) / n_fft as f64;
    let mut total = 0.0f64;
    let mut weighted = 0.0f64;
    for (k, &p) in power.iter().enumerate() {
        let mag = f64::from(p.max(0.0)).sqrt();
        total += mag;
        weighted += k as f64 * bin_hz * mag;
    }
    if total > 1e-10 {
        (weighted / total) as f32
    } else {
        0.0
    }
}

/// RMS energy per centered, zero-padded frame of `frame_len` samples.
///
/// # Example
/// ```
/// use cp_audio::features::rms_frames;
/// let rms = rms_frames(&vec![0.5; 4096], 2048, 512);
/// assert_eq!(rms.len(), 9);
/// assert!((rms[4] - 0.5).abs() < 1e-6);
/// ```
#[must_use]
pub fn rms_frames(samples: &[f32], frame_len: usize, hop: usize) -> Vec<f32> {
    if samples.is_empty() || hop == 0 || frame_len == 0 {
        return Vec::new();
    }
    let n_frames = 1 + samples.len() / hop;
    let padded = pad_centered(samples, frame_len, PadMode::Constant);
    frames(&padded, frame_len, hop, n_frames)
        .map(|frame| {
            let sum_sq: f64 = frame.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
            (sum_sq / frame_len as f64).sqrt() as f32
        })
        .collect()
}

/// Zero-crossing rate per centered, edge-padded frame, in [0, 1].
///
/// # Example
/// ```
/// use cp_audio::features::zero_crossing_frames;
/// let alternating: Vec<f32> = (0..4096).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
/// let zcr = zero_crossing_frames(&alternating, 2048, 512);
/// assert!(zcr[4] > 0.99);
/// ```
#[must_use]
pub fn zero_crossing_frames(samples: &[f32], frame_len: usize, hop: usize) -> Vec<f32> {
    if samples.is_empty() || hop == 0 || frame_len == 0 {
        return Vec::new();
    }
    let n_frames = 1 + samples.len() / hop;
    let padded = pad_centered(samples, frame_len, PadMode::Edge);
    frames(&padded, frame_len, hop, n_frames)
        .map(|frame| {
            let crossings = frame
                .windows(2)
                .filter(|w| is_negative(w[0]) != is_negative(w[1]))
                .count();
            crossings as f32 / frame_len as f32
        })
        .collect()
}

#[inline]
fn is_negative(s: f32) -> bool {
    s < -ZCR_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_has_zero_centroid_and_rms() {
        assert!(spectral_centroid(&[0.0; 1025], 22050, 2048).abs() < f32::EPSILON);
        let rms = rms_frames(&[0.0; 1000], 2048, 512);
        assert_eq!(rms.len(), 2);
        assert!(rms.iter().all(|r| r.abs() < f32::EPSILON));
    }

    #[test]
    fn tiny_values_do_not_cross() {
        let noise: Vec<f32> = (0..3000).map(|i| if i % 2 == 0 { 1e-12 } else { -1e-12 }).collect();
        let zcr = zero_crossing_frames(&noise, 2048, 512);
        assert!(zcr.iter().all(|z| z.abs() < f32::EPSILON));
    }

    #[test]
    fn scalar_features_share_frame_count() {
        for len in [1usize, 511, 512, 22050] {
            let signal = vec![0.25; len];
            assert_eq!(rms_frames(&signal, 2048, 512).len(), 1 + len / 512);
            assert_eq!(zero_crossing_frames(&signal, 2048, 512).len(), 1 + len / 512);
        }
    }
}
