//! Sample-rate conversion to the corpus rate, using rubato.

use rubato::{FastFixedIn, PolynomialDegree, Resampler};

use crate::error::AudioError;

/// Smallest chunk handed to rubato; shorter clips are zero-padded.
const MIN_CHUNK: usize = 64;
const MAX_FLUSH: usize = 8;

/// Resample a mono buffer from `input_rate` to `output_rate`.
///
/// Returns a copy when the rates already match, and an empty buffer for
/// empty input. The interpolator delay is trimmed and its tail flushed, so
/// the output holds `round(len * output_rate / input_rate)` frames aligned
/// with the input.
///
/// # Errors
/// Returns [`AudioError::ResampleError`] for a zero rate or a rubato failure.
///
/// # Example
/// ```
/// use cp_audio::resample::resample_mono;
/// let out = resample_mono(&[0.0; 100], 22050, 22050).unwrap();
/// assert_eq!(out.len(), 100);
/// ```
pub fn resample_mono(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>, AudioError> {
    if input_rate == 0 || output_rate == 0 {
        return Err(AudioError::ResampleError(format!(
            "taux invalide : {input_rate} → {output_rate}"
        )));
    }
    if input_rate == output_rate || input.is_empty() {
        return Ok(input.to_vec());
    }

    log::debug!("Resampling {} frames from {input_rate}Hz to {output_rate}Hz", input.len());

    let ratio = f64::from(output_rate) / f64::from(input_rate);
    let expected = (input.len() as f64 * ratio).round() as usize;

    // One chunk covering the whole clip: files are short and processed once.
    let mut resampler = FastFixedIn::<f32>::new(
        ratio,
        1.0,
        PolynomialDegree::Septic,
        input.len().max(MIN_CHUNK),
        1,
    )
    .map_err(|e| AudioError::ResampleError(e.to_string()))?;
    let delay = resampler.output_delay();

    let planar_in: [&[f32]; 1] = [input];
    let mut out = resampler
        .process_partial(Some(&planar_in[..]), None)
        .map_err(|e| AudioError::ResampleError(e.to_string()))?
        .pop()
        .unwrap_or_default();

    // flush the frames still held by the interpolator
    for _ in 0..MAX_FLUSH {
        if out.len() >= delay + expected {
            break;
        }
        let tail = resampler
            .process_partial(None::<&[&[f32]]>, None)
            .map_err(|e| AudioError::ResampleError(e.to_string()))?
            .pop()
            .unwrap_or_default();
        if tail.is_empty() {
            break;
        }
        out.extend(tail);
    }

    out.drain(..delay.min(out.len()));
    out.truncate(expected);
    Ok(out)
}
