use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use cp_core::sample::Waveform;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::resample::resample_mono;

/// Decode an audio file into mono f32 samples at its native rate.
///
/// Supports WAV, MP3, FLAC, OGG, AAC via symphonia. Channels are averaged.
///
/// # Errors
/// Returns an error if the file cannot be opened, probed, or has no track.
///
/// # Example
/// ```no_run
/// use cp_audio::decode::decode_file;
/// let (samples, sample_rate) = decode_file("p1_C_fingerstyle.wav").unwrap();
/// ```
pub fn decode_file(path: impl AsRef<Path>) -> Result<(Vec<f32>, u32)> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Cannot open audio file: {}", path.display()))?;
    let mss = MediaSourceStream::new(
        Box::new(file),
        symphonia::core::io::MediaSourceStreamOptions::default(),
    );

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .with_context(|| format!("Failed to probe audio format: {}", path.display()))?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .context("No default audio track found")?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .context("Audio track has no sample rate")?;
    let channels = track
        .codec_params
        .channels
        .map_or(1, symphonia::core::audio::Channels::count)
        .max(1);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let track_id = track.id;
    let mut mono: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut max_sample_frames: usize = 0;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                log::warn!("Audio decode packet error in {}: {e}", path.display());
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(e)) => {
                log::warn!("Audio decode frame error in {}: {e}", path.display());
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Decoder failure: {}", path.display()));
            }
        };

        let spec = *decoded.spec();
        let num_frames = decoded.capacity();
        // Reuse SampleBuffer: only reallocate if this packet is bigger than current capacity
        if sample_buf.is_none() || num_frames > max_sample_frames {
            sample_buf = Some(SampleBuffer::<f32>::new(num_frames as u64, spec));
            max_sample_frames = num_frames;
        }
        let Some(buf) = sample_buf.as_mut() else {
            continue;
        };
        buf.copy_interleaved_ref(decoded);

        mono.extend(
            buf.samples()
                .chunks(channels)
                .map(|chunk| chunk.iter().sum::<f32>() / chunk.len() as f32),
        );
    }

    log::debug!(
        "Decoded {} mono samples @ {}Hz ({} ch) from {}",
        mono.len(),
        sample_rate,
        channels,
        path.display()
    );

    Ok((mono, sample_rate))
}

/// Charge un fichier en mono au taux `target_rate`, en rééchantillonnant si besoin.
///
/// # Errors
/// Returns an error if decoding or resampling fails.
pub fn load_mono(path: impl AsRef<Path>, target_rate: u32) -> Result<Waveform> {
    let path = path.as_ref();
    let (samples, native_rate) = decode_file(path)?;
    let samples = resample_mono(&samples, native_rate, target_rate)
        .with_context(|| format!("Resampling {} failed", path.display()))?;
    Ok(Waveform::new(samples, target_rate))
}
