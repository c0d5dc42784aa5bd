use std::path::Path;

use anyhow::Result;

/// Écrit un WAV mono 16 bits contenant une sinusoïde.
pub fn write_tone(path: &Path, rate: u32, freq: f32, secs: f32) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    let n = (rate as f32 * secs) as usize;
    for i in 0..n {
        let t = i as f32 / rate as f32;
        writer.write_sample((f32::sin(2.0 * std::f32::consts::PI * freq * t) * 12000.0) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}
