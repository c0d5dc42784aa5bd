use std::path::PathBuf;

use cp_core::config::FeatureConfig;
use cp_core::feature::{BundleShape, FeatureBundle};
use cp_core::sample::{Sample, SampleMetadata};

/// Bundle of `frames` frames whose chroma rows are all `chroma`.
pub fn bundle(frames: usize, chroma: &[f32]) -> FeatureBundle {
    let c = FeatureConfig::STANDARD;
    if frames == 0 {
        return FeatureBundle::empty();
    }
    FeatureBundle {
        chroma: vec![chroma.to_vec(); frames],
        mel_spectrogram: vec![vec![-40.0; c.n_mels]; frames],
        mfcc: vec![vec![0.5; c.n_mfcc]; frames],
        spectral_centroid: vec![440.0; frames],
        rms: vec![0.1; frames],
        zcr: vec![0.05; frames],
        shape: BundleShape {
            time_steps: frames,
            chroma_bins: c.n_chroma,
            mel_bins: c.n_mels,
            mfcc_coeffs: c.n_mfcc,
        },
    }
}

pub fn sample(id: &str, chord: &str, quality: &str, features: FeatureBundle) -> Sample {
    Sample {
        id: id.into(),
        chord: chord.into(),
        instrument: "guitar".into(),
        quality: quality.into(),
        audio_file: PathBuf::from(format!("{id}.wav")),
        duration: 1.0,
        features,
        metadata: SampleMetadata {
            source: "GuitarSet".into(),
            sample_rate: FeatureConfig::STANDARD.sample_rate,
            ..SampleMetadata::default()
        },
    }
}

/// One-hot chroma on pitch class `k`.
pub fn one_hot(k: usize) -> Vec<f32> {
    let mut v = vec![0.0; FeatureConfig::STANDARD.n_chroma];
    v[k] = 1.0;
    v
}
