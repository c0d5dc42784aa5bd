// Audio decoding, resampling, and feature extraction for chordprep.

pub mod chroma;
pub mod decode;
pub mod error;
pub mod extractor;
pub mod features;
pub mod fft;
pub mod mel;
pub mod resample;

pub use error::AudioError;
pub use extractor::FeatureExtractor;
