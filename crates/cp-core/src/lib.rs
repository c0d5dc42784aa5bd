//! Configuration, types, and shared structures for chordprep.
//!
//! This crate contains the data model shared across the workspace: the fixed
//! feature-extraction configuration, feature bundles, labeled samples, the
//! corpus and training-set documents, the chord vocabulary and the
//! source-adapter contract.

pub mod config;
pub mod corpus;
pub mod error;
pub mod feature;
pub mod sample;
pub mod training;
pub mod traits;
pub mod vocab;

pub use config::{FeatureConfig, PipelineConfig};
pub use corpus::{Corpus, CorpusMetadata};
pub use error::CoreError;
pub use feature::{BundleShape, FeatureBundle};
pub use sample::{Sample, SampleJob, SampleMetadata, Waveform};
pub use training::TrainingSet;
pub use traits::SourceAdapter;
