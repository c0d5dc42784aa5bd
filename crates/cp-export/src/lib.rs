//! Corpus aggregation, training-set reduction and atomic persistence.

pub mod aggregate;
pub mod error;
pub mod persist;
pub mod training;

#[cfg(test)]
pub(crate) mod fixtures;

pub use aggregate::aggregate;
pub use error::ExportError;
pub use persist::{load_corpus, load_training_set, write_corpus, write_training_set};
pub use training::build_training_set;
