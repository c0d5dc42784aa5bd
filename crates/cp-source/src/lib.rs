// Dataset source adapters: discovery, labeling, and the per-file job runner.

pub mod guitarset;
pub mod idmt;
pub mod labels;
pub mod runner;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_util;

pub use guitarset::GuitarSetAdapter;
pub use idmt::IdmtAdapter;
pub use runner::{AdapterOutcome, AdapterReport, AdapterStatus, FileFailure, run_adapter};
