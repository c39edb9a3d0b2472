//! Small statistics helpers for training progress reporting.

pub mod descriptive;

pub use descriptive::DescriptiveStats;
