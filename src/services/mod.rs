//! Business logic services.

pub mod deduplication;

pub use deduplication::{DeduplicationPipeline, DeduplicationService};
