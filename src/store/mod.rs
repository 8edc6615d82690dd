//! Persistent storage

pub mod metadata_cache;

pub use metadata_cache::{CachedMetadata, MetadataStore};
