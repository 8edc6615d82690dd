//! Domain layer - pure aggregation and metadata state
//!
//! No I/O here: the worker feeds these structures through events and
//! the UI reads them back out.

pub mod metadata;
pub mod registry;

pub use metadata::{ContractMetadata, MetadataCache, MetadataError, MetadataState};
pub use registry::{aggregate, ChainQuery};
