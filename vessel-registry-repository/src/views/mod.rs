//! Static description of the denormalized views.
//!
//! - [`partitioning`]: maps a vessel's visibility to its by-scope partition key
//! - [`registry`]: the fixed list of view descriptors and their relevance predicates

pub mod partitioning;
pub mod registry;

pub use partitioning::{
    is_reserved_scope, partition_key_for, visible_partition_keys, GLOBAL_PARTITION_KEY,
};
pub use registry::{
    identifier_key, relevant_views, row_keys_for, rows_for, ViewDescriptor, VIEW_REGISTRY,
};
