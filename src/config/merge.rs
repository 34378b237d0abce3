//! Merge order for configuration layers.

pub mod merge_policy;
