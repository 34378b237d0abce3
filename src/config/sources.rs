//! Configuration sources, in merge order after the defaults.

pub mod environment;
pub mod global_file;
