//! File format handlers

pub mod cfg;

// Re-export main document types
pub use cfg::{ConfigNode, ConfigValue, MetaBlock, MetaLine, parse_cfg, read_cfg, serialize_cfg, write_cfg};
