//! Brace-delimited config format (`.cfg`)
//!
//! ```text
//! PART                    // header comment
//! {                       // open-block comment
//!     title = Rocket      // inline comment
//!     @cost *= 1.5
//!     MODULE:NEEDS[Mod]
//!     {
//!         name = ModuleEngines
//!     }                   // close-block comment
//! }
//! ```

mod codec;
mod document;
mod meta;
mod reader;
pub mod syntax;
mod writer;

pub use codec::{decode_meta, encode_meta};
pub use document::{ConfigNode, ConfigValue};
pub use meta::{MetaBlock, MetaLine};
pub use reader::{CfgParser, ParseWarning, ParsedCfg, parse_cfg, read_cfg, unescape_value};
pub use writer::{escape_value, serialize_cfg, serialize_node, write_cfg};
