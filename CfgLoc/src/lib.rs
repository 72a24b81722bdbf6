//! # cfgloc
//!
//! A comment-preserving reader and writer for brace-delimited game config
//! files (`.cfg`), with localization tooling on top.
//!
//! ## Supported Features
//!
//! - **Lossless round trip** - comments, blank lines and patch syntax
//!   (`@PART[name]:NEEDS[Mod]`, `@cost *= 2`) survive parse and re-serialize
//! - **Localization tags** - `#tag` recognition, lookup tables and
//!   `<tag> = <text>` annotation comments
//! - **Catalog export** - grouped, ordered `Localization` files for translators
//! - **Batch processing** - parallel parsing of whole directory trees
//!
//! ## Quick Start
//!
//! ```
//! use cfgloc::formats::cfg::{parse_cfg, serialize_cfg};
//!
//! let text = "PART\n{\n\ttitle = #abc_title // #abc_title = Rocket\n}\n";
//! let root = parse_cfg(text)?;
//! assert_eq!(root.nodes[0].value("title"), Some("#abc_title"));
//! assert_eq!(serialize_cfg(&root), text);
//! # Ok::<(), cfgloc::Error>(())
//! ```
//!
//! ### Exporting a Catalog
//!
//! ```no_run
//! use cfgloc::prelude::*;
//!
//! let root = read_cfg("GameData/MyMod/Parts/tank.cfg")?;
//! let items = extract_part_strings(&root, "tank.cfg", &ExtractOptions::default(), None);
//! build_catalog(items, &ExportConfig::default()).write("en-us.cfg")?;
//! # Ok::<(), cfgloc::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `cfgloc` command-line binary

pub mod batch;
pub mod config;
pub mod error;
pub mod formats;
pub mod localization;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::cfg::{
        CfgParser, ConfigNode, ConfigValue, MetaBlock, MetaLine, ParseWarning, ParsedCfg,
        decode_meta, encode_meta, parse_cfg, read_cfg, serialize_cfg, write_cfg,
    };

    pub use crate::localization::{
        Catalog, ExportConfig, ExportItem, ExtractOptions, LocalizationTable, TagResolver,
        build_catalog, extract_part_strings, localize_parts, looks_like_tag,
        refresh_tag_comments,
    };

    // Batch operations
    pub use crate::batch::{BatchParseResult, find_cfg_files, parse_files};

    pub use crate::config::ToolConfig;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
