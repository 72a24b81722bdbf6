//! Localization tags, string tables and catalog export

pub mod export;
pub mod extract;
pub mod table;
pub mod tags;

pub use export::{Catalog, CatalogGroup, ExportConfig, ExportItem, GlobalEntry, build_catalog};
pub use extract::{ExtractOptions, extract_part_strings, localize_parts, part_name, refresh_tag_comments};
pub use table::{DEFAULT_LANGUAGE, LOCALIZATION_NODE, LocalizationTable};
pub use tags::{TagResolver, looks_like_tag};
