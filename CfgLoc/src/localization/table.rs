//! Localization table for tag lookup
//!
//! Loads `Localization` config files on demand and keeps the strings of one
//! language for lookup while parsing:
//!
//! ```text
//! Localization
//! {
//!     en-us
//!     {
//!         #myMod_Part_title = Rocket
//!     }
//! }
//! ```

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use super::tags::{TagResolver, looks_like_tag};
use crate::batch::find_cfg_files;
use crate::error::Result;
use crate::formats::cfg::{ConfigNode, read_cfg};

/// Name of the top-level node holding localization strings.
pub const LOCALIZATION_NODE: &str = "Localization";

/// Language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en-us";

/// Tag to text lookup for one language.
#[derive(Debug, Clone, Default)]
pub struct LocalizationTable {
    /// Strings indexed by tag
    strings: HashMap<String, String>,
    /// Files already loaded (to avoid re-loading)
    loaded_sources: Vec<PathBuf>,
    /// Language code, matched case-insensitively
    language: String,
    /// Every language block name met while loading
    languages_seen: BTreeSet<String>,
}

impl LocalizationTable {
    /// Create an empty table for `language`.
    #[must_use]
    pub fn new(language: &str) -> Self {
        Self {
            strings: HashMap::new(),
            loaded_sources: Vec::new(),
            language: language.to_string(),
            languages_seen: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Language block names found in loaded files, of any language, sorted.
    pub fn languages_seen(&self) -> impl Iterator<Item = &str> {
        self.languages_seen.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.strings.clear();
        self.loaded_sources.clear();
        self.languages_seen.clear();
    }

    /// Look up the text of a tag.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.strings.get(tag).map(String::as_str)
    }

    /// Add or replace one string.
    pub fn insert(&mut self, tag: impl Into<String>, text: impl Into<String>) {
        self.strings.insert(tag.into(), text.into());
    }

    /// Add the strings of every matching `Localization` block in a parsed file.
    ///
    /// Later entries replace earlier ones. Returns the number of strings read.
    pub fn add_from_node(&mut self, root: &ConfigNode) -> usize {
        let mut count = 0;
        let blocks = root
            .nodes_named(LOCALIZATION_NODE)
            .flat_map(|loc| loc.nodes.iter());

        for lang in blocks {
            self.languages_seen.insert(lang.name.clone());
            if !lang.name.eq_ignore_ascii_case(&self.language) {
                continue;
            }
            for value in lang.real_values() {
                if looks_like_tag(Some(&value.name), false) {
                    self.strings.insert(value.name.clone(), value.text.clone());
                    count += 1;
                } else {
                    tracing::debug!("Ignoring non-tag localization key {}", value.name);
                }
            }
        }
        count
    }

    /// Load strings from a localization file.
    ///
    /// A file that was already loaded is skipped and yields 0.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        if self.loaded_sources.iter().any(|p| p == path) {
            return Ok(0);
        }

        let root = read_cfg(path)?;
        let count = self.add_from_node(&root);
        self.loaded_sources.push(path.to_path_buf());
        tracing::debug!("Loaded {} strings from {}", count, path.display());
        Ok(count)
    }

    /// Load every `.cfg` file under `dir`.
    ///
    /// Files that fail to parse are logged and skipped.
    pub fn load_dir<P: AsRef<Path>>(&mut self, dir: P) -> usize {
        let mut total_count = 0;

        for path in find_cfg_files(dir) {
            match self.load_file(&path) {
                Ok(count) => total_count += count,
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}", path.display(), e);
                }
            }
        }

        total_count
    }

    /// Load a file, or every file below a directory.
    ///
    /// # Errors
    /// Returns an error if `path` is a file that cannot be loaded.
    pub fn load_path<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        if path.is_dir() {
            Ok(self.load_dir(path))
        } else {
            self.load_file(path)
        }
    }
}

impl TagResolver for LocalizationTable {
    fn try_resolve(&self, tag: &str) -> Option<String> {
        self.get(tag).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::cfg::parse_cfg;

    const SAMPLE: &str = "\
Localization
{
\ten-us
\t{
\t\t#tank_Part_title = Fuel Tank
\t\t#tank_Part_description = Holds fuel.\\nLots of it.
\t\tnot_a_tag = ignored
\t}
\tde-de
\t{
\t\t#tank_Part_title = Treibstofftank
\t}
}
";

    #[test]
    fn test_add_from_node_picks_language() {
        let root = parse_cfg(SAMPLE).unwrap();

        let mut english = LocalizationTable::new("en-US");
        assert_eq!(english.add_from_node(&root), 2);
        assert_eq!(english.get("#tank_Part_title"), Some("Fuel Tank"));
        assert_eq!(
            english.get("#tank_Part_description"),
            Some("Holds fuel.\nLots of it.")
        );
        assert_eq!(english.get("not_a_tag"), None);

        let mut german = LocalizationTable::new("de-de");
        german.add_from_node(&root);
        assert_eq!(german.try_resolve("#tank_Part_title").as_deref(), Some("Treibstofftank"));
    }

    #[test]
    fn test_languages_seen_lists_every_block() {
        let root = parse_cfg(SAMPLE).unwrap();
        let mut table = LocalizationTable::new("fr-fr");
        assert_eq!(table.add_from_node(&root), 0);
        assert!(table.is_empty());
        assert_eq!(table.languages_seen().collect::<Vec<_>>(), vec!["de-de", "en-us"]);
        assert_eq!(table.language(), "fr-fr");
    }

    #[test]
    fn test_clear_forgets_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("en-us.cfg");
        std::fs::write(&path, SAMPLE).unwrap();

        let mut table = LocalizationTable::new(DEFAULT_LANGUAGE);
        assert_eq!(table.load_file(&path).unwrap(), 2);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.languages_seen().count(), 0);
        assert_eq!(table.language(), DEFAULT_LANGUAGE);

        assert_eq!(table.load_file(&path).unwrap(), 2);
    }

    #[test]
    fn test_load_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("en-us.cfg");
        std::fs::write(&path, SAMPLE).unwrap();

        let mut table = LocalizationTable::new(DEFAULT_LANGUAGE);
        assert_eq!(table.load_file(&path).unwrap(), 2);
        assert_eq!(table.load_file(&path).unwrap(), 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_load_dir_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.cfg"), SAMPLE).unwrap();
        std::fs::write(dir.path().join("broken.cfg"), "}\n").unwrap();

        let mut table = LocalizationTable::new(DEFAULT_LANGUAGE);
        assert_eq!(table.load_path(dir.path()).unwrap(), 2);
        assert!(!table.is_empty());
    }
}
