//! String catalog export
//!
//! Flattens extracted strings into one localization file for translators.
//!
//! - Strings are grouped by `(group_key, subgroup_key)`, ascending.
//! - Inside a group they are ordered by sort key (missing keys last), then tag.
//! - Tags with a skip prefix are left out.
//! - Tags with a global prefix go to a trailing section, one entry per tag,
//!   with every source file listed.
//!
//! The catalog is rendered through the regular config writer, so the output is
//! itself a loadable `Localization` file.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::table::{DEFAULT_LANGUAGE, LOCALIZATION_NODE};
use crate::error::Result;
use crate::formats::cfg::{ConfigNode, ConfigValue, MetaBlock, serialize_cfg, write_cfg};

/// One string to export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportItem {
    /// Primary grouping (e.g. "Parts").
    pub group_key: String,
    /// Secondary grouping (e.g. the part category).
    pub subgroup_key: String,
    /// Ordering inside a group. Items without one sort last.
    pub sort_key: Option<String>,
    /// Localization tag, including the leading `#`.
    pub tag: String,
    /// Default (untranslated) text.
    pub text: String,
    /// Note for translators.
    pub description: Option<String>,
    /// File the string was found in.
    pub source: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Language node written into the catalog.
    #[serde(default = "default_language")]
    pub language: String,
    /// Tags starting with any of these are not exported.
    #[serde(default)]
    pub skip_prefixes: Vec<String>,
    /// Tags starting with any of these go to the shared trailing section.
    #[serde(default)]
    pub global_prefixes: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            skip_prefixes: Vec::new(),
            global_prefixes: Vec::new(),
        }
    }
}

impl ExportConfig {
    fn is_skipped(&self, tag: &str) -> bool {
        self.skip_prefixes.iter().any(|p| tag.starts_with(p.as_str()))
    }

    fn is_global(&self, tag: &str) -> bool {
        self.global_prefixes.iter().any(|p| tag.starts_with(p.as_str()))
    }
}

/// Items sharing a `(group_key, subgroup_key)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogGroup {
    pub group_key: String,
    pub subgroup_key: String,
    pub items: Vec<ExportItem>,
}

/// One tag of the global section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalEntry {
    /// The item supplying text and description.
    pub item: ExportItem,
    /// Every file the tag was found in, first-seen order.
    pub sources: Vec<String>,
}

/// Grouped and ordered export data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub language: String,
    pub groups: Vec<CatalogGroup>,
    /// Global section, ordered by tag.
    pub globals: Vec<GlobalEntry>,
    /// Tags that occur more than once outside the global section.
    ///
    /// Every copy is still written to the catalog.
    pub duplicates: Vec<String>,
}

fn compare_in_group(a: &ExportItem, b: &ExportItem) -> Ordering {
    match (&a.sort_key, &b.sort_key) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.tag.cmp(&b.tag))
}

fn has_description(item: &ExportItem) -> bool {
    item.description.as_deref().is_some_and(|d| !d.is_empty())
}

/// Group, order and filter extracted items.
pub fn build_catalog<I>(items: I, config: &ExportConfig) -> Catalog
where
    I: IntoIterator<Item = ExportItem>,
{
    let mut grouped: BTreeMap<(String, String), Vec<ExportItem>> = BTreeMap::new();
    let mut globals: BTreeMap<String, GlobalEntry> = BTreeMap::new();

    for item in items {
        if config.is_skipped(&item.tag) {
            tracing::debug!("Skipping {} from {}", item.tag, item.source);
            continue;
        }

        if config.is_global(&item.tag) {
            match globals.get_mut(&item.tag) {
                Some(entry) => {
                    if !entry.sources.contains(&item.source) {
                        entry.sources.push(item.source.clone());
                    }
                    if !has_description(&entry.item) && has_description(&item) {
                        entry.item = item;
                    }
                }
                None => {
                    globals.insert(
                        item.tag.clone(),
                        GlobalEntry {
                            sources: vec![item.source.clone()],
                            item,
                        },
                    );
                }
            }
            continue;
        }

        grouped
            .entry((item.group_key.clone(), item.subgroup_key.clone()))
            .or_default()
            .push(item);
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for item in grouped.values().flatten() {
        *seen.entry(item.tag.as_str()).or_default() += 1;
    }
    let mut duplicates: Vec<String> = seen
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(tag, _)| tag.to_string())
        .collect();
    duplicates.sort();
    for tag in &duplicates {
        tracing::warn!("Duplicate tag {} will be written more than once", tag);
    }

    let groups = grouped
        .into_iter()
        .map(|((group_key, subgroup_key), mut items)| {
            items.sort_by(compare_in_group);
            CatalogGroup {
                group_key,
                subgroup_key,
                items,
            }
        })
        .collect();

    Catalog {
        language: config.language.clone(),
        groups,
        globals: globals.into_values().collect(),
        duplicates,
    }
}

fn push_description(meta: &mut MetaBlock, description: Option<&str>) {
    if let Some(description) = description.filter(|d| !d.is_empty()) {
        for line in description.lines() {
            meta.push_comment(format!(" {line}"));
        }
    }
}

impl Catalog {
    /// Number of strings that will be written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum::<usize>() + self.globals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the `Localization { <language> { ... } }` tree.
    #[must_use]
    pub fn to_config(&self) -> ConfigNode {
        let mut lang = ConfigNode::new(self.language.as_str());

        for (index, group) in self.groups.iter().enumerate() {
            for (i, item) in group.items.iter().enumerate() {
                let mut meta = MetaBlock::new();
                if i == 0 {
                    if index > 0 {
                        meta.push_blank_line();
                    }
                    if group.subgroup_key.is_empty() {
                        meta.push_comment(format!(" {}", group.group_key));
                    } else {
                        meta.push_comment(format!(" {} / {}", group.group_key, group.subgroup_key));
                    }
                }
                push_description(&mut meta, item.description.as_deref());
                lang.push_value(ConfigValue::new(item.tag.as_str(), item.text.as_str()).with_meta(meta));
            }
        }

        for (i, entry) in self.globals.iter().enumerate() {
            let mut meta = MetaBlock::new();
            if i == 0 {
                if !self.groups.is_empty() {
                    meta.push_blank_line();
                }
                meta.push_comment(" Global strings");
            }
            for source in &entry.sources {
                meta.push_comment(format!(" Source: {source}"));
            }
            push_description(&mut meta, entry.item.description.as_deref());
            lang.push_value(
                ConfigValue::new(entry.item.tag.as_str(), entry.item.text.as_str()).with_meta(meta),
            );
        }

        let mut root = ConfigNode::root();
        root.add_node(ConfigNode::new(LOCALIZATION_NODE)).add_node(lang);
        root
    }

    /// Render the catalog as config text.
    #[must_use]
    pub fn render(&self) -> String {
        serialize_cfg(&self.to_config())
    }

    /// Write the catalog to disk.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_cfg(&self.to_config(), path)
    }
}
