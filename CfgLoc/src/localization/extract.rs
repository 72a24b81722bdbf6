//! Part string extraction and in-place localization

use serde::{Deserialize, Serialize};

use super::export::ExportItem;
use super::tags::{TagResolver, looks_like_tag, tag_comment, tag_comment_text};
use crate::formats::cfg::{ConfigNode, ConfigValue};

/// Node name of a part definition.
pub const PART_NODE: &str = "PART";

/// Group key used for every extracted part string.
pub const PARTS_GROUP: &str = "Parts";

fn default_tag_prefix() -> String {
    String::new()
}

fn default_fields() -> Vec<String> {
    ["title", "manufacturer", "description", "tags"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Which part fields are localizable and how their tags are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Prepended to generated tags: `#<prefix><part>_Part_<field>`.
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            tag_prefix: default_tag_prefix(),
            fields: default_fields(),
        }
    }
}

impl ExtractOptions {
    /// Tag generated for a literal field value.
    #[must_use]
    pub fn part_tag(&self, part_name: &str, field: &str) -> String {
        let part: String = part_name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        format!("#{}{}_Part_{}", self.tag_prefix, part, field)
    }
}

/// Name of a part: its `name` value, or the `[name]` of a patch header.
///
/// Wildcard patches (`@PART[*]`) have no usable name.
#[must_use]
pub fn part_name(part: &ConfigNode) -> Option<String> {
    if let Some(name) = part.value("name").filter(|n| !n.is_empty()) {
        return Some(name.to_string());
    }

    let arguments = part.meta.patch_arguments.as_deref()?;
    let start = arguments.find('[')? + 1;
    let end = start + arguments[start..].find(']')?;
    let name = &arguments[start..end];
    if name.is_empty() || name.contains(['*', '?', '|']) {
        return None;
    }
    Some(name.to_string())
}

fn parts(root: &ConfigNode) -> impl Iterator<Item = &ConfigNode> {
    root.nodes_named(PART_NODE)
}

/// Collect the localizable strings of every part in a file.
///
/// Tag values take their default text from `resolver`, falling back to a
/// `<tag> = <text>` inline comment. Literal values get a generated tag.
#[must_use]
pub fn extract_part_strings(
    root: &ConfigNode,
    source: &str,
    options: &ExtractOptions,
    resolver: Option<&dyn TagResolver>,
) -> Vec<ExportItem> {
    let mut items = Vec::new();

    for part in parts(root) {
        let Some(name) = part_name(part) else {
            tracing::debug!("Skipping unnamed part in {}", source);
            continue;
        };
        let category = part.value("category").unwrap_or_default();

        for field in &options.fields {
            for value in part.values_named(field) {
                let (tag, text) = if looks_like_tag(Some(&value.text), false) {
                    let text = resolver
                        .and_then(|r| r.try_resolve(&value.text))
                        .or_else(|| {
                            value
                                .meta
                                .inline_comment
                                .as_deref()
                                .and_then(|c| tag_comment_text(&value.text, c))
                        });
                    if text.is_none() {
                        tracing::warn!("No text for {} in part {} ({})", value.text, name, source);
                    }
                    (value.text.clone(), text.unwrap_or_default())
                } else {
                    (options.part_tag(&name, field), value.text.clone())
                };

                items.push(ExportItem {
                    group_key: PARTS_GROUP.to_string(),
                    subgroup_key: category.to_string(),
                    sort_key: Some(name.clone()),
                    tag,
                    text,
                    description: None,
                    source: source.to_string(),
                });
            }
        }
    }

    items
}

fn localize_value(value: &mut ConfigValue, tag: String) {
    let comment = tag_comment(&tag, &value.text);
    value.text = tag;
    value.meta.set_inline_comment(comment);
}

/// Replace literal part strings with their generated tags.
///
/// The old text is kept as a `<tag> = <text>` inline comment, replacing any
/// comment that was there. Empty values are left alone. Returns the number of
/// values rewritten.
pub fn localize_parts(root: &mut ConfigNode, options: &ExtractOptions) -> usize {
    let mut count = 0;

    for part in root.nodes.iter_mut().filter(|n| n.name == PART_NODE) {
        let Some(name) = part_name(part) else {
            continue;
        };

        for value in part.values.iter_mut() {
            if value.meta.is_placeholder
                || value.text.is_empty()
                || !options.fields.contains(&value.name)
                || looks_like_tag(Some(&value.text), false)
            {
                continue;
            }
            let tag = options.part_tag(&name, &value.name);
            localize_value(value, tag);
            count += 1;
        }
    }

    count
}

/// Refresh the `<tag> = <text>` comments of tag values anywhere in the tree.
///
/// Comments that are not of that form are left alone, as are tags the
/// resolver does not know. Returns the number of comments changed.
pub fn refresh_tag_comments(root: &mut ConfigNode, resolver: &dyn TagResolver) -> usize {
    let mut count = 0;

    for value in root.values.iter_mut().filter(|v| !v.meta.is_placeholder) {
        if !looks_like_tag(Some(&value.text), false) {
            continue;
        }
        let Some(text) = resolver.try_resolve(&value.text) else {
            continue;
        };

        let replaceable = match value.meta.inline_comment.as_deref() {
            None => true,
            Some(existing) => tag_comment_text(&value.text, existing).is_some(),
        };
        let comment = tag_comment(&value.text, &text);
        if replaceable && value.meta.inline_comment.as_deref() != Some(comment.trim()) {
            value.meta.set_inline_comment(comment);
            count += 1;
        }
    }

    for child in &mut root.nodes {
        count += refresh_tag_comments(child, resolver);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::cfg::{parse_cfg, serialize_cfg};
    use crate::localization::table::LocalizationTable;
    use pretty_assertions::assert_eq;

    const TANK: &str = "\
PART
{
\tname = fuel.tank
\tcategory = FuelTank
\ttitle = Fuel Tank
\tmanufacturer = #acme_Agency // #acme_Agency = ACME
\tdescription = #tank_desc
\tcost = 100
}
@PART[engine]:NEEDS[Mod]
{
\t@title = Engine
}
@PART[*]
{
\t@title = Wildcard
}
";

    #[test]
    fn test_part_name_sources() {
        let root = parse_cfg(TANK).unwrap();
        let names: Vec<_> = root.nodes.iter().map(part_name).collect();
        assert_eq!(
            names,
            vec![Some("fuel.tank".to_string()), Some("engine".to_string()), None]
        );
    }

    #[test]
    fn test_extract_part_strings() {
        let root = parse_cfg(TANK).unwrap();
        let mut table = LocalizationTable::new("en-us");
        table.insert("#tank_desc", "Holds fuel");

        let items = extract_part_strings(&root, "tank.cfg", &ExtractOptions::default(), Some(&table));
        let summary: Vec<_> = items
            .iter()
            .map(|i| (i.tag.as_str(), i.text.as_str(), i.subgroup_key.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("#fuel_tank_Part_title", "Fuel Tank", "FuelTank"),
                ("#acme_Agency", "ACME", "FuelTank"),
                ("#tank_desc", "Holds fuel", "FuelTank"),
                ("#engine_Part_title", "Engine", ""),
            ]
        );
        assert!(items.iter().all(|i| i.group_key == PARTS_GROUP && i.source == "tank.cfg"));
        assert_eq!(items[3].sort_key.as_deref(), Some("engine"));
    }

    #[test]
    fn test_unknown_tag_has_empty_text() {
        let root = parse_cfg(TANK).unwrap();
        let items = extract_part_strings(&root, "tank.cfg", &ExtractOptions::default(), None);
        let desc = items.iter().find(|i| i.tag == "#tank_desc").unwrap();
        assert_eq!(desc.text, "");
    }

    #[test]
    fn test_localize_parts_rewrites_literals() {
        let mut root = parse_cfg(TANK).unwrap();
        let options = ExtractOptions {
            tag_prefix: "acme_".to_string(),
            ..Default::default()
        };

        assert_eq!(localize_parts(&mut root, &options), 2);

        let tank = &root.nodes[0];
        assert_eq!(tank.value("title"), Some("#acme_fuel_tank_Part_title"));
        assert_eq!(
            tank.values[2].meta.inline_comment.as_deref(),
            Some("#acme_fuel_tank_Part_title = Fuel Tank")
        );
        assert_eq!(tank.value("manufacturer"), Some("#acme_Agency"));
        assert_eq!(tank.value("cost"), Some("100"));

        let engine = &root.nodes[1];
        assert_eq!(engine.value("title"), Some("#acme_engine_Part_title"));
        assert_eq!(engine.values[0].meta.patch_command, Some('@'));

        // Running again finds nothing left to do.
        assert_eq!(localize_parts(&mut root, &options), 0);
    }

    #[test]
    fn test_localized_text_survives_extraction() {
        let mut root = parse_cfg(TANK).unwrap();
        let options = ExtractOptions::default();
        localize_parts(&mut root, &options);

        let reparsed = parse_cfg(&serialize_cfg(&root)).unwrap();
        let items = extract_part_strings(&reparsed, "tank.cfg", &options, None);
        let title = items.iter().find(|i| i.tag == "#fuel_tank_Part_title").unwrap();
        assert_eq!(title.text, "Fuel Tank");
    }

    #[test]
    fn test_refresh_tag_comments() {
        let mut root = parse_cfg(
            "PART\n{\n\ttitle = #a // #a = Old\n\tdescription = #b // keep me\n\tmanufacturer = #c\n\ttags = #unknown\n}\n",
        )
        .unwrap();
        let mut table = LocalizationTable::new("en-us");
        table.insert("#a", "New");
        table.insert("#b", "Bee");
        table.insert("#c", "See\nthis");

        assert_eq!(refresh_tag_comments(&mut root, &table), 2);
        let part = &root.nodes[0];
        let comments: Vec<_> = part
            .values
            .iter()
            .map(|v| v.meta.inline_comment.as_deref())
            .collect();
        assert_eq!(
            comments,
            vec![Some("#a = New"), Some("keep me"), Some("#c = See\\nthis"), None]
        );

        assert_eq!(refresh_tag_comments(&mut root, &table), 0);
    }
}
