//! Config file writing
//!
//! The inverse of the reader: walks a [`ConfigNode`] depth-first and puts the
//! recorded comments, blank lines and patch syntax back where they came from.
//! Output is tab-indented with `\n` line endings.

use std::fs;
use std::path::Path;

use super::document::{ConfigNode, ConfigValue};
use super::meta::{MetaBlock, MetaLine};
use super::syntax;
use crate::error::Result;

/// Write a config tree to disk (see [`serialize_cfg`]).
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_cfg<P: AsRef<Path>>(root: &ConfigNode, path: P) -> Result<()> {
    fs::write(path, serialize_cfg(root))?;
    Ok(())
}

/// Serialize the contents of a root node.
///
/// The root itself has no header or braces; its values and children are
/// written at the top level.
#[must_use]
pub fn serialize_cfg(root: &ConfigNode) -> String {
    let mut out = String::new();
    write_body(&mut out, root, 0);
    out
}

/// Serialize a single named node including its header and braces.
#[must_use]
pub fn serialize_node(node: &ConfigNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node, 0);
    out
}

/// Escape a value so that it survives the reader's line trimming.
///
/// Only the first and last characters are turned into `\uXXXX`, and only when
/// they are a space, a no-break space or a tab. Newlines anywhere become `\n`
/// and interior tabs become `\t`. Interior spaces are left alone.
#[must_use]
pub fn escape_value(text: &str) -> String {
    let last = text.chars().count().saturating_sub(1);
    let mut out = String::with_capacity(text.len());

    for (i, c) in text.chars().enumerate() {
        let at_boundary = i == 0 || i == last;
        if at_boundary && matches!(c, ' ' | '\u{a0}' | '\t') {
            out.push_str(&format!("\\u{:04X}", c as u32));
        } else if c == '\n' {
            out.push_str("\\n");
        } else if c == '\t' {
            out.push_str("\\t");
        } else {
            out.push(c);
        }
    }

    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

fn write_leading_lines(out: &mut String, meta: &MetaBlock, depth: usize) {
    for line in &meta.leading_lines {
        match line {
            MetaLine::Blank => {}
            MetaLine::Comment(text) => {
                indent(out, depth);
                out.push_str("//");
                out.push_str(text);
            }
        }
        out.push('\n');
    }
}

fn write_comment(out: &mut String, comment: Option<&String>) {
    if let Some(text) = comment {
        out.push_str(" // ");
        out.push_str(text);
    }
}

fn write_patched_name(out: &mut String, name: &str, meta: &MetaBlock) {
    if let Some(command) = meta.patch_command {
        out.push(command);
    }
    out.push_str(name);
    if let Some(ref arguments) = meta.patch_arguments {
        out.push_str(arguments);
    }
}

/// Values in order, then child nodes, then the placeholders that follow the
/// last real value (the comments found before the closing brace).
fn write_body(out: &mut String, node: &ConfigNode, depth: usize) {
    let trailing = node
        .values
        .iter()
        .rposition(|v| !v.meta.is_placeholder)
        .map_or(0, |last| last + 1);
    let (values, placeholders) = node.values.split_at(trailing);

    for value in values {
        if value.meta.is_placeholder {
            write_leading_lines(out, &value.meta, depth);
        } else {
            write_value(out, value, depth);
        }
    }
    for child in &node.nodes {
        write_node(out, child, depth);
    }
    for placeholder in placeholders {
        write_leading_lines(out, &placeholder.meta, depth);
    }
}

fn write_value(out: &mut String, value: &ConfigValue, depth: usize) {
    let meta = &value.meta;
    write_leading_lines(out, meta, depth);

    indent(out, depth);
    write_patched_name(out, &value.name, meta);
    out.push(' ');
    if let Some(operator) = meta.patch_operator {
        out.push(operator);
    }
    out.push('=');

    let escaped = escape_value(&value.text);
    if !escaped.is_empty() {
        out.push(' ');
        out.push_str(&escaped);
    }
    write_comment(out, meta.inline_comment.as_ref());
    out.push('\n');
}

fn is_bodyless(node: &ConfigNode) -> bool {
    syntax::is_delete_command(node.meta.patch_command)
        && node.is_empty()
        && node.meta.open_block_comment.is_none()
        && node.meta.close_block_comment.is_none()
}

fn write_node(out: &mut String, node: &ConfigNode, depth: usize) {
    let meta = &node.meta;
    write_leading_lines(out, meta, depth);

    indent(out, depth);
    write_patched_name(out, &node.name, meta);
    write_comment(out, meta.inline_comment.as_ref());
    out.push('\n');

    if is_bodyless(node) {
        return;
    }

    indent(out, depth);
    out.push('{');
    write_comment(out, meta.open_block_comment.as_ref());
    out.push('\n');

    write_body(out, node, depth + 1);

    indent(out, depth);
    out.push('}');
    write_comment(out, meta.close_block_comment.as_ref());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::cfg::reader::{CfgParser, parse_cfg};
    use pretty_assertions::assert_eq;

    fn sample_tree() -> ConfigNode {
        let mut root = ConfigNode::root();

        let part = root.add_node(
            ConfigNode::new("PART").with_meta(
                MetaBlock::new()
                    .with_comment(" Fuel tank")
                    .with_patch_command('@')
                    .with_patch_arguments("[tank]:NEEDS[Mod]")
                    .with_open_block_comment("open")
                    .with_close_block_comment("close"),
            ),
        );
        part.push_value(
            ConfigValue::new("title", "#abc_title")
                .with_meta(MetaBlock::new().with_inline_comment("#abc_title = Rocket")),
        );
        part.push_value(
            ConfigValue::new("cost", "1.5").with_meta(
                MetaBlock::new()
                    .with_blank_line()
                    .with_patch_command('@')
                    .with_patch_operator('*'),
            ),
        );
        part.push_value(ConfigValue::new("description", " Two\nlines with\ttab "));
        part.push_value(ConfigValue::new("tags", "a b c"));
        part.push_value(ConfigValue::new("tags", "a b c"));
        part.push_value(ConfigValue::new("empty", ""));

        let module = part.add_node(ConfigNode::new("MODULE"));
        module.add_value("name", "ModuleEngines");
        part.add_node(ConfigNode::new("MODULE").with_meta(
            MetaBlock::new().with_patch_command('!').with_patch_arguments("[ModuleFoo]"),
        ));
        part.push_value(ConfigValue::placeholder(
            MetaBlock::new().with_blank_line().with_comment(" trailing"),
        ));

        root
    }

    #[test]
    fn test_escape_boundaries_only() {
        assert_eq!(escape_value(""), "");
        assert_eq!(escape_value(" "), "\\u0020");
        assert_eq!(escape_value("\t"), "\\u0009");
        assert_eq!(escape_value("\u{a0}"), "\\u00A0");
        assert_eq!(escape_value("a"), "a");
        assert_eq!(escape_value(" a b "), "\\u0020a b\\u0020");
        assert_eq!(escape_value("a\tb"), "a\\tb");
        assert_eq!(escape_value("a\nb"), "a\\nb");
    }

    #[test]
    fn test_interior_spaces_are_never_escaped() {
        let text = "Large   fuel tank with  extra   spaces";
        assert_eq!(escape_value(text), text);
        assert_eq!(escape_value("a\u{a0}b"), "a\u{a0}b");
    }

    #[test]
    fn test_scenario_round_trip_is_byte_exact() {
        let input = "PART\n{\n\ttitle = #abc_title // #abc_title = Rocket\n}\n";
        let root = parse_cfg(input).unwrap();
        assert_eq!(serialize_cfg(&root), input);
    }

    #[test]
    fn test_layout() {
        let expected = "\
// Fuel tank
@PART[tank]:NEEDS[Mod]
{ // open
\ttitle = #abc_title // #abc_title = Rocket

\t@cost *= 1.5
\tdescription = \\u0020Two\\nlines with\\ttab\\u0020
\ttags = a b c
\ttags = a b c
\tempty =
\tMODULE
\t{
\t\tname = ModuleEngines
\t}
\t!MODULE[ModuleFoo]

\t// trailing
} // close
";
        assert_eq!(serialize_cfg(&sample_tree()), expected);
    }

    #[test]
    fn test_round_trip_preserves_tree() {
        let tree = sample_tree();
        let reparsed = parse_cfg(&serialize_cfg(&tree)).unwrap();
        assert_eq!(reparsed, tree);
    }

    #[test]
    fn test_serialize_is_idempotent() {
        let first = serialize_cfg(&sample_tree());
        let second = serialize_cfg(&parse_cfg(&first).unwrap());
        assert_eq!(second, first);
    }

    #[test]
    fn test_placeholder_between_values_keeps_its_position() {
        let mut part = ConfigNode::new("PART");
        part.values = vec![
            ConfigValue::new("a", "1"),
            ConfigValue::placeholder(MetaBlock::new().with_comment(" c")),
            ConfigValue::new("b", "2"),
            ConfigValue::placeholder(MetaBlock::new().with_comment(" end")),
        ];
        part.add_node(ConfigNode::new("MODULE"));

        assert_eq!(
            serialize_node(&part),
            "PART\n{\n\ta = 1\n\t// c\n\tb = 2\n\tMODULE\n\t{\n\t}\n\t// end\n}\n"
        );
    }

    #[test]
    fn test_built_placeholder_before_value_round_trips() {
        let mut root = ConfigNode::root();
        let part = root.add_node(ConfigNode::new("PART"));
        part.push_value(ConfigValue::placeholder(MetaBlock::new().with_comment(" c")));
        part.add_value("a", "1");

        let text = serialize_cfg(&root);
        assert_eq!(text, "PART\n{\n\t// c\n\ta = 1\n}\n");
        assert_eq!(parse_cfg(&text).unwrap(), root);
    }

    #[test]
    fn test_built_comment_whitespace_round_trips() {
        let mut root = ConfigNode::root();
        let part = root.add_node(
            ConfigNode::new("PART").with_meta(MetaBlock::new().with_open_block_comment(" open ")),
        );
        part.push_value(ConfigValue::new("title", "x").with_meta(
            MetaBlock::new().with_comment(" note ").with_inline_comment("  spaced "),
        ));

        let text = serialize_cfg(&root);
        assert_eq!(text, "PART\n{ // open\n\t// note\n\ttitle = x // spaced\n}\n");
        assert_eq!(parse_cfg(&text).unwrap(), root);
    }

    #[test]
    fn test_dropped_blank_line_is_gone_after_round_trip() {
        let parsed = CfgParser::new().parse_text("MODULE\n\n{\n\tname = X\n}\n").unwrap();
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(serialize_cfg(&parsed.root), "MODULE\n{\n\tname = X\n}\n");
    }

    #[test]
    fn test_serialize_node_with_header() {
        let mut node = ConfigNode::new("RESOURCE");
        node.add_value("name", "LiquidFuel");
        assert_eq!(serialize_node(&node), "RESOURCE\n{\n\tname = LiquidFuel\n}\n");
    }
}
