//! Lexical pieces of the config grammar
//!
//! Patch glyphs follow the ModuleManager convention used by mod patch files.

/// Prefixes that can precede a node or value name.
pub const PATCH_COMMANDS: &[char] = &['@', '%', '+', '$', '-', '!', '&', '|'];

/// Patch commands that delete their target. Nodes with these may omit a body.
pub const DELETE_COMMANDS: &[char] = &['-', '!'];

/// Prefixes that can precede the `=` of an assignment.
pub const PATCH_OPERATORS: &[char] = &['+', '-', '*', '/', '!', '^'];

/// Characters that start the argument part of a patched name.
const ARGUMENT_STARTS: &[char] = &['[', ':', ','];

const COMMENT: &str = "//";

/// `true` if the command removes its target.
#[must_use]
pub fn is_delete_command(command: Option<char>) -> bool {
    command.is_some_and(|c| DELETE_COMMANDS.contains(&c))
}

/// `true` for a line that is a `//` comment from the start.
#[must_use]
pub fn is_comment_line(line: &str) -> bool {
    line.starts_with(COMMENT)
}

/// Text of a whole-line comment, without the slashes. Spacing is preserved.
#[must_use]
pub fn comment_text(line: &str) -> Option<&str> {
    line.strip_prefix(COMMENT)
}

/// Splits `statement // comment` into its parts.
///
/// The statement is trimmed; the comment is trimmed and `None` when absent.
#[must_use]
pub fn split_inline_comment(line: &str) -> (&str, Option<&str>) {
    match line.find(COMMENT) {
        Some(pos) => (line[..pos].trim_end(), Some(line[pos + COMMENT.len()..].trim())),
        None => (line, None),
    }
}

/// If `rest` is nothing but a comment, returns its trimmed text.
#[must_use]
pub fn pure_comment(rest: &str) -> Option<&str> {
    rest.trim().strip_prefix(COMMENT).map(str::trim)
}

/// A name split into its patch decorations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchedName<'a> {
    pub command: Option<char>,
    pub name: &'a str,
    pub arguments: Option<&'a str>,
}

/// Splits `@NAME[args]:HAS[..]` into command, bare name and arguments.
#[must_use]
pub fn split_patched_name(raw: &str) -> PatchedName<'_> {
    let mut command = None;
    let mut rest = raw;
    if let Some(first) = raw.chars().next() {
        if PATCH_COMMANDS.contains(&first) && raw.len() > first.len_utf8() {
            command = Some(first);
            rest = &raw[first.len_utf8()..];
        }
    }

    match rest.find(ARGUMENT_STARTS) {
        Some(pos) if pos > 0 => PatchedName {
            command,
            name: &rest[..pos],
            arguments: Some(&rest[pos..]),
        },
        _ => PatchedName {
            command,
            name: rest,
            arguments: None,
        },
    }
}

/// `true` if `name` can stand as a node header.
#[must_use]
pub fn is_valid_node_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '=' | '{' | '}'))
}

/// `true` if `name` can stand on the left of `=`.
#[must_use]
pub fn is_valid_value_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['{', '}'])
}

/// Splits a trailing patch operator off the left side of an assignment.
///
/// `"cost *"` gives `("cost", Some('*'))`.
#[must_use]
pub fn split_operator(lhs: &str) -> (&str, Option<char>) {
    let trimmed = lhs.trim_end();
    if let Some(last) = trimmed.chars().last() {
        if PATCH_OPERATORS.contains(&last) {
            let name = trimmed[..trimmed.len() - last.len_utf8()].trim_end();
            if !name.is_empty() {
                return (name, Some(last));
            }
        }
    }
    (trimmed, None)
}
