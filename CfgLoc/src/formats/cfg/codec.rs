//! String form of [`MetaBlock`]
//!
//! Hosts that can only store one optional string next to a value (a comment
//! field, a translation memory column) keep the metadata in this form. Each
//! fact is one line with a two-character tag:
//!
//! ```text
//! E:            blank leading line
//! L:<text>      leading comment
//! I:<text>      inline comment
//! O:<text>      comment after `{`
//! C:<text>      comment after `}`
//! P:<char>      patch command
//! A:<text>      patch arguments
//! X:<char>      patch operator
//! F:            placeholder entry
//! ```
//!
//! Payloads escape `\` as `\\` and a newline as `\n`, so a fact never spills
//! onto a second line. An empty block encodes to `None`, never to `Some("")`.

use super::meta::{MetaBlock, MetaLine};
use crate::error::{Error, Result};

const SEPARATOR: char = '\n';

const TAG_BLANK: &str = "E:";
const TAG_COMMENT: &str = "L:";
const TAG_INLINE: &str = "I:";
const TAG_OPEN: &str = "O:";
const TAG_CLOSE: &str = "C:";
const TAG_COMMAND: &str = "P:";
const TAG_ARGUMENTS: &str = "A:";
const TAG_OPERATOR: &str = "X:";
const TAG_PLACEHOLDER: &str = "F:";

/// Encode a block to its string form.
///
/// Returns `None` when the block is empty.
#[must_use]
pub fn encode_meta(meta: &MetaBlock) -> Option<String> {
    if meta.is_empty() {
        return None;
    }

    let mut lines: Vec<String> = Vec::new();
    for line in &meta.leading_lines {
        match line {
            MetaLine::Blank => lines.push(TAG_BLANK.to_string()),
            MetaLine::Comment(text) => {
                lines.push(format!("{TAG_COMMENT}{}", escape_payload(text)));
            }
        }
    }
    if let Some(ref text) = meta.inline_comment {
        lines.push(format!("{TAG_INLINE}{}", escape_payload(text)));
    }
    if let Some(ref text) = meta.open_block_comment {
        lines.push(format!("{TAG_OPEN}{}", escape_payload(text)));
    }
    if let Some(ref text) = meta.close_block_comment {
        lines.push(format!("{TAG_CLOSE}{}", escape_payload(text)));
    }
    if let Some(command) = meta.patch_command {
        lines.push(format!("{TAG_COMMAND}{}", escape_payload(&command.to_string())));
    }
    if let Some(ref arguments) = meta.patch_arguments {
        lines.push(format!("{TAG_ARGUMENTS}{}", escape_payload(arguments)));
    }
    if let Some(operator) = meta.patch_operator {
        lines.push(format!("{TAG_OPERATOR}{}", escape_payload(&operator.to_string())));
    }
    if meta.is_placeholder {
        lines.push(TAG_PLACEHOLDER.to_string());
    }

    let mut encoded = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            encoded.push(SEPARATOR);
        }
        encoded.push_str(line);
    }
    Some(encoded)
}

/// Decode a string produced by [`encode_meta`].
///
/// `None` and `Some("")` both decode to an empty block.
///
/// # Errors
/// Returns [`Error::UnrecognizedMetadata`] for any line this codec would not
/// have written. Nothing is silently dropped.
pub fn decode_meta(text: Option<&str>) -> Result<MetaBlock> {
    let mut meta = MetaBlock::new();
    let Some(text) = text else {
        return Ok(meta);
    };
    if text.is_empty() {
        return Ok(meta);
    }

    for line in text.split(SEPARATOR) {
        if line == TAG_BLANK {
            meta.push_blank_line();
        } else if line == TAG_PLACEHOLDER {
            meta.is_placeholder = true;
        } else if let Some(rest) = line.strip_prefix(TAG_COMMENT) {
            let text = unescape_payload(rest, line)?;
            meta.leading_lines.push(MetaLine::Comment(text));
        } else if let Some(rest) = line.strip_prefix(TAG_INLINE) {
            meta.inline_comment = Some(unescape_payload(rest, line)?);
        } else if let Some(rest) = line.strip_prefix(TAG_OPEN) {
            meta.open_block_comment = Some(unescape_payload(rest, line)?);
        } else if let Some(rest) = line.strip_prefix(TAG_CLOSE) {
            meta.close_block_comment = Some(unescape_payload(rest, line)?);
        } else if let Some(rest) = line.strip_prefix(TAG_COMMAND) {
            meta.patch_command = Some(single_char(&unescape_payload(rest, line)?, line)?);
        } else if let Some(rest) = line.strip_prefix(TAG_ARGUMENTS) {
            meta.patch_arguments = Some(unescape_payload(rest, line)?);
        } else if let Some(rest) = line.strip_prefix(TAG_OPERATOR) {
            meta.patch_operator = Some(single_char(&unescape_payload(rest, line)?, line)?);
        } else {
            return Err(unrecognized(line));
        }
    }

    Ok(meta)
}

fn escape_payload(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Reverse [`escape_payload`]. Any other escape was not written by this codec.
fn unescape_payload(payload: &str, line: &str) -> Result<String> {
    let mut out = String::with_capacity(payload.len());
    let mut chars = payload.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            _ => return Err(unrecognized(line)),
        }
    }
    Ok(out)
}

fn single_char(payload: &str, line: &str) -> Result<char> {
    let mut chars = payload.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(unrecognized(line)),
    }
}

fn unrecognized(line: &str) -> Error {
    tracing::error!("Unrecognized metadata line: {:?}", line);
    Error::UnrecognizedMetadata {
        line: line.to_string(),
    }
}
