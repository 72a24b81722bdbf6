//! Formatting facts attached to config nodes and values
//!
//! The node model itself only knows names, values and children. Everything
//! else a human put into the file (comments, blank lines, patch syntax) is
//! collected into a [`MetaBlock`] so that it can be written back unchanged.

use serde::{Deserialize, Serialize};

/// A line that preceded an entry in the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetaLine {
    /// An empty line.
    Blank,
    /// A whole-line `//` comment (text without the slashes).
    Comment(String),
}

/// Non-semantic formatting facts of one node or value.
///
/// An empty block (see [`MetaBlock::is_empty`]) carries no information and is
/// equivalent to "no metadata".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaBlock {
    /// Blank lines and comments to emit before the entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leading_lines: Vec<MetaLine>,
    /// Trailing comment on the entry's own line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_comment: Option<String>,
    /// Comment after the opening `{` of a node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_block_comment: Option<String>,
    /// Comment after the closing `}` of a node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_block_comment: Option<String>,
    /// Patch command prefix on the name (e.g. `@`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch_command: Option<char>,
    /// Selector/filter text following the name (e.g. `[fuelTank]:NEEDS[Mod]`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch_arguments: Option<String>,
    /// Operator prefix on the `=` (e.g. `*` in `cost *= 2`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch_operator: Option<char>,
    /// The entry only carries leading lines and is never rendered as data.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_placeholder: bool,
}

impl MetaBlock {
    /// Creates an empty block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the block holds no facts at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leading_lines.is_empty()
            && self.inline_comment.is_none()
            && self.open_block_comment.is_none()
            && self.close_block_comment.is_none()
            && self.patch_command.is_none()
            && self.patch_arguments.is_none()
            && self.patch_operator.is_none()
            && !self.is_placeholder
    }

    /// Returns `true` if there are leading lines waiting to be claimed.
    #[must_use]
    pub fn has_leading_lines(&self) -> bool {
        !self.leading_lines.is_empty()
    }

    /// Extracts the accumulated facts and resets `self` for reuse.
    pub fn take(&mut self) -> MetaBlock {
        std::mem::take(self)
    }

    // ------------------------------------------------------------------
    // Accumulator API (used while scanning lines)
    // ------------------------------------------------------------------

    /// Records a blank line before the next entry.
    pub fn push_blank_line(&mut self) {
        self.leading_lines.push(MetaLine::Blank);
    }

    /// Records a whole-line comment before the next entry.
    ///
    /// Trailing whitespace is dropped; lines are trimmed when read back.
    pub fn push_comment(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.leading_lines
            .push(MetaLine::Comment(text.trim_end().to_string()));
    }

    /// Inline, open and close comments are stored trimmed, as the parser reads them.
    pub fn set_inline_comment(&mut self, text: impl Into<String>) {
        self.inline_comment = Some(text.into().trim().to_string());
    }

    pub fn set_open_block_comment(&mut self, text: impl Into<String>) {
        self.open_block_comment = Some(text.into().trim().to_string());
    }

    pub fn set_close_block_comment(&mut self, text: impl Into<String>) {
        self.close_block_comment = Some(text.into().trim().to_string());
    }

    pub fn set_patch_command(&mut self, command: Option<char>) {
        self.patch_command = command;
    }

    pub fn set_patch_arguments(&mut self, arguments: Option<String>) {
        self.patch_arguments = arguments.filter(|a| !a.is_empty());
    }

    pub fn set_patch_operator(&mut self, operator: Option<char>) {
        self.patch_operator = operator;
    }

    // ------------------------------------------------------------------
    // Builder API (used when constructing trees by hand)
    // ------------------------------------------------------------------

    #[must_use]
    pub fn with_blank_line(mut self) -> Self {
        self.push_blank_line();
        self
    }

    #[must_use]
    pub fn with_comment(mut self, text: impl Into<String>) -> Self {
        self.push_comment(text);
        self
    }

    #[must_use]
    pub fn with_inline_comment(mut self, text: impl Into<String>) -> Self {
        self.set_inline_comment(text);
        self
    }

    #[must_use]
    pub fn with_open_block_comment(mut self, text: impl Into<String>) -> Self {
        self.set_open_block_comment(text);
        self
    }

    #[must_use]
    pub fn with_close_block_comment(mut self, text: impl Into<String>) -> Self {
        self.set_close_block_comment(text);
        self
    }

    #[must_use]
    pub fn with_patch_command(mut self, command: char) -> Self {
        self.patch_command = Some(command);
        self
    }

    #[must_use]
    pub fn with_patch_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.set_patch_arguments(Some(arguments.into()));
        self
    }

    #[must_use]
    pub fn with_patch_operator(mut self, operator: char) -> Self {
        self.patch_operator = Some(operator);
        self
    }

    #[must_use]
    pub fn placeholder(mut self) -> Self {
        self.is_placeholder = true;
        self
    }
}
