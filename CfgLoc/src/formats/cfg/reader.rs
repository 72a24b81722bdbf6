//! Config file reading
//!
//! A line-oriented parser for the brace-delimited config grammar. Every line
//! is trimmed before it is looked at; text left over after a brace is put
//! back at the front of the queue so several statements can share one line.
//!
//! Blank lines and comments are gathered in a pending [`MetaBlock`] until the
//! next entry claims them, which is what lets [`super::serialize_cfg`] write
//! them back.

use std::collections::VecDeque;
use std::fmt;
use std::fs;
use std::path::Path;

use super::document::{ConfigNode, ConfigValue};
use super::meta::MetaBlock;
use super::syntax;
use crate::error::{Error, Result};
use crate::localization::tags::{TagResolver, looks_like_tag, tag_comment};

const DEFAULT_FILE_NAME: &str = "<input>";

/// A recoverable problem found while parsing.
///
/// Warnings never abort the parse; they are also logged through `tracing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// End of input reached with nodes still open.
    UnterminatedNode {
        file: String,
        /// Number of nodes (besides the root) that were never closed.
        open_nodes: usize,
    },
    /// A node header never found its `{`. The node was skipped.
    MissingOpeningBrace {
        file: String,
        line_number: usize,
        name: String,
    },
    /// A blank line or comment between a header and its `{` was discarded.
    DroppedFormatting {
        file: String,
        line_number: usize,
        content: String,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedNode { file, open_nodes } => {
                write!(f, "{file}: {open_nodes} node(s) not closed at end of file")
            }
            Self::MissingOpeningBrace { file, line_number, name } => {
                write!(f, "{file}:{line_number}: node '{name}' has no opening brace, skipped")
            }
            Self::DroppedFormatting { file, line_number, content } => {
                write!(f, "{file}:{line_number}: cannot keep {content:?} before an opening brace")
            }
        }
    }
}

/// Result of a successful parse.
#[derive(Debug, Clone)]
pub struct ParsedCfg {
    /// Unnamed root holding the top-level entries.
    pub root: ConfigNode,
    /// Recoverable problems, in the order they were found.
    pub warnings: Vec<ParseWarning>,
}

/// Parser settings.
///
/// ```
/// use cfgloc::formats::cfg::CfgParser;
///
/// let parsed = CfgParser::new()
///     .with_file_name("Parts/tank.cfg")
///     .parse_text("PART\n{\n\tname = tank\n}\n")?;
/// assert_eq!(parsed.root.nodes[0].value("name"), Some("tank"));
/// # Ok::<(), cfgloc::Error>(())
/// ```
#[derive(Clone, Copy)]
pub struct CfgParser<'a> {
    file_name: &'a str,
    resolver: Option<&'a dyn TagResolver>,
    resolve_tags: bool,
}

impl Default for CfgParser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CfgParser<'a> {
    #[must_use]
    pub fn new() -> Self {
        CfgParser {
            file_name: DEFAULT_FILE_NAME,
            resolver: None,
            resolve_tags: true,
        }
    }

    /// Name used in errors and warnings.
    #[must_use]
    pub fn with_file_name(mut self, file_name: &'a str) -> Self {
        self.file_name = file_name;
        self
    }

    /// Resolver used to annotate tag values with their localized text.
    #[must_use]
    pub fn with_resolver(mut self, resolver: &'a dyn TagResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Turns tag annotation on or off (on by default, no-op without a resolver).
    #[must_use]
    pub fn resolve_tags(mut self, enabled: bool) -> Self {
        self.resolve_tags = enabled;
        self
    }

    /// Parse a whole text.
    ///
    /// # Errors
    /// Returns [`Error::UnparsableLine`] or [`Error::UnbalancedBraces`]; no tree
    /// is returned in either case.
    pub fn parse_text(&self, text: &str) -> Result<ParsedCfg> {
        self.parse_lines(text.lines())
    }

    /// Parse a sequence of lines.
    ///
    /// # Errors
    /// See [`CfgParser::parse_text`].
    pub fn parse_lines<I, S>(&self, lines: I) -> Result<ParsedCfg>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let queue = lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let line = line.as_ref();
                let line = if i == 0 { line.trim_start_matches('\u{feff}') } else { line };
                Line {
                    number: i + 1,
                    text: line.trim().to_string(),
                }
            })
            .collect();

        let mut state = ParseState {
            parser: self,
            queue,
            root: ConfigNode::root(),
            stack: Vec::new(),
            pending: MetaBlock::new(),
            warnings: Vec::new(),
        };

        while let Some(line) = state.queue.pop_front() {
            state.parse_line(&line)?;
        }
        Ok(state.finish())
    }
}

/// Read and parse a config file from disk.
///
/// # Errors
/// Returns an error if the file cannot be read or does not parse.
pub fn read_cfg<P: AsRef<Path>>(path: P) -> Result<ConfigNode> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let file_name = path.display().to_string();
    let parsed = CfgParser::new().with_file_name(&file_name).parse_text(&content)?;
    Ok(parsed.root)
}

/// Parse config text with default settings.
///
/// # Errors
/// See [`CfgParser::parse_text`].
pub fn parse_cfg(text: &str) -> Result<ConfigNode> {
    Ok(CfgParser::new().parse_text(text)?.root)
}

/// Reverse the value escaping done by the writer.
///
/// Handles `\n`, `\t` and `\uXXXX`; any other backslash is literal.
#[must_use]
pub fn unescape_value(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            Some('t') => {
                chars.next();
                out.push('\t');
            }
            Some('u') => {
                let digits: String = chars.clone().skip(1).take(4).collect();
                let decoded = (digits.len() == 4 && digits.chars().all(|d| d.is_ascii_hexdigit()))
                    .then(|| u32::from_str_radix(&digits, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match decoded {
                    Some(ch) => {
                        for _ in 0..5 {
                            chars.next();
                        }
                        out.push(ch);
                    }
                    None => out.push('\\'),
                }
            }
            _ => out.push('\\'),
        }
    }

    out
}

struct Line {
    number: usize,
    text: String,
}

struct ParseState<'p, 'a> {
    parser: &'p CfgParser<'a>,
    queue: VecDeque<Line>,
    root: ConfigNode,
    /// Open nodes below the root, innermost last.
    stack: Vec<ConfigNode>,
    pending: MetaBlock,
    warnings: Vec<ParseWarning>,
}

impl ParseState<'_, '_> {
    fn file(&self) -> String {
        self.parser.file_name.to_string()
    }

    fn current(&mut self) -> &mut ConfigNode {
        self.stack.last_mut().unwrap_or(&mut self.root)
    }

    fn requeue(&mut self, number: usize, rest: &str) {
        let rest = rest.trim();
        if !rest.is_empty() {
            self.queue.push_front(Line {
                number,
                text: rest.to_string(),
            });
        }
    }

    fn parse_line(&mut self, line: &Line) -> Result<()> {
        let text = line.text.as_str();

        if let Some(rest) = text.strip_prefix('}') {
            return self.close_node(line.number, rest);
        }
        if text.is_empty() {
            self.pending.push_blank_line();
            return Ok(());
        }
        if let Some(comment) = syntax::comment_text(text) {
            self.pending.push_comment(comment);
            return Ok(());
        }
        if self.parse_value(line) {
            return Ok(());
        }
        if self.open_inline_block(line) {
            return Ok(());
        }
        if self.open_header_block(line) {
            return Ok(());
        }

        Err(Error::UnparsableLine {
            file: self.file(),
            line_number: line.number,
            content: text.to_string(),
        })
    }

    fn close_node(&mut self, number: usize, rest: &str) -> Result<()> {
        let Some(mut node) = self.stack.pop() else {
            return Err(Error::UnbalancedBraces {
                file: self.file(),
                line_number: number,
            });
        };

        if self.pending.has_leading_lines() {
            node.values.push(ConfigValue::placeholder(self.pending.take()));
        }
        if let Some(comment) = syntax::pure_comment(rest) {
            node.meta.set_close_block_comment(comment);
        } else {
            self.requeue(number, rest);
        }

        self.current().nodes.push(node);
        Ok(())
    }

    /// `[cmd]name[args] [op]= value [// comment]`
    fn parse_value(&mut self, line: &Line) -> bool {
        let text = line.text.as_str();
        let comment_pos = text.find("//");
        let code = comment_pos.map_or(text, |p| &text[..p]);

        let Some(eq) = code.find('=') else {
            return false;
        };
        if code.find('{').is_some_and(|brace| brace < eq) {
            return false;
        }

        let (lhs, operator) = syntax::split_operator(&text[..eq]);
        let patched = syntax::split_patched_name(lhs);
        if !syntax::is_valid_value_name(patched.name) {
            return false;
        }

        // A `}` after the value closes the node on the same line.
        let close_at = code[eq..].find('}').map(|offset| eq + offset);
        let value_end = close_at.unwrap_or(code.len());
        let value_text = unescape_value(text[eq + 1..value_end].trim());

        let mut meta = self.pending.take();
        meta.set_patch_command(patched.command);
        meta.set_patch_arguments(patched.arguments.map(str::to_string));
        meta.set_patch_operator(operator);
        if close_at.is_none() {
            if let Some(pos) = comment_pos {
                meta.set_inline_comment(text[pos + 2..].trim());
            }
        }
        if meta.inline_comment.is_none() {
            if let Some(resolved) = self.resolve_tag(&value_text) {
                meta.set_inline_comment(tag_comment(&value_text, &resolved));
            }
        }

        self.current().push_value(ConfigValue {
            name: patched.name.to_string(),
            text: value_text,
            meta,
        });

        if let Some(pos) = close_at {
            self.requeue(line.number, &text[pos..]);
        }
        true
    }

    fn resolve_tag(&self, text: &str) -> Option<String> {
        if !self.parser.resolve_tags || !looks_like_tag(Some(text), false) {
            return None;
        }
        let resolver = self.parser.resolver?;
        let resolved = resolver.try_resolve(text);
        if resolved.is_none() {
            tracing::debug!("No localized text for {}", text);
        }
        resolved
    }

    /// `NAME {` with the body starting on the same line.
    fn open_inline_block(&mut self, line: &Line) -> bool {
        let text = line.text.as_str();
        let code = text.find("//").map_or(text, |p| &text[..p]);
        let Some(brace) = code.find('{') else {
            return false;
        };

        let patched = syntax::split_patched_name(text[..brace].trim());
        if !syntax::is_valid_node_name(patched.name) {
            return false;
        }

        let mut meta = self.pending.take();
        meta.set_patch_command(patched.command);
        meta.set_patch_arguments(patched.arguments.map(str::to_string));

        let rest = &text[brace + 1..];
        if let Some(comment) = syntax::pure_comment(rest) {
            meta.set_open_block_comment(comment);
        } else {
            self.requeue(line.number, rest);
        }

        self.stack.push(ConfigNode::new(patched.name).with_meta(meta));
        true
    }

    /// `NAME` alone, with `{` expected on a following line.
    fn open_header_block(&mut self, line: &Line) -> bool {
        let (statement, inline_comment) = syntax::split_inline_comment(&line.text);
        if statement.contains(['=', '{', '}']) {
            return false;
        }
        let patched = syntax::split_patched_name(statement);
        if !syntax::is_valid_node_name(patched.name) {
            return false;
        }

        let brace_at = self.queue.iter().position(|next| {
            let t = next.text.as_str();
            !(t.is_empty() || syntax::is_comment_line(t))
        });
        let found_brace = brace_at.is_some_and(|i| self.queue[i].text.starts_with('{'));

        let build_meta = |pending: MetaBlock| {
            let mut meta = pending;
            meta.set_patch_command(patched.command);
            meta.set_patch_arguments(patched.arguments.map(str::to_string));
            if let Some(comment) = inline_comment {
                meta.set_inline_comment(comment);
            }
            meta
        };

        if found_brace {
            let skipped = brace_at.unwrap_or(0);
            for dropped in self.queue.drain(..skipped) {
                let warning = ParseWarning::DroppedFormatting {
                    file: self.parser.file_name.to_string(),
                    line_number: dropped.number,
                    content: dropped.text,
                };
                tracing::warn!("{}", warning);
                self.warnings.push(warning);
            }

            let meta = build_meta(self.pending.take());
            let mut node = ConfigNode::new(patched.name).with_meta(meta);
            if let Some(brace_line) = self.queue.pop_front() {
                let rest = &brace_line.text[1..];
                if let Some(comment) = syntax::pure_comment(rest) {
                    node.meta.set_open_block_comment(comment);
                } else {
                    self.requeue(brace_line.number, rest);
                }
            }
            self.stack.push(node);
            return true;
        }

        if syntax::is_delete_command(patched.command) {
            let meta = build_meta(self.pending.take());
            self.current()
                .nodes
                .push(ConfigNode::new(patched.name).with_meta(meta));
            return true;
        }

        if brace_at.is_none() {
            let warning = ParseWarning::MissingOpeningBrace {
                file: self.file(),
                line_number: line.number,
                name: statement.to_string(),
            };
            tracing::warn!("{}", warning);
            self.warnings.push(warning);
            return true;
        }

        false
    }

    fn finish(mut self) -> ParsedCfg {
        if self.pending.has_leading_lines() {
            let meta = self.pending.take();
            self.current().values.push(ConfigValue::placeholder(meta));
        }

        if !self.stack.is_empty() {
            let warning = ParseWarning::UnterminatedNode {
                file: self.file(),
                open_nodes: self.stack.len(),
            };
            tracing::warn!("{}", warning);
            self.warnings.push(warning);

            while let Some(node) = self.stack.pop() {
                self.current().nodes.push(node);
            }
        }

        ParsedCfg {
            root: self.root,
            warnings: self.warnings,
        }
    }
}
