//! Localization tag recognition and lookup
//!
//! A tag is a value such as `#autoLOC_500123` or `#myMod_Part_title` that the
//! game replaces with localized text at load time. Hex colors share the `#`
//! prefix and are never tags.

/// Supplies localized text for a tag.
///
/// Implementations must be cheap and side-effect free: the parser may call
/// them for every tag value it meets, from several threads at once.
pub trait TagResolver: Send + Sync {
    /// Localized text for `tag`, or `None` when unknown.
    fn try_resolve(&self, tag: &str) -> Option<String>;
}

impl<F> TagResolver for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn try_resolve(&self, tag: &str) -> Option<String> {
        self(tag)
    }
}

/// Returns `true` if `text` is a localization tag.
///
/// With `first_word_only`, only the first whitespace-separated word is
/// examined (`"#tag trailing words"` counts). Otherwise the whole text must be
/// a single tag.
#[must_use]
pub fn looks_like_tag(text: Option<&str>, first_word_only: bool) -> bool {
    let Some(text) = text else {
        return false;
    };

    let candidate = if first_word_only {
        match text.split_whitespace().next() {
            Some(word) => word,
            None => return false,
        }
    } else {
        if text.chars().any(char::is_whitespace) {
            return false;
        }
        text
    };

    let Some(body) = candidate.strip_prefix('#') else {
        return false;
    };
    !body.is_empty() && !is_hex_color(body)
}

/// Comment text annotating a tag value: `<tag> = <text>`.
///
/// Newlines in `text` are written as `\n` so the comment stays on one line.
#[must_use]
pub fn tag_comment(tag: &str, text: &str) -> String {
    format!("{tag} = {}", text.replace('\n', "\\n"))
}

/// Text of a `<tag> = <text>` comment written for `tag`.
///
/// Returns `None` for any other comment.
#[must_use]
pub fn tag_comment_text(tag: &str, comment: &str) -> Option<String> {
    let rest = comment.strip_prefix(tag)?.trim_start().strip_prefix('=')?;
    Some(rest.trim().replace("\\n", "\n"))
}

/// `RGB` or `RRGGBB` in hex digits (the part after `#`).
fn is_hex_color(body: &str) -> bool {
    matches!(body.len(), 3 | 6) && body.chars().all(|c| c.is_ascii_hexdigit())
}
