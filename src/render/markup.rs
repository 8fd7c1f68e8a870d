//! Inline-Markup Stripper
//!
//! Flattens Markdown inline syntax to plain text for paragraph, bullet and
//! table-cell content. Headings and italic lines are classified before this
//! step and handle their own marker characters.

use regex::Regex;
use std::sync::LazyLock;

/// Literal marker that replaces a fenced code block
pub const CODE_BLOCK_MARKER: &str = "[CODE BLOCK]";

static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| compiled(r"```[\s\S]*?```"));
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| compiled(r"`([^`]+)`"));
static BOLD: LazyLock<Regex> = LazyLock::new(|| compiled(r"\*\*([^*]+)\*\*"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| compiled(r"\*([^*]+)\*"));
static HEADING_HASHES: LazyLock<Regex> = LazyLock::new(|| compiled(r"(?m)^#{1,6}\s+"));
static RULE_LINE: LazyLock<Regex> = LazyLock::new(|| compiled(r"(?m)^---+$"));
static LINK: LazyLock<Regex> = LazyLock::new(|| compiled(r"\[([^\]]+)\]\([^)]+\)"));

fn compiled(pattern: &str) -> Regex {
    Regex::new(pattern).expect("markup pattern is a valid constant")
}

/// Remove Markdown inline formatting, keeping the visible text.
pub fn strip_inline_markup(text: &str) -> String {
    let text = FENCED_CODE.replace_all(text, CODE_BLOCK_MARKER);
    let text = INLINE_CODE.replace_all(&text, "$1");
    let text = BOLD.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = HEADING_HASHES.replace_all(&text, "");
    let text = RULE_LINE.replace_all(&text, "");
    let text = LINK.replace_all(&text, "$1");
    text.into_owned()
}
