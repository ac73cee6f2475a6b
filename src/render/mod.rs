//! Markdown subset rendering.
//!
//! Translates a small, fixed markdown subset (headings 1-3, bold, italic,
//! flat lists, line breaks) into sanitized HTML markup. Everything else
//! passes through literally after escaping.
//!
//! The implementation is an ordered pipeline of text substitutions, each
//! stage operating on the output of the previous one. The order is part of
//! the contract: escaping runs first so inserted tags survive, bold runs
//! before italic so `**x**` is never read as italic-of-bold, and list items
//! are wrapped before newlines become `<br>`.

use std::sync::LazyLock;

use regex::Regex;

static HEADING_3: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^### (.*)$").expect("heading regex"));
static HEADING_2: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## (.*)$").expect("heading regex"));
static HEADING_1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# (.*)$").expect("heading regex"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold regex"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("italic regex"));
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:\*|-) (.*)$").expect("list item regex"));
// Greedy and dot-matches-newline: spans from the first <li> to the last
// </li> in the document, so separate list blocks merge into one <ul>.
// Longstanding quirk of the subset; callers depend on the output shape.
static LIST_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<li>.*</li>").expect("list block regex"));

/// Render markdown subset source into HTML markup.
///
/// Total over all string inputs: never fails, never panics, and returns an
/// empty string for empty input. Input markup characters are escaped before
/// any tags are inserted, so the output contains no markup other than the
/// fixed vocabulary this renderer emits.
///
/// # Example
///
/// ```
/// use notedown::render::render;
///
/// assert_eq!(render("# Title"), "<h1>Title</h1>");
/// assert_eq!(render("**bold** and *italic*"), "<strong>bold</strong> and <em>italic</em>");
/// ```
pub fn render(text: &str) -> String {
    let escaped = escape_markup(text);
    let headed = apply_headings(&escaped);
    let emphasized = apply_emphasis(&headed);
    let listed = wrap_list_block(&LIST_ITEM.replace_all(&emphasized, "<li>$1</li>"));
    listed.replace('\n', "<br>")
}

/// Escape the three HTML-significant characters. Ampersand first, so the
/// entities inserted for `<` and `>` are not themselves re-escaped.
fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Convert heading lines, longest prefix first so `### ` is never claimed
/// by the `# ` rule. One match per line, anchored at line start.
fn apply_headings(text: &str) -> String {
    let text = HEADING_3.replace_all(text, "<h3>$1</h3>");
    let text = HEADING_2.replace_all(&text, "<h2>$1</h2>");
    HEADING_1.replace_all(&text, "<h1>$1</h1>").into_owned()
}

/// Bold before italic: once `**x**` spans are consumed, the remaining
/// single asterisks are free for `<em>`.
fn apply_emphasis(text: &str) -> String {
    let text = BOLD.replace_all(text, "<strong>$1</strong>");
    ITALIC.replace_all(&text, "<em>$1</em>").into_owned()
}

/// Wrap the list item span in a single `<ul>`.
fn wrap_list_block(text: &str) -> String {
    LIST_BLOCK.replace(text, "<ul>${0}</ul>").into_owned()
}
