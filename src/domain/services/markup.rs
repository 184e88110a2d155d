use std::sync::LazyLock;

use regex::Regex;

static CODE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").expect("code block pattern is valid"));
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("inline code pattern is valid"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));

/// Render assistant text into a small, safe HTML subset.
///
/// Order matters: escaping runs first so every tag in the output is one we
/// inserted, and `**bold**` is consumed before single `*` emphasis.
pub fn render_markup(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let html = escape_html(text);
    let html = CODE_BLOCK.replace_all(&html, "<pre>${1}</pre>");
    let html = INLINE_CODE.replace_all(&html, "<code>${1}</code>");
    let html = BOLD.replace_all(&html, "<strong>${1}</strong>");
    let html = emphasize(&html);
    html.replace('\n', "<br/>")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap `*x*` spans in `<em>`, where neither delimiter touches another `*`
/// and the span stays on one line.
fn emphasize(html: &str) -> String {
    let bytes = html.as_bytes();
    let is_star = |i: usize| bytes.get(i) == Some(&b'*');
    let lone_star = |i: usize| is_star(i) && !(i > 0 && is_star(i - 1)) && !is_star(i + 1);

    let find_close = |open: usize| {
        for j in open + 1..bytes.len() {
            if bytes[j] == b'\n' {
                return None;
            }
            if j >= open + 2 && lone_star(j) {
                return Some(j);
            }
        }
        None
    };

    let mut out = String::with_capacity(html.len());
    let mut copied = 0;
    let mut i = 0;
    while i < bytes.len() {
        if lone_star(i) {
            if let Some(close) = find_close(i) {
                out.push_str(&html[copied..i]);
                out.push_str("<em>");
                out.push_str(&html[i + 1..close]);
                out.push_str("</em>");
                i = close + 1;
                copied = i;
                continue;
            }
        }
        i += 1;
    }
    out.push_str(&html[copied..]);
    out
}
