use std::sync::LazyLock;

use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use super::markup::MarkupView;

/// A content container must render to at least this much text before it is
/// trusted as the main content; shorter hits usually mean the page keeps its
/// real body elsewhere.
const MIN_MAIN_LEN: usize = 150;

/// Containers likely to hold the posting body, most specific first.
static CONTENT_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "#job-description",
        "#job-details",
        ".job-description",
        ".job-details",
        "div[class*='job-posting']",
        "div[class*='description']",
        "div[class*='details']",
        "article",
        "main",
    ]
    .iter()
    .map(|s| Selector::parse(s).unwrap())
    .collect()
});

static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());
static EXTRA_BLANKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Best-effort plain-text rendition of the document.
///
/// Tries a readability-style main-content pass first, then a
/// boilerplate-stripped body render, then a flat join of every visible text
/// node. Never fails: a document with no extractable text yields "".
pub fn plain_text(view: &MarkupView) -> String {
    let doc = view.document();

    for sel in CONTENT_SELECTORS.iter() {
        for el in doc.select(sel) {
            let text = render(el);
            if text.chars().count() >= MIN_MAIN_LEN {
                return text;
            }
        }
    }

    if let Some(body) = doc.select(&BODY).next() {
        let text = render(body);
        if !text.is_empty() {
            return text;
        }
    }

    visible_text(doc)
}

/// Elements that never contribute visible text.
fn is_invisible(name: &str) -> bool {
    matches!(name, "script" | "style" | "noscript" | "template" | "svg" | "head")
}

/// Page chrome skipped by the readability-style passes.
fn is_boilerplate(name: &str) -> bool {
    matches!(name, "nav" | "header" | "footer" | "aside" | "form")
}

/// Newlines owed after a closed element: blank line for paragraph-level
/// blocks, single break for list items and rows. Line structure is what the
/// section locator keys on, so list items must not be separated by blank
/// lines.
fn block_break(name: &str) -> Option<usize> {
    match name {
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "ul" | "ol" | "table" | "section"
        | "blockquote" | "pre" => Some(2),
        "li" | "tr" | "div" | "dt" | "dd" => Some(1),
        _ => None,
    }
}

/// Block-aware text render of one element subtree.
fn render(el: ElementRef) -> String {
    let mut out = String::new();
    render_into(el, &mut out);
    let out = EXTRA_BLANKS.replace_all(&out, "\n\n");
    out.trim().to_string()
}

fn render_into(el: ElementRef, out: &mut String) {
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if is_invisible(name) || is_boilerplate(name) {
                continue;
            }
            if name == "br" {
                ensure_breaks(out, 1);
                continue;
            }
            render_into(child_el, out);
            if let Some(n) = block_break(name) {
                ensure_breaks(out, n);
            }
        } else if let Node::Text(t) = child.value() {
            append_text(out, &t.text);
        }
    }
}

/// Append one text node, preserving its internal newlines. Whitespace-only
/// nodes (indentation between tags) collapse to at most one space so that
/// source formatting never fabricates blank-line section boundaries.
fn append_text(out: &mut String, raw: &str) {
    if raw.trim().is_empty() {
        if !out.is_empty() && !out.ends_with(char::is_whitespace) {
            out.push(' ');
        }
        return;
    }
    let cleaned = raw.replace('\r', "");
    if !out.is_empty()
        && !out.ends_with(char::is_whitespace)
        && !cleaned.starts_with(char::is_whitespace)
    {
        out.push(' ');
    }
    out.push_str(&cleaned);
}

/// Pad the output with newlines until `n` trail it.
fn ensure_breaks(out: &mut String, n: usize) {
    while out.ends_with(' ') || out.ends_with('\t') {
        out.pop();
    }
    if out.is_empty() {
        return;
    }
    let trailing = out.chars().rev().take_while(|&c| c == '\n').count();
    for _ in trailing..n {
        out.push('\n');
    }
}

/// Flat fallback: every visible text node, node edges trimmed, joined with
/// single spaces. Loses line structure but survives any markup.
fn visible_text(doc: &Html) -> String {
    let mut parts = Vec::new();
    collect_visible(doc.root_element(), &mut parts);
    parts.join(" ").trim().to_string()
}

fn collect_visible(el: ElementRef, parts: &mut Vec<String>) {
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            if is_invisible(child_el.value().name()) {
                continue;
            }
            collect_visible(child_el, parts);
        } else if let Node::Text(t) = child.value() {
            let trimmed = t.text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }
    }
}

// ── Tests ──
