use std::sync::LazyLock;

use regex::Regex;

use crate::parser::markup::MarkupView;

pub const NOT_FOUND: &str = "Job Title Not Found";

/// Anything longer than this is a headline or a concatenated nav bar, not a
/// job title.
const MAX_LEN: usize = 100;

static LABELED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:job title|position)(?:\s*:\s*|\s+is\s+)(.*?)(?:\.|,|\n)").unwrap()
});

/// Structural candidates in priority order (headings, social metadata,
/// title-flavored class/id attributes), then a labeled-phrase fallback over
/// the plain text. First candidate inside the length bound wins.
pub fn extract(view: &MarkupView, text: &str) -> String {
    let mut candidates = view.tag_texts("h1");
    if let Some(meta) = view.meta_property("og:title") {
        candidates.push(meta);
    }
    candidates.extend(view.attr_texts_containing("job-title"));

    for cand in candidates {
        if !cand.is_empty() && cand.chars().count() < MAX_LEN {
            return cand;
        }
    }

    if let Some(caps) = LABELED.captures(text) {
        let value = caps[1].trim();
        if !value.is_empty() {
            return value.to_string();
        }
    }

    NOT_FOUND.to_string()
}

// ── Tests ──
