use std::sync::LazyLock;

use regex::Regex;

use crate::parser::lists::{
    self, FormatOptions, ACTION_VERBS, CUE_MAX_LEN, CUE_MIN_LEN, DEFAULT_MAX_ITEM_LEN,
    LOOSE_MAX_ITEMS,
};
use crate::parser::sections;

pub const NOT_FOUND: &str = "No specific responsibilities section found in the job posting.";

/// Header cascade, exact labeled form first.
static HEADERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)key\s+responsibilities\s*:?\s*\n").unwrap(),
        Regex::new(r"(?i)\b(?:responsibilities|duties|what you(?:'|’)ll do|your role)\s*:").unwrap(),
        Regex::new(r"(?i)\b(?:responsibilities|duties)\b").unwrap(),
    ]
});

static BOUNDARIES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![sections::boundary(
        r"qualifications|requirements|skills|about|apply|benefits|compensation|location",
    )]
});

pub fn extract(text: &str) -> Vec<String> {
    if let Some(sec) = sections::locate(text, &HEADERS, &BOUNDARIES) {
        let items = lists::format_items(&sec.body, &FormatOptions::default());
        if !items.is_empty() {
            return lists::bulleted(items);
        }
    }

    let scavenged = scan_for_clauses(text);
    if !scavenged.is_empty() {
        return lists::bulleted(scavenged);
    }

    vec![NOT_FOUND.to_string()]
}

/// No labeled section anywhere: scan the whole text for clauses that read
/// like duties (action-verb openers, "you will" phrasing) inside a plausible
/// length window.
fn scan_for_clauses(text: &str) -> Vec<String> {
    lists::split_sentences(text)
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| {
            let len = s.chars().count();
            if !(CUE_MIN_LEN..=CUE_MAX_LEN).contains(&len) {
                return false;
            }
            let lower = s.to_lowercase();
            let first = lower.split_whitespace().next().unwrap_or("");
            ACTION_VERBS.contains(&first)
                || lower.contains("responsible")
                || lower.contains("you will")
        })
        .take(LOOSE_MAX_ITEMS)
        .map(|s| lists::truncate_ellipsis(&s, DEFAULT_MAX_ITEM_LEN))
        .collect()
}

// ── Tests ──
