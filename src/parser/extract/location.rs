use std::sync::LazyLock;

use regex::Regex;

use crate::parser::markup::MarkupView;

pub const NOT_FOUND: &str = "Location not clearly specified";
pub const ON_SITE: &str = "On-site (location not specified)";

const MAX_LEN: usize = 100;

static LABELED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)location\s*(?::|is)?\s*(.*?)(?:\.|,|\n)",
        r"(?i)based\s+in\s+(.*?)(?:\.|,|\n)",
        r"(?i)position\s+is\s+(?:located\s+)?in\s+(.*?)(?:\.|,|\n)",
        r"(?i)job\s+location\s*(?::|is)?\s*(.*?)(?:\.|,|\n)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static REMOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bremote\b").unwrap());
static HYBRID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bhybrid\b").unwrap());
static ON_SITE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:on[\s-]site|in[\s-]office)\b").unwrap());

/// Location-flavored class/id attributes, then location metadata, then
/// labeled phrases, then bare work-arrangement keywords.
pub fn extract(view: &MarkupView, text: &str) -> String {
    let mut candidates = view.attr_texts_containing("location");
    if let Some(meta) = view.meta_property("og:location") {
        candidates.push(meta);
    }

    for cand in candidates {
        if !cand.is_empty() && cand.chars().count() < MAX_LEN {
            return cand;
        }
    }

    for re in LABELED.iter() {
        if let Some(caps) = re.captures(text) {
            let value = caps[1].trim();
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }

    if REMOTE.is_match(text) {
        return "Remote".to_string();
    }
    if HYBRID.is_match(text) {
        return "Hybrid".to_string();
    }
    if ON_SITE_RE.is_match(text) {
        return ON_SITE.to_string();
    }

    NOT_FOUND.to_string()
}

// ── Tests ──
