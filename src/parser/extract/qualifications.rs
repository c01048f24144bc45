use std::sync::LazyLock;

use regex::Regex;

use crate::parser::lists::{
    self, FormatOptions, CUE_MAX_LEN, CUE_MIN_LEN, DEFAULT_MAX_ITEM_LEN, LOOSE_MAX_ITEMS,
    QUALIFICATION_CUES,
};
use crate::parser::sections;

pub const NOT_FOUND: &str = "No specific qualifications section found in the job posting.";

static HEADERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(
            r"(?i)(?:qualifications\s*(?:&|and)?\s*skills|skills\s*(?:&|and)?\s*qualifications)\s*:?\s*\n",
        )
        .unwrap(),
        Regex::new(
            r"(?i)\b(?:qualifications|requirements|skills needed|what we(?:'|’)re looking for|who you are)\s*:",
        )
        .unwrap(),
        Regex::new(r"(?i)\b(?:qualifications|requirements)\b").unwrap(),
    ]
});

static BOUNDARIES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![sections::boundary(
        r"responsibilities|about|apply|benefits|company|compensation|location",
    )]
});

/// Bare keywords that mark a sentence as qualification-like in the
/// whole-text fallback scan.
const FALLBACK_KEYWORDS: &[&str] = &["required", "qualification", "degree"];

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
            QUALIFICATION_CUES.iter().any(|c| lower.contains(c))
                || FALLBACK_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .take(LOOSE_MAX_ITEMS)
        .map(|s| lists::truncate_ellipsis(&s, DEFAULT_MAX_ITEM_LEN))
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_labeled_section() {
        let text = "Key Responsibilities:\nLead the team.\nShip the code.\n\nQualifications & Skills:\n3+ years experience.\n";
        assert_eq!(extract(text), vec!["• 3+ years experience."]);
    }

    #[test]
    fn generic_header_fallback() {
        let text = "Requirements:\nBachelor's degree in CS.\nStrong SQL and schema design.";
        assert_eq!(
            extract(text),
            vec!["• Bachelor's degree in CS.", "• Strong SQL and schema design."]
        );
    }

    #[test]
    fn whole_text_clause_scan() {
        let text = "Candidates must have a background in statistics to apply here.";
        assert_eq!(
            extract(text),
            vec!["• Candidates must have a background in statistics to apply here."]
        );
    }

    #[test]
    fn sentinel_when_nothing_matches() {
        let text = "We are remote-first. Entry-level welcome.";
        assert_eq!(extract(text), vec![NOT_FOUND.to_string()]);
    }
}
