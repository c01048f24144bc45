use std::sync::LazyLock;

use regex::Regex;

use crate::parser::lists::truncate_ellipsis;

pub const NOT_FOUND: &str = "No description available";
pub const MAX_EXCERPT_LEN: usize = 200;

/// Phrasings that usually introduce the description proper; the excerpt is
/// the remainder of that line.
static STARTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)job description(?:\s*:|\s+)(.*)",
        r"(?i)about the (?:job|role|position)(?:\s*:|\s+)(.*)",
        r"(?i)what you(?:'|’)ll (?:do|be doing)(?:\s*:|\s+)(.*)",
        r"(?i)responsibilities(?:\s*:|\s+)(.*)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

pub fn extract(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return NOT_FOUND.to_string();
    }

    for re in STARTS.iter() {
        if let Some(caps) = re.captures(text) {
            let excerpt = caps[1].trim();
            if !excerpt.is_empty() {
                return truncate_ellipsis(excerpt, MAX_EXCERPT_LEN);
            }
        }
    }

    truncate_ellipsis(text, MAX_EXCERPT_LEN)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_description_start() {
        let text = "About the role: Building data pipelines all day.\nBenefits: snacks.";
        assert_eq!(extract(text), "Building data pipelines all day.");
    }

    #[test]
    fn falls_back_to_leading_text() {
        let text = "We make accounting software for florists and plumbers.";
        assert_eq!(extract(text), text);
    }

    #[test]
    fn long_text_is_truncated_with_ellipsis() {
        let text = "word ".repeat(100);
        let excerpt = extract(&text);
        assert!(excerpt.chars().count() <= MAX_EXCERPT_LEN);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn sentinel_for_empty_text() {
        assert_eq!(extract(""), NOT_FOUND);
        assert_eq!(extract("   "), NOT_FOUND);
    }
}
