use std::sync::LazyLock;

use regex::Regex;

use crate::parser::markup::MarkupView;

pub const NOT_FOUND: &str = "Company Name Not Found";

const MAX_LEN: usize = 50;

static LABELED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:company|organization)(?:\s*:\s*|\s+is\s+)(.*?)(?:\.|,|\n)").unwrap()
});

/// Site metadata first, then company-flavored class/id attributes, then a
/// labeled-phrase fallback over the plain text.
pub fn extract(view: &MarkupView, text: &str) -> String {
    let mut candidates = Vec::new();
    if let Some(meta) = view.meta_property("og:site_name") {
        candidates.push(meta);
    }
    candidates.extend(view.attr_texts_containing("company"));

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

#[cfg(test)]
mod tests {
    use super::*;

    fn run(html: &str, text: &str) -> String {
        extract(&MarkupView::parse(html), text)
    }

    #[test]
    fn site_name_meta_wins() {
        let html = "<head><meta property=\"og:site_name\" content=\"Acme Corp\"></head>";
        assert_eq!(run(html, ""), "Acme Corp");
    }

    #[test]
    fn company_class_candidate() {
        assert_eq!(run("<body><span class=\"company-name\">Initech</span></body>", ""), "Initech");
    }

    #[test]
    fn overlong_candidate_is_rejected() {
        let blob = "We Are A Very Long Company Name That Keeps Going And Going Forever";
        let html = format!("<body><div id=\"company\">{blob}</div></body>");
        assert_eq!(run(&html, "The company is Initech. Join us."), "Initech");
    }

    #[test]
    fn labeled_text_fallback() {
        assert_eq!(run("<body></body>", "Our organization: Hooli, a platform firm."), "Hooli");
    }

    #[test]
    fn sentinel_when_nothing_matches() {
        assert_eq!(run("<body></body>", "no names here"), NOT_FOUND);
    }
}
