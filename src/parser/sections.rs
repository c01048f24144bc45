use std::sync::LazyLock;

use regex::Regex;

static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

/// What ended the section body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    BlankLine,
    NextHeader,
    EndOfText,
}

/// One located section. Ephemeral: lives only inside a single extractor call.
#[derive(Debug, Clone)]
pub struct SectionMatch {
    /// Index into the header-pattern list that won, 0 = most specific.
    pub pattern_index: usize,
    pub body: String,
    pub boundary: Boundary,
}

/// Find a labeled section in `text`.
///
/// `headers` are tried in order from most specific to most general; the
/// first pattern that matches wins outright, with no scoring across
/// patterns. The body runs from the end of the header match to the first
/// blank line, the start of another recognized header (`boundaries`), or
/// the end of the text. A header whose body comes up empty does not win;
/// the cascade moves on to the next pattern.
pub fn locate(text: &str, headers: &[Regex], boundaries: &[Regex]) -> Option<SectionMatch> {
    for (pattern_index, header) in headers.iter().enumerate() {
        let Some(m) = header.find(text) else {
            continue;
        };

        // Skip whitespace between the header and its content so a gap after
        // the label does not read as an immediate blank-line boundary.
        let rest = text[m.end()..].trim_start();

        let mut cut = rest.len();
        let mut boundary = Boundary::EndOfText;
        if let Some(b) = BLANK_LINE.find(rest) {
            cut = b.start();
            boundary = Boundary::BlankLine;
        }
        for re in boundaries {
            if let Some(b) = re.find(rest) {
                if b.start() < cut {
                    cut = b.start();
                    boundary = Boundary::NextHeader;
                }
            }
        }

        let body = rest[..cut].trim();
        if body.is_empty() {
            continue;
        }
        return Some(SectionMatch {
            pattern_index,
            body: body.to_string(),
            boundary,
        });
    }
    None
}

/// Compile a boundary pattern that matches the given header keywords only
/// at the start of a line (or of the section body itself).
pub fn boundary(keywords: &str) -> Regex {
    Regex::new(&format!(r"(?i)(?:^|\n)[ \t]*(?:{keywords})")).unwrap()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<Regex> {
        vec![
            Regex::new(r"(?i)key\s+responsibilities\s*:?\s*\n").unwrap(),
            Regex::new(r"(?i)\b(?:responsibilities|duties)\s*:").unwrap(),
        ]
    }

    fn bounds() -> Vec<Regex> {
        vec![boundary(r"qualifications|requirements|benefits")]
    }

    #[test]
    fn exact_header_preempts_generic_mention() {
        let text = "Our responsibilities: vary.\n\nKey Responsibilities:\nShip features.\nFix bugs.\n";
        let m = locate(text, &headers(), &bounds()).unwrap();
        assert_eq!(m.pattern_index, 0);
        assert_eq!(m.body, "Ship features.\nFix bugs.");
    }

    #[test]
    fn body_ends_at_blank_line() {
        let text = "Key Responsibilities:\nShip features.\n\nUnlabeled trailing prose.";
        let m = locate(text, &headers(), &bounds()).unwrap();
        assert_eq!(m.body, "Ship features.");
        assert_eq!(m.boundary, Boundary::BlankLine);
    }

    #[test]
    fn body_ends_at_next_recognized_header() {
        let text = "Key Responsibilities:\nShip features.\nQualifications: a degree.\n";
        let m = locate(text, &headers(), &bounds()).unwrap();
        assert_eq!(m.body, "Ship features.");
        assert_eq!(m.boundary, Boundary::NextHeader);
    }

    #[test]
    fn body_runs_to_end_of_text() {
        let text = "Key Responsibilities:\nShip features.\nFix bugs.";
        let m = locate(text, &headers(), &bounds()).unwrap();
        assert_eq!(m.body, "Ship features.\nFix bugs.");
        assert_eq!(m.boundary, Boundary::EndOfText);
    }

    #[test]
    fn blank_gap_after_header_is_not_a_boundary() {
        let text = "Key Responsibilities:\n\nShip features.\nFix bugs.\n\nBenefits: snacks.";
        let m = locate(text, &headers(), &bounds()).unwrap();
        assert_eq!(m.body, "Ship features.\nFix bugs.");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let text = "KEY RESPONSIBILITIES:\nShip features.\n";
        assert!(locate(text, &headers(), &bounds()).is_some());
    }

    #[test]
    fn header_with_no_body_does_not_match() {
        // the next recognized section starts immediately, leaving no body
        let text = "Key Responsibilities:\n\nQualifications: a degree in CS.";
        assert!(locate(text, &headers(), &bounds()).is_none());
    }

    #[test]
    fn no_header_no_match() {
        assert!(locate("Nothing labeled in here.", &headers(), &bounds()).is_none());
    }
}
