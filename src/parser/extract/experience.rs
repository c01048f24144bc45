use std::sync::LazyLock;

use regex::Regex;

pub const NOT_FOUND: &str = "Experience requirements not clearly specified";

/// Numeric requirement phrasings, tried in order. A numeric hit always beats
/// a bare keyword because it carries strictly more information.
static NUMERIC: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(\d+)\+?\s+years?\s+(?:of\s+)?experience",
        r"(?i)experience\s*(?:of|:)?\s*(\d+)\+?\s+years?",
        r"(?i)minimum\s+(?:of\s+)?(\d+)\+?\s+years?\s+(?:of\s+)?experience",
        r"(?i)at\s+least\s+(\d+)\+?\s+years?\s+(?:of\s+)?experience",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static ENTRY_LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bentry[\s-]level\b").unwrap());
static JUNIOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bjunior\b").unwrap());
static SENIOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bsenior\b").unwrap());
static EXPERIENCED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bexperienced\b").unwrap());

pub fn extract(text: &str) -> String {
    for re in NUMERIC.iter() {
        if let Some(caps) = re.captures(text) {
            return format!("{}+ years of experience required", &caps[1]);
        }
    }

    if ENTRY_LEVEL.is_match(text) {
        return "Entry-level position".to_string();
    }
    if JUNIOR.is_match(text) {
        return "Junior-level position".to_string();
    }
    if SENIOR.is_match(text) {
        return "Senior-level position".to_string();
    }
    if EXPERIENCED.is_match(text) {
        return "Experience required (unspecified years)".to_string();
    }

    NOT_FOUND.to_string()
}

// ── Tests ──
