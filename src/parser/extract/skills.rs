use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::parser::{lists, sections};

pub const NOT_FOUND: &str = "No specific skills identified";

/// Fixed domain vocabulary: languages, platforms, tooling, soft skills.
pub const SKILL_VOCABULARY: &[&str] = &[
    "python", "javascript", "java", "c++", "c#", "ruby", "php", "sql", "nosql",
    "mongodb", "postgresql", "mysql", "oracle", "aws", "azure", "gcp", "docker",
    "kubernetes", "git", "terraform", "ansible", "jenkins", "ci/cd", "agile",
    "scrum", "react", "angular", "vue", "node.js", "django", "flask", "spring",
    "express", "html", "css", "sass", "less", "typescript", "jquery", "rest api",
    "graphql", "machine learning", "ai", "data science", "big data", "hadoop",
    "spark", "tableau", "power bi", "excel", "linux", "windows", "macos",
    "networking", "security", "devops", "sre", "product management", "swift",
    "kotlin", "rust", "go", "scala", "perl", "bash", "powershell", "r",
    "data analysis", "statistics", "jira", "confluence", "figma", "sketch",
    "adobe", "photoshop", "illustrator", "xd", "indesign", "marketing", "seo",
    "analytics", "leadership", "management", "communication", "problem-solving",
    "teamwork", "creativity", "critical thinking", "frontend", "backend", "fullstack",
];

/// Function words that the shape-based miner keeps dredging up.
const STOPLIST: &[&str] = &[
    "the", "and", "for", "with", "using", "have", "has", "had", "our", "that", "this",
];

static VOCAB_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    SKILL_VOCABULARY.iter().map(|term| Regex::new(&bounded(term)).unwrap()).collect()
});

/// Shape-based novel-token patterns: capitalized phrases, "X++"/"X#" tokens,
/// ".js"/".NET" tokens. No trailing `\b`: terms ending in non-word
/// characters can never satisfy one.
static SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:[A-Z][A-Za-z0-9]*(?:\s[A-Z][A-Za-z0-9]*)*|[A-Za-z0-9]+\+\+|[A-Za-z0-9]+#|[a-z][A-Za-z0-9]+(?:\.js|\.NET))",
    )
    .unwrap()
});

/// Cue phrases whose object is usually a skill.
static CUE_CAPTURES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"experience (?:with|in|using) ([^,.;]+)",
        r"knowledge of ([^,.;]+)",
        r"proficiency in ([^,.;]+)",
        r"familiarity with ([^,.;]+)",
        r"expertise in ([^,.;]+)",
        r"understanding of ([^,.;]+)",
        r"skilled in ([^,.;]+)",
        r"proficient in ([^,.;]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static CONJ_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+and\s+|,\s*").unwrap());

static SKILL_SECTION_HEADERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![Regex::new(
        r"(?i)\b(?:requirements|qualifications|skills needed|what you(?:'|’)ll need|what you need|technical skills|technical requirements|skills)\s*:",
    )
    .unwrap()]
});

static EXPERIENCE_SECTION_HEADERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![Regex::new(r"(?i)\b(?:experience|expertise|proficiency)\s*:").unwrap()]
});

static SECTION_BOUNDARIES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![sections::boundary(
        r"responsibilities|about the role|about us|what we offer|benefits",
    )]
});

/// Whole-word pattern for a vocabulary term: `\b` only against word-character
/// term edges, so `c++`, `c#` and `ci/cd` are matchable.
fn bounded(term: &str) -> String {
    let escaped = regex::escape(&term.to_lowercase());
    let lead = if term.starts_with(|c: char| c.is_alphanumeric()) { r"\b" } else { "" };
    let trail = if term.ends_with(|c: char| c.is_alphanumeric()) { r"\b" } else { "" };
    format!("{lead}{escaped}{trail}")
}

/// Two passes, unioned: a whole-text vocabulary scan, then section-based
/// mining of requirement/skill-like sections (vocabulary recheck plus
/// shape- and cue-based novel-token extraction). Output is deduplicated
/// case-insensitively (first casing wins) and sorted.
pub fn extract(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let lower = text.to_lowercase();

    for (term, re) in SKILL_VOCABULARY.iter().zip(VOCAB_RES.iter()) {
        if re.is_match(&lower) {
            found.push((*term).to_string());
        }
    }

    for headers in [&*SKILL_SECTION_HEADERS, &*EXPERIENCE_SECTION_HEADERS] {
        if let Some(sec) = sections::locate(text, headers, &SECTION_BOUNDARIES) {
            mine_section(&sec.body, &mut found);
        }
    }

    let mut unique = dedup_case_insensitive(found);
    if unique.is_empty() {
        return vec![NOT_FOUND.to_string()];
    }
    unique.sort();
    unique
}

fn mine_section(body: &str, found: &mut Vec<String>) {
    for item in lists::strict_items(body) {
        let item_lower = item.to_lowercase();

        for (term, re) in SKILL_VOCABULARY.iter().zip(VOCAB_RES.iter()) {
            if re.is_match(&item_lower) {
                found.push((*term).to_string());
            }
        }

        for m in SHAPE.find_iter(&item) {
            let cand = m.as_str().trim();
            if cand.chars().count() > 2 && !STOPLIST.contains(&cand.to_lowercase().as_str()) {
                found.push(cand.to_string());
            }
        }

        for re in CUE_CAPTURES.iter() {
            for caps in re.captures_iter(&item_lower) {
                for part in CONJ_SPLIT.split(&caps[1]) {
                    let part = part.trim();
                    if part.chars().count() > 2 {
                        found.push(part.to_string());
                    }
                }
            }
        }
    }
}

pub(crate) fn dedup_case_insensitive(found: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for skill in found {
        if seen.insert(skill.to_lowercase()) {
            unique.push(skill);
        }
    }
    unique
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_whole_word_scan() {
        let skills = extract("We write Python services on AWS with Docker.");
        assert!(skills.contains(&"python".to_string()));
        assert!(skills.contains(&"aws".to_string()));
        assert!(skills.contains(&"docker".to_string()));
    }

    #[test]
    fn non_word_edged_terms_match() {
        let skills = extract("Daily work in C++ and C# with CI/CD pipelines.");
        assert!(skills.contains(&"c++".to_string()));
        assert!(skills.contains(&"c#".to_string()));
        assert!(skills.contains(&"ci/cd".to_string()));
    }

    #[test]
    fn substring_hits_do_not_count() {
        // "java" must not fire inside "javascript"
        let skills = extract("We are a JavaScript shop.");
        assert!(skills.contains(&"javascript".to_string()));
        assert!(!skills.contains(&"java".to_string()));
    }

    #[test]
    fn mixed_casing_collapses_to_one_entry() {
        let skills = extract("Requirements:\nPython on the backend. We love python here.");
        let hits: Vec<_> = skills.iter().filter(|s| s.eq_ignore_ascii_case("python")).collect();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn cue_phrase_mining_splits_conjunctions() {
        let skills = extract("Requirements:\nProficiency in Terraform and Packer.");
        assert!(skills.contains(&"terraform".to_string()));
        assert!(skills.iter().any(|s| s.eq_ignore_ascii_case("packer")), "got {skills:?}");
    }

    #[test]
    fn novel_shape_tokens_are_mined() {
        let skills = extract("Requirements:\nStrong next.js background.\nKubernetes a plus.");
        assert!(skills.iter().any(|s| s.eq_ignore_ascii_case("next.js")), "got {skills:?}");
    }

    #[test]
    fn output_is_sorted() {
        let skills = extract("We use rust, go, python and docker daily.");
        let mut sorted = skills.clone();
        sorted.sort();
        assert_eq!(skills, sorted);
    }

    #[test]
    fn sentinel_when_nothing_found() {
        assert_eq!(extract("Nothing technical here."), vec![NOT_FOUND.to_string()]);
    }
}
