use std::sync::LazyLock;

use regex::Regex;

use super::RoleType;

/// Cues suggesting individual-contributor work.
const IC_CUES: &[&str] = &[
    "individual contributor", "ic ", "developer", "engineer", "specialist", "analyst",
    "consultant", "designer", "writer", "contributor", "associate",
];

/// Cues suggesting people-leadership work.
const LEAD_CUES: &[&str] = &[
    "team lead", "manager", "director", "supervisor", "head of", "chief", "lead ",
    "principal", "senior", "architect", "vp", "executive", "leader",
];

/// Substrings that tip an otherwise even count toward leadership.
const TIEBREAK_TERMS: &[&str] = &["manager", "director", "lead"];

static MANAGES_TEAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:manage|lead|supervise)(?:s|ing)?\s+(?:a\s+)?team\b").unwrap()
});
static WORKS_INDEPENDENTLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:work(?:s|ing)?\s+independently|individual\s+contributor)\b").unwrap()
});

static IC_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_cues(IC_CUES));
static LEAD_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_cues(LEAD_CUES));

fn compile_cues(cues: &[&str]) -> Vec<Regex> {
    cues.iter()
        .map(|c| Regex::new(&format!(r"\b{}\b", regex::escape(c))).unwrap())
        .collect()
}

/// Tuned classification constants. Their values are empirical, not derived,
/// so they live here as overridable configuration rather than inline
/// literals.
#[derive(Debug, Clone, Copy)]
pub struct RoleTypeWeights {
    /// Added to a side's count when its explicit phrase pattern appears
    /// ("manages a team" / "works independently").
    pub explicit_cue_boost: usize,
    /// Leadership must beat IC by this ratio: IC language is the more
    /// generic register in postings, so a lead call needs a clearer
    /// majority.
    pub lead_ratio: f64,
}

impl Default for RoleTypeWeights {
    fn default() -> Self {
        Self { explicit_cue_boost: 3, lead_ratio: 1.5 }
    }
}

/// Count whole-word cue hits for each side, apply explicit-phrase boosts,
/// then decide: leadership needs a `lead_ratio` majority, IC needs a simple
/// majority, a bare leadership term breaks the remaining ties, and anything
/// else is unclear.
pub fn classify(text: &str, weights: &RoleTypeWeights) -> RoleType {
    let lower = text.to_lowercase();

    let mut ic_count = count_hits(&IC_RES, &lower);
    let mut lead_count = count_hits(&LEAD_RES, &lower);

    if MANAGES_TEAM.is_match(&lower) {
        lead_count += weights.explicit_cue_boost;
    }
    if WORKS_INDEPENDENTLY.is_match(&lower) {
        ic_count += weights.explicit_cue_boost;
    }

    if lead_count as f64 > ic_count as f64 * weights.lead_ratio {
        RoleType::TeamLeadManager
    } else if ic_count > lead_count {
        RoleType::IndividualContributor
    } else if TIEBREAK_TERMS.iter().any(|t| lower.contains(t)) {
        RoleType::TeamLeadManager
    } else {
        RoleType::Unclear
    }
}

fn count_hits(res: &[Regex], lower: &str) -> usize {
    res.iter().map(|re| re.find_iter(lower).count()).sum()
}

// ── Tests ──
