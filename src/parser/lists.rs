use std::sync::LazyLock;

use regex::Regex;

/// Single internal bullet representation used for all formatted output.
pub const BULLET: &str = "• ";
pub const ELLIPSIS: &str = "...";

pub const DEFAULT_MAX_ITEMS: usize = 10;
/// Looser tiers produce more false positives, so they get a tighter cap.
pub const LOOSE_MAX_ITEMS: usize = 8;
pub const DEFAULT_MAX_ITEM_LEN: usize = 80;

/// Length window for keyword-anchored clause extraction.
pub const CUE_MIN_LEN: usize = 15;
pub const CUE_MAX_LEN: usize = 200;

/// Mangled bullet byte sequences seen in scraped postings. Never treated as
/// list markers; stripped from item starts when a looser tier picks them up.
const MANGLED_MARKERS: &[&str] = &["â€¢", "\u{fffd}", "Â·"];

/// Clause-initial verbs that anchor tier-4 extraction.
pub const ACTION_VERBS: &[&str] = &[
    "manage", "lead", "develop", "design", "build", "create", "implement", "collaborate",
    "coordinate", "maintain", "ensure", "drive", "oversee", "deliver", "own", "support",
    "write", "review", "analyze", "optimize",
];

/// Cue phrases that mark a clause as qualification-like.
pub const QUALIFICATION_CUES: &[&str] = &[
    "experience with", "experience in", "degree in", "knowledge of", "familiarity with",
    "proficiency in", "must have", "years of experience", "ability to", "certification",
];

static BULLET_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:•|-|\*|\d+\.)[ \t]*(.+)$").unwrap());
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());

#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    pub max_items: usize,
    pub loose_max_items: usize,
    pub max_item_len: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            loose_max_items: LOOSE_MAX_ITEMS,
            max_item_len: DEFAULT_MAX_ITEM_LEN,
        }
    }
}

/// One splitting strategy in the cascade.
struct Tier {
    loose: bool,
    /// Whether a single item counts as found structure. True for tiers whose
    /// match is itself evidence (an explicit marker, a cue-anchored clause);
    /// false for splitters where one item just means nothing was split.
    single_ok: bool,
    split: fn(&str) -> Vec<String>,
}

const TIERS: &[Tier] = &[
    Tier { loose: false, single_ok: true, split: split_bullets },
    Tier { loose: false, single_ok: false, split: split_lines },
    Tier { loose: false, single_ok: false, split: split_sentences },
    Tier { loose: true, single_ok: true, split: split_cue_clauses },
    Tier { loose: true, single_ok: true, split: split_chunks },
];

/// Turn a section body into discrete items.
///
/// Tiers run in order; a tier wins when it yields two or more items, or a
/// single item that is itself evidence of structure (see `Tier::single_ok`) —
/// a lone over-long blob out of a plain splitter means the tier found no real
/// structure and the cascade continues. Winning items are capped and
/// truncated. Empty result means every tier came up dry; the caller supplies
/// its field sentinel.
pub fn format_items(body: &str, opts: &FormatOptions) -> Vec<String> {
    let body = body.trim();
    if body.is_empty() {
        return Vec::new();
    }
    for tier in TIERS {
        let items: Vec<String> = (tier.split)(body)
            .iter()
            .map(|i| clean_item(i))
            .filter(|i| !i.is_empty())
            .collect();
        let found_structure = items.len() >= 2
            || (items.len() == 1
                && (tier.single_ok || items[0].chars().count() <= opts.max_item_len));
        if !found_structure {
            continue;
        }
        let cap = if tier.loose { opts.loose_max_items } else { opts.max_items };
        return items
            .into_iter()
            .take(cap)
            .map(|i| truncate_ellipsis(&i, opts.max_item_len))
            .collect();
    }
    Vec::new()
}

/// Structure-only splitting (bullets, lines, sentences) without truncation,
/// for callers that mine the raw items further.
pub fn strict_items(body: &str) -> Vec<String> {
    let body = body.trim();
    if body.is_empty() {
        return Vec::new();
    }
    for split in [split_bullets, split_lines, split_sentences] {
        let items: Vec<String> = split(body)
            .iter()
            .map(|i| clean_item(i))
            .filter(|i| !i.is_empty())
            .collect();
        if !items.is_empty() {
            return items;
        }
    }
    Vec::new()
}

/// Prefix each item with the shared bullet marker.
pub fn bulleted(items: Vec<String>) -> Vec<String> {
    items.into_iter().map(|i| format!("{BULLET}{i}")).collect()
}

fn split_bullets(body: &str) -> Vec<String> {
    BULLET_ITEM
        .captures_iter(body)
        .map(|c| c[1].to_string())
        .collect()
}

fn split_lines(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

pub(crate) fn split_sentences(body: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut last = 0;
    for m in SENTENCE_END.find_iter(body) {
        items.push(body[last..m.start() + 1].to_string());
        last = m.end();
    }
    if last < body.len() {
        items.push(body[last..].to_string());
    }
    items
}

fn split_cue_clauses(body: &str) -> Vec<String> {
    split_sentences(body)
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| {
            let len = s.chars().count();
            if !(CUE_MIN_LEN..=CUE_MAX_LEN).contains(&len) {
                return false;
            }
            let lower = s.to_lowercase();
            let first = lower.split_whitespace().next().unwrap_or("");
            ACTION_VERBS.contains(&first) || QUALIFICATION_CUES.iter().any(|c| lower.contains(c))
        })
        .collect()
}

/// Last resort: word-boundary chunks of roughly one item width each.
fn split_chunks(body: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for word in body.split_whitespace() {
        if !current.is_empty()
            && current.chars().count() + 1 + word.chars().count() > DEFAULT_MAX_ITEM_LEN
        {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Trim an item and strip leading marker debris, mangled or otherwise.
fn clean_item(raw: &str) -> String {
    let mut s = raw.trim();
    loop {
        let before = s;
        for marker in MANGLED_MARKERS {
            if let Some(rest) = s.strip_prefix(marker) {
                s = rest.trim_start();
            }
        }
        for marker in ['•', '-', '*'] {
            if let Some(rest) = s.strip_prefix(marker) {
                s = rest.trim_start();
            }
        }
        if s == before {
            break;
        }
    }
    s.to_string()
}

/// Truncate at the nearest preceding word boundary and mark the cut.
pub fn truncate_ellipsis(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let budget = max_len.saturating_sub(ELLIPSIS.chars().count());
    let prefix: String = s.chars().take(budget).collect();
    let cut = match prefix.rfind(char::is_whitespace) {
        Some(i) => &prefix[..i],
        None => prefix.as_str(),
    };
    format!("{}{}", cut.trim_end(), ELLIPSIS)
}

// ── Tests ──
