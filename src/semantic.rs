use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::parser::extract::{skills, JobRecord, RoleType};
use crate::parser::lists::{self, FormatOptions};

/// Longest text submitted to the model; anything beyond the cap is cut
/// before the request is built.
pub const MAX_INPUT_LEN: usize = 15_000;

const DEFAULT_HOST: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "deepseek";
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Responsibilities,
    Qualifications,
    Skills,
    Experience,
    RoleType,
}

impl FieldKind {
    fn noun(self) -> &'static str {
        match self {
            FieldKind::Responsibilities => "responsibilities",
            FieldKind::Qualifications => "qualifications",
            FieldKind::Skills => "skills",
            FieldKind::Experience => "experience requirement",
            FieldKind::RoleType => "role type",
        }
    }

    fn system_prompt(self) -> &'static str {
        match self {
            FieldKind::Responsibilities => {
                "You are an expert job analyst. Extract the key job responsibilities from the \
                 provided job description. Return the responsibilities as a JSON list of strings. \
                 Each responsibility should be concise (maximum 80 characters), start with an \
                 action verb when possible, focus on one discrete task or duty, and carry no \
                 bullet points or numbering. Only return the JSON list, nothing else."
            }
            FieldKind::Qualifications => {
                "You are an expert job analyst. Extract the key qualifications, requirements and \
                 skills needed for the position from the provided job description. Return the \
                 qualifications as a JSON list of strings. Each qualification should be concise \
                 (maximum 80 characters), focus on one discrete qualification, skill, or \
                 requirement, and carry no bullet points or numbering. Only return the JSON \
                 list, nothing else."
            }
            FieldKind::Skills => {
                "You are an expert job analyst. Extract the technical and soft skills required \
                 from the provided job description. Return the skills as a JSON list of strings, \
                 one or a few words per skill, with no bullet points or numbering. Only return \
                 the JSON list, nothing else."
            }
            FieldKind::Experience => {
                "You are an expert job analyst. State the experience requirement of the provided \
                 job description in one short phrase (for example \"5+ years of experience \
                 required\" or \"Entry-level position\"). Return it as a JSON list containing \
                 that single string, nothing else."
            }
            FieldKind::RoleType => {
                "You are an expert job analyst. Classify the provided job description as either \
                 \"Individual Contributor\" or \"Team Lead/Manager\". Return a JSON list \
                 containing that single string, nothing else."
            }
        }
    }
}

/// Client for an Ollama-compatible chat endpoint. Optional collaborator: the
/// heuristic engine is the system of record, and every failure here leaves
/// the heuristic result untouched.
pub struct SemanticExtractor {
    client: reqwest::Client,
    host: String,
    model: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl SemanticExtractor {
    pub fn new(host: String, model: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build semantic extractor client")?;
        Ok(Self { client, host, model })
    }

    /// Host and model from OLLAMA_HOST / JOBPOST_LLM_MODEL, with local
    /// defaults.
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let model = std::env::var("JOBPOST_LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(host, model)
    }

    async fn chat(&self, text: &str, kind: FieldKind) -> Result<String> {
        let clipped = clip(text, MAX_INPUT_LEN);
        if clipped.len() < text.len() {
            debug!("Input truncated from {} to {} bytes", text.len(), clipped.len());
        }
        let body = json!({
            "model": self.model,
            "stream": false,
            "messages": [
                { "role": "system", "content": kind.system_prompt() },
                {
                    "role": "user",
                    "content": format!("Job description text:\n\n{clipped}\n\nExtract the {}.", kind.noun()),
                },
            ],
        });

        let resp = self
            .client
            .post(format!("{}/api/chat", self.host))
            .json(&body)
            .send()
            .await
            .context("Semantic extractor unreachable")?
            .error_for_status()
            .context("Semantic extractor returned an error status")?;

        let parsed: ChatResponse = resp.json().await.context("Malformed chat response")?;
        Ok(parsed.message.content)
    }

    pub async fn extract_list(&self, text: &str, kind: FieldKind) -> Result<Vec<String>> {
        let content = self.chat(text, kind).await?;
        parse_item_list(&content)
    }

    pub async fn extract_value(&self, text: &str, kind: FieldKind) -> Result<String> {
        let content = self.chat(text, kind).await?;
        if let Ok(items) = parse_item_list(&content) {
            return Ok(items.into_iter().next().unwrap_or_default());
        }
        // some models answer with a bare phrase instead of a list
        content
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(String::from)
            .ok_or_else(|| anyhow!("Empty response for {}", kind.noun()))
    }
}

/// Upgrade a heuristic record field by field. Any per-field failure keeps
/// the heuristic value: the model is a best-effort layer in front of the
/// cascade, never a replacement that can leave a field unextracted.
pub async fn apply_semantic(record: &mut JobRecord, text: &str, ex: &SemanticExtractor) {
    let opts = FormatOptions::default();

    match ex.extract_list(text, FieldKind::Responsibilities).await {
        Ok(items) => record.responsibilities = lists::bulleted(cap_and_trim(items, &opts)),
        Err(e) => warn!("Semantic responsibilities failed, keeping heuristic result: {e:#}"),
    }
    match ex.extract_list(text, FieldKind::Qualifications).await {
        Ok(items) => record.qualifications = lists::bulleted(cap_and_trim(items, &opts)),
        Err(e) => warn!("Semantic qualifications failed, keeping heuristic result: {e:#}"),
    }
    match ex.extract_list(text, FieldKind::Skills).await {
        Ok(items) => {
            let mut unique = skills::dedup_case_insensitive(items);
            unique.sort();
            if !unique.is_empty() {
                record.skills = unique;
            }
        }
        Err(e) => warn!("Semantic skills failed, keeping heuristic result: {e:#}"),
    }
    match ex.extract_value(text, FieldKind::Experience).await {
        Ok(value) if !value.is_empty() => record.experience = value,
        Ok(_) => {}
        Err(e) => warn!("Semantic experience failed, keeping heuristic result: {e:#}"),
    }
    match ex.extract_value(text, FieldKind::RoleType).await {
        Ok(value) => {
            if let Some(role) = map_role(&value) {
                record.role_type = role;
            }
        }
        Err(e) => warn!("Semantic role type failed, keeping heuristic result: {e:#}"),
    }
}

/// Map a free-text role answer onto the enum; anything unrecognizable keeps
/// the heuristic classification.
fn map_role(value: &str) -> Option<RoleType> {
    let lower = value.to_lowercase();
    if lower.contains("individual") {
        Some(RoleType::IndividualContributor)
    } else if lower.contains("lead") || lower.contains("manager") {
        Some(RoleType::TeamLeadManager)
    } else {
        None
    }
}

/// Locate the outermost JSON list in free-form model output. Models often
/// wrap the list in prose; everything outside the brackets is ignored.
fn parse_item_list(content: &str) -> Result<Vec<String>> {
    let start = content
        .find('[')
        .ok_or_else(|| anyhow!("No JSON list in response"))?;
    let end = content
        .rfind(']')
        .filter(|&e| e > start)
        .ok_or_else(|| anyhow!("Unterminated JSON list in response"))?;
    let items: Vec<String> =
        serde_json::from_str(&content[start..=end]).context("Response list did not parse")?;
    let items: Vec<String> = items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        bail!("Response list was empty");
    }
    Ok(items)
}

fn cap_and_trim(items: Vec<String>, opts: &FormatOptions) -> Vec<String> {
    items
        .into_iter()
        .take(opts.max_items)
        .map(|i| lists::truncate_ellipsis(i.trim(), opts.max_item_len))
        .collect()
}

/// Cut at the cap without splitting a character.
fn clip(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_parses_inside_prose() {
        let content = "Sure! Here are the items:\n[\"Ship code\", \"Fix bugs\"]\nLet me know.";
        assert_eq!(parse_item_list(content).unwrap(), vec!["Ship code", "Fix bugs"]);
    }

    #[test]
    fn missing_list_is_an_error() {
        assert!(parse_item_list("no list here").is_err());
        assert!(parse_item_list("only an opening [ bracket").is_err());
    }

    #[test]
    fn unparseable_list_is_an_error() {
        assert!(parse_item_list("[not, valid, json]").is_err());
    }

    #[test]
    fn blank_entries_are_dropped() {
        let items = parse_item_list("[\"one\", \"  \", \"two\"]").unwrap();
        assert_eq!(items, vec!["one", "two"]);
    }

    #[test]
    fn all_blank_list_is_an_error() {
        assert!(parse_item_list("[\"\", \"  \"]").is_err());
    }

    #[test]
    fn clip_respects_char_boundaries() {
        let text = "é".repeat(10_000); // 2 bytes per char
        let clipped = clip(&text, MAX_INPUT_LEN);
        assert!(clipped.len() <= MAX_INPUT_LEN);
        assert!(clipped.chars().all(|c| c == 'é'));
    }

    #[test]
    fn clip_is_identity_under_cap() {
        assert_eq!(clip("short", MAX_INPUT_LEN), "short");
    }

    #[test]
    fn role_answers_map_onto_the_enum() {
        assert_eq!(map_role("Individual Contributor"), Some(RoleType::IndividualContributor));
        assert_eq!(map_role("team lead/manager"), Some(RoleType::TeamLeadManager));
        assert_eq!(map_role("it depends"), None);
    }

    #[test]
    fn long_items_are_capped_and_truncated() {
        let opts = FormatOptions::default();
        let items = cap_and_trim(
            (0..15).map(|i| format!("item number {i} {}", "pad ".repeat(30))).collect(),
            &opts,
        );
        assert_eq!(items.len(), opts.max_items);
        assert!(items.iter().all(|i| i.chars().count() <= opts.max_item_len));
        assert!(items[0].ends_with("..."));
    }
}
