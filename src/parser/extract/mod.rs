pub mod company;
pub mod description;
pub mod experience;
pub mod location;
pub mod qualifications;
pub mod responsibilities;
pub mod role_type;
pub mod skills;
pub mod title;

use serde::Serialize;

use crate::parser::markup::MarkupView;
use role_type::RoleTypeWeights;

/// Individual contributor vs. people leadership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoleType {
    #[serde(rename = "Individual Contributor")]
    IndividualContributor,
    #[serde(rename = "Team Lead/Manager")]
    TeamLeadManager,
    #[serde(rename = "Role type unclear (possibly both IC and leadership aspects)")]
    Unclear,
}

impl std::fmt::Display for RoleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RoleType::IndividualContributor => "Individual Contributor",
            RoleType::TeamLeadManager => "Team Lead/Manager",
            RoleType::Unclear => "Role type unclear (possibly both IC and leadership aspects)",
        })
    }
}

/// The extraction output. Always fully populated: a field that could not be
/// determined carries its fixed sentinel value, never an absent key, so
/// consumers need no null handling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub location: String,
    pub role_type: RoleType,
    pub description_excerpt: String,
    pub responsibilities: Vec<String>,
    pub qualifications: Vec<String>,
}

/// Run every field extractor over one normalized document.
pub fn extract_all(view: &MarkupView, text: &str) -> JobRecord {
    JobRecord {
        title: title::extract(view, text),
        company: company::extract(view, text),
        skills: skills::extract(text),
        experience: experience::extract(text),
        location: location::extract(view, text),
        role_type: role_type::classify(text, &RoleTypeWeights::default()),
        description_excerpt: description::extract(text),
        responsibilities: responsibilities::extract(text),
        qualifications: qualifications::extract(text),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::process_document;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{name}.html")).unwrap()
    }

    #[test]
    fn engineering_manager_fixture() {
        let record = process_document(&fixture("engineering_manager"));

        assert_eq!(record.title, "Engineering Manager");
        assert_eq!(record.company, "CodeRound AI");
        assert_eq!(record.location, "Remote");
        assert_eq!(record.experience, "3+ years of experience required");
        assert_eq!(record.role_type, RoleType::TeamLeadManager);

        assert_eq!(record.responsibilities.len(), 8);
        assert!(record.responsibilities[0].starts_with("• Lead and mentor a team"));
        assert_eq!(record.qualifications.len(), 8);
        assert!(record.qualifications[0].starts_with("• 3+ years of experience"));

        for skill in ["python", "aws", "docker", "kubernetes"] {
            assert!(
                record.skills.iter().any(|s| s.eq_ignore_ascii_case(skill)),
                "missing {skill}: {:?}",
                record.skills
            );
        }
    }

    #[test]
    fn startup_ic_fixture() {
        let record = process_document(&fixture("startup_ic"));

        // no h1, no og metadata: labeled-phrase fallbacks carry the load
        assert_eq!(record.title, "Backend Developer");
        assert_eq!(record.company, company::NOT_FOUND);
        assert_eq!(record.location, "Remote (EU timezones)");
        assert_eq!(record.experience, "2+ years of experience required");
        assert_eq!(record.role_type, RoleType::IndividualContributor);

        assert_eq!(
            record.responsibilities,
            vec![
                "• Build internal APIs in Rust",
                "• Operate the Postgres fleet",
                "• Review designs from the platform group",
            ]
        );
        assert_eq!(
            record.qualifications,
            vec![
                "• 2+ years of experience with Rust",
                "• Knowledge of PostgreSQL and Linux",
            ]
        );
        for skill in ["rust", "go", "postgresql", "linux"] {
            assert!(
                record.skills.iter().any(|s| s.eq_ignore_ascii_case(skill)),
                "missing {skill}: {:?}",
                record.skills
            );
        }
    }

    #[test]
    fn bulleted_items_respect_length_bound() {
        let record = process_document(&fixture("engineering_manager"));
        for item in record.responsibilities.iter().chain(&record.qualifications) {
            let body = item.strip_prefix("• ").unwrap();
            assert!(body.chars().count() <= 80, "over-long item: {item:?}");
            if body.ends_with("...") {
                // a truncated item must break cleanly, not mid-word
                let stem = body.trim_end_matches("...").trim_end();
                assert!(!stem.is_empty());
            }
        }
    }

    #[test]
    fn labeled_plain_text_sections() {
        let text = "Key Responsibilities:\nLead the team.\nShip the code.\n\nQualifications & Skills:\n3+ years experience.\n";
        let record = process_document(text);
        assert_eq!(record.responsibilities, vec!["• Lead the team.", "• Ship the code."]);
        assert_eq!(record.qualifications, vec!["• 3+ years experience."]);
        assert_eq!(record.experience, "3+ years of experience required");
    }

    #[test]
    fn unlabeled_plain_text_degrades_to_sentinels() {
        let record = process_document("We are remote-first. Entry-level welcome.");
        assert_eq!(record.location, "Remote");
        assert_eq!(record.experience, "Entry-level position");
        assert_eq!(record.responsibilities, vec![responsibilities::NOT_FOUND.to_string()]);
        assert_eq!(record.qualifications, vec![qualifications::NOT_FOUND.to_string()]);
    }

    #[test]
    fn empty_document_is_all_sentinels() {
        let record = process_document("");
        assert_eq!(record.title, title::NOT_FOUND);
        assert_eq!(record.company, company::NOT_FOUND);
        assert_eq!(record.skills, vec![skills::NOT_FOUND.to_string()]);
        assert_eq!(record.experience, experience::NOT_FOUND);
        assert_eq!(record.location, location::NOT_FOUND);
        assert_eq!(record.role_type, RoleType::Unclear);
        assert_eq!(record.description_excerpt, description::NOT_FOUND);
        assert_eq!(record.responsibilities, vec![responsibilities::NOT_FOUND.to_string()]);
        assert_eq!(record.qualifications, vec![qualifications::NOT_FOUND.to_string()]);
    }

    #[test]
    fn extraction_is_deterministic() {
        let html = fixture("engineering_manager");
        assert_eq!(process_document(&html), process_document(&html));
    }

    #[test]
    fn record_serializes_with_readable_role_type() {
        let record = process_document("We are remote-first. Entry-level welcome.");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json["role_type"],
            "Role type unclear (possibly both IC and leadership aspects)"
        );
        assert_eq!(json["location"], "Remote");
    }
}
