use chrono::NaiveDate;
use serde::Serialize;

use super::super::domain::{
    CompanyProfile, Obligation, ObligationCategory, ObligationId, ObligationStatus,
    PenaltySeverity,
};

pub(crate) const TITLE_MAX: usize = 200;
pub(crate) const DESCRIPTION_MAX: usize = 500;
pub(crate) const NOTES_MAX: usize = 300;
pub(crate) const COMPANY_NAME_MAX: usize = 200;
pub(crate) const INDUSTRY_MAX: usize = 100;

/// Strip prompt-injection phrasing from free text before it reaches the LLM
/// gateway, then truncate to `max_len` characters.
///
/// Matching is word-based and case-insensitive: an "ignore" optionally
/// followed by "all"/"previous"/"instructions", "system" optionally followed
/// by "prompt", a standalone "assistant", a "user:" speaker tag, and
/// backtick fences are all dropped. Closed-enum and date fields never pass
/// through here.
pub fn sanitize_text(input: &str, max_len: usize) -> String {
    let defenced = input.replace("```", " ");
    let tokens: Vec<&str> = defenced.split_whitespace().collect();

    let mut kept: Vec<&str> = Vec::with_capacity(tokens.len());
    let mut index = 0;
    while index < tokens.len() {
        let token = tokens[index];
        match normalize(token).as_str() {
            "ignore" => {
                index += 1;
                for follower in ["all", "previous", "instruction", "instructions"] {
                    if index < tokens.len() && normalize(tokens[index]) == follower {
                        index += 1;
                    }
                }
            }
            "system" => {
                index += 1;
                if index < tokens.len() && normalize(tokens[index]) == "prompt" {
                    index += 1;
                }
            }
            "assistant" => {
                index += 1;
            }
            "user" if token.trim_end().ends_with(':') => {
                index += 1;
            }
            _ => {
                kept.push(token);
                index += 1;
            }
        }
    }

    let joined = kept.join(" ");
    let truncated: String = joined.chars().take(max_len).collect();
    truncated.trim().to_string()
}

fn normalize(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_ascii_lowercase()
}

/// Obligation projection safe to embed in a prompt: free text sanitized and
/// truncated, enumerations and dates passed through untouched.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedObligation {
    pub id: ObligationId,
    pub title: String,
    pub description: String,
    pub category: ObligationCategory,
    pub deadline: NaiveDate,
    pub status: ObligationStatus,
    pub penalty_severity: PenaltySeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

pub fn sanitize_obligation(obligation: &Obligation) -> SanitizedObligation {
    SanitizedObligation {
        id: obligation.id.clone(),
        title: sanitize_text(&obligation.title, TITLE_MAX),
        description: sanitize_text(&obligation.description, DESCRIPTION_MAX),
        category: obligation.category,
        deadline: obligation.deadline,
        status: obligation.status,
        penalty_severity: obligation.penalty_severity,
        notes: obligation
            .notes
            .as_deref()
            .map(|notes| sanitize_text(notes, NOTES_MAX))
            .filter(|notes| !notes.is_empty()),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCompany {
    pub name: String,
    pub industry: String,
}

pub fn sanitize_company(company: &CompanyProfile) -> SanitizedCompany {
    SanitizedCompany {
        name: sanitize_text(&company.name, COMPANY_NAME_MAX),
        industry: sanitize_text(&company.industry_sector, INDUSTRY_MAX),
    }
}
