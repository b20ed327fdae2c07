use serde::{Deserialize, Serialize};

use super::sanitize::{SanitizedCompany, SanitizedObligation};

/// What the caller wants generated. Unrecognized kinds deserialize to
/// `General` and fall back to the general-purpose prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    RiskAnalysis,
    ComplianceScore,
    Recommendations,
    DeadlineSummary,
    #[serde(other)]
    General,
}

/// System/user message pair handed to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightPrompt {
    pub system: String,
    pub user: String,
}

/// Assemble the prompt for one insight request. Obligations and company
/// fields must already be sanitized; this function only shapes text.
pub fn build_prompt(
    kind: InsightKind,
    obligations: &[SanitizedObligation],
    company: Option<&SanitizedCompany>,
) -> Result<InsightPrompt, serde_json::Error> {
    let obligations_json = serde_json::to_string_pretty(obligations)?;

    let prompt = match kind {
        InsightKind::RiskAnalysis => InsightPrompt {
            system: "You are an expert corporate compliance consultant. Analyze the provided \
                     obligations and produce a concise, professional risk analysis with \
                     practical, prioritized recommendations."
                .to_string(),
            user: format!(
                "Analyze these compliance obligations and produce a risk report:\n\n{obligations_json}"
            ),
        },
        InsightKind::ComplianceScore => InsightPrompt {
            system: "You are a compliance analyst. Compute a compliance score from the provided \
                     obligations, weighing deadlines, status, and penalty severity. Reply with a \
                     score from 0-100 and a short explanation."
                .to_string(),
            user: format!(
                "Compute the compliance score for these obligations:\n\n{obligations_json}"
            ),
        },
        InsightKind::Recommendations => {
            let company_json = match company {
                Some(profile) => serde_json::to_string(profile)?,
                None => "null".to_string(),
            };
            InsightPrompt {
                system: "You are a strategic compliance advisor. Provide 3-5 prioritized \
                         recommendations based on the current situation. Be concise and \
                         actionable."
                    .to_string(),
                user: format!(
                    "Based on these obligations and the company profile, generate \
                     recommendations:\n\nCompany: {company_json}\nObligations: {obligations_json}"
                ),
            }
        }
        InsightKind::DeadlineSummary => InsightPrompt {
            system: "You are a deadline management assistant. Produce an executive summary of \
                     the upcoming deadlines and the actions they require."
                .to_string(),
            user: format!(
                "Summarize the deadlines for these obligations:\n\n{obligations_json}"
            ),
        },
        InsightKind::General => {
            let company_json = match company {
                Some(profile) => serde_json::to_string(profile)?,
                None => "null".to_string(),
            };
            InsightPrompt {
                system: "You are an expert corporate compliance assistant. Provide concise, \
                         professional answers."
                    .to_string(),
                user: format!(
                    "Analyze this compliance data:\n\nCompany: {company_json}\nObligations: {obligations_json}"
                ),
            }
        }
    };

    Ok(prompt)
}
