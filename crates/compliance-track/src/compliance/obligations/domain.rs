use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::domain::{
    Obligation, ObligationCategory, ObligationStatus, PenaltySeverity, Recurrence, RiskTier,
};
use super::super::risk::classify;
use super::super::schedule::days_until;

/// Payload for creating an obligation. Identity, tenant, and timestamps are
/// minted by the service, never accepted from the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct ObligationDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: ObligationCategory,
    pub deadline: NaiveDate,
    pub recurrence: Recurrence,
    #[serde(default = "default_status")]
    pub status: ObligationStatus,
    #[serde(default)]
    pub assigned_to: String,
    pub penalty_severity: PenaltySeverity,
    #[serde(default)]
    pub notes: Option<String>,
    pub owner_user_id: String,
}

const fn default_status() -> ObligationStatus {
    ObligationStatus::Pending
}

impl ObligationDraft {
    pub(crate) fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        if self.owner_user_id.trim().is_empty() {
            return Err(DraftError::MissingOwner);
        }
        Ok(())
    }
}

/// Partial update; absent fields leave the stored value untouched. Status is
/// a plain settable field: any state may be written over any other.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObligationUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<ObligationCategory>,
    pub deadline: Option<NaiveDate>,
    pub recurrence: Option<Recurrence>,
    pub status: Option<ObligationStatus>,
    pub assigned_to: Option<String>,
    pub penalty_severity: Option<PenaltySeverity>,
    pub notes: Option<Option<String>>,
}

impl ObligationUpdate {
    pub(crate) fn apply(self, record: &mut Obligation) -> Result<(), DraftError> {
        if let Some(title) = self.title {
            if title.trim().is_empty() {
                return Err(DraftError::EmptyTitle);
            }
            record.title = title;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(category) = self.category {
            record.category = category;
        }
        if let Some(deadline) = self.deadline {
            record.deadline = deadline;
        }
        if let Some(recurrence) = self.recurrence {
            record.recurrence = recurrence;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(assigned_to) = self.assigned_to {
            record.assigned_to = assigned_to;
        }
        if let Some(penalty_severity) = self.penalty_severity {
            record.penalty_severity = penalty_severity;
        }
        if let Some(notes) = self.notes {
            record.notes = notes;
        }
        Ok(())
    }
}

/// Validation failures for drafts and updates.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("obligation title must not be empty")]
    EmptyTitle,
    #[error("obligation must reference an owning user")]
    MissingOwner,
}

/// One obligation enriched with the derived fields the tables render.
#[derive(Debug, Clone, Serialize)]
pub struct ObligationView {
    #[serde(flatten)]
    pub record: Obligation,
    pub days_until_deadline: i64,
    pub risk: RiskTier,
    pub risk_label: &'static str,
    pub category_label: &'static str,
    pub status_label: &'static str,
    pub recurrence_label: &'static str,
}

impl ObligationView {
    pub fn from_record(record: &Obligation, today: NaiveDate) -> Self {
        let risk = classify(record, today);
        Self {
            days_until_deadline: days_until(record.deadline, today),
            risk,
            risk_label: risk.label(),
            category_label: record.category.label(),
            status_label: record.status.label(),
            recurrence_label: record.recurrence.label(),
            record: record.clone(),
        }
    }
}
