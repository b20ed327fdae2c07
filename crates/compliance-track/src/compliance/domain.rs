use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a compliance obligation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObligationId(pub String);

impl fmt::Display for ObligationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the tenant (company) whose obligations are isolated from
/// every other tenant's.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub String);

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObligationCategory {
    TaxFinancial,
    LicensesPermits,
    RegulatoryLegal,
}

impl ObligationCategory {
    pub const fn ordered() -> [Self; 3] {
        [Self::TaxFinancial, Self::LicensesPermits, Self::RegulatoryLegal]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TaxFinancial => "Tax & Financial",
            Self::LicensesPermits => "Licenses & Permits",
            Self::RegulatoryLegal => "Regulatory & Legal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObligationStatus {
    Pending,
    InProgress,
    Completed,
    Overdue,
}

impl ObligationStatus {
    pub const fn ordered() -> [Self; 4] {
        [Self::Pending, Self::InProgress, Self::Completed, Self::Overdue]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Overdue => "Overdue",
        }
    }
}

/// How often the underlying obligation recurs. Descriptive only: the system
/// never fabricates the next instance of a recurring obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    OneTime,
    Monthly,
    Quarterly,
    Annual,
}

impl Recurrence {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OneTime => "One-time",
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::Annual => "Annual",
        }
    }
}

/// User-assigned weight describing how serious missing the obligation would
/// be. Input to risk classification, distinct from the computed tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltySeverity {
    Low,
    Medium,
    High,
}

impl PenaltySeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Computed urgency tier. Derived on every read; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const fn ordered() -> [Self; 3] {
        [Self::Low, Self::Medium, Self::High]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
        }
    }
}

/// A trackable compliance task with a deadline, owned by exactly one tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obligation {
    pub id: ObligationId,
    pub company_id: CompanyId,
    /// User who created the record; addressed by the deadline digest.
    pub owner_user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: ObligationCategory,
    pub deadline: NaiveDate,
    pub recurrence: Recurrence,
    pub status: ObligationStatus,
    pub assigned_to: String,
    pub penalty_severity: PenaltySeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tenant profile carried through the store; consumed by insight prompts and
/// report headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub id: CompanyId,
    pub name: String,
    #[serde(default)]
    pub registration_number: String,
    #[serde(default)]
    pub industry_sector: String,
    #[serde(default)]
    pub contact_email: String,
}

/// Directory entry for a user; the digest needs an address and a greeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
}

/// Per-obligation reminder preferences. The digest honors only the enabled
/// switch; the day offsets are descriptive configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    pub obligation_id: ObligationId,
    pub reminder_days: Vec<u32>,
    pub enabled: bool,
}
