//! ComplianceTrack core: the obligation data model, the date-distance and
//! risk computations, dashboard aggregation, and the collaborator seams for
//! the store, the LLM gateway, and the email API.

pub mod dashboard;
pub mod domain;
pub mod insights;
pub mod notifications;
pub mod obligations;
pub mod risk;
pub mod schedule;

pub use dashboard::{CompanyDashboard, DashboardBreakdowns, DashboardStats};
pub use domain::{
    CompanyId, CompanyProfile, Obligation, ObligationCategory, ObligationId, ObligationStatus,
    PenaltySeverity, Recurrence, ReminderConfig, RiskTier, UserProfile,
};
pub use risk::{classify, risk_tier};
pub use schedule::{days_until, parse_deadline, DeadlineParseError};
