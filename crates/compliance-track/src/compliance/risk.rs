use chrono::NaiveDate;

use super::domain::{Obligation, ObligationStatus, PenaltySeverity, RiskTier};
use super::schedule::days_until;

/// Classify an obligation's urgency from its status, penalty severity, and
/// signed days until the deadline.
///
/// Completed obligations are always low risk. Anything overdue, whether by
/// explicit status or by a deadline already in the past, is always high risk.
/// Otherwise the severity picks a threshold band; bounds are inclusive and
/// checked from most to least urgent, so the first matching band wins.
pub fn risk_tier(
    status: ObligationStatus,
    penalty_severity: PenaltySeverity,
    days_until_deadline: i64,
) -> RiskTier {
    if status == ObligationStatus::Completed {
        return RiskTier::Low;
    }
    if status == ObligationStatus::Overdue || days_until_deadline < 0 {
        return RiskTier::High;
    }

    match penalty_severity {
        PenaltySeverity::High => {
            if days_until_deadline <= 7 {
                RiskTier::High
            } else if days_until_deadline <= 30 {
                RiskTier::Medium
            } else {
                RiskTier::Low
            }
        }
        PenaltySeverity::Medium => {
            if days_until_deadline <= 5 {
                RiskTier::High
            } else if days_until_deadline <= 14 {
                RiskTier::Medium
            } else {
                RiskTier::Low
            }
        }
        PenaltySeverity::Low => {
            if days_until_deadline <= 3 {
                RiskTier::High
            } else if days_until_deadline <= 7 {
                RiskTier::Medium
            } else {
                RiskTier::Low
            }
        }
    }
}

/// Convenience wrapper resolving the day distance from the record itself.
pub fn classify(obligation: &Obligation, today: NaiveDate) -> RiskTier {
    risk_tier(
        obligation.status,
        obligation.penalty_severity,
        days_until(obligation.deadline, today),
    )
}
