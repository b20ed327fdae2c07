use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{
    Obligation, ObligationCategory, ObligationStatus, RiskTier,
};
use super::risk::classify;
use super::schedule::days_until;

/// Summary counters the dashboard cards render. Pure function of the
/// obligation list and the reporting date; recomputed on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_obligations: usize,
    pub upcoming_in_7_days: usize,
    pub upcoming_in_30_days: usize,
    pub upcoming_in_90_days: usize,
    pub overdue_count: usize,
    pub completed_count: usize,
    /// Percentage of obligations either completed or not yet late. An empty
    /// list scores 100: nothing to be non-compliant about.
    pub compliance_score: u8,
}

impl DashboardStats {
    pub fn compute(obligations: &[Obligation], today: NaiveDate) -> Self {
        let upcoming = |window: i64| {
            obligations
                .iter()
                .filter(|obligation| obligation.status != ObligationStatus::Completed)
                .filter(|obligation| {
                    let days = days_until(obligation.deadline, today);
                    days >= 0 && days <= window
                })
                .count()
        };

        let overdue_count = obligations
            .iter()
            .filter(|obligation| {
                obligation.status == ObligationStatus::Overdue
                    || (obligation.status != ObligationStatus::Completed
                        && days_until(obligation.deadline, today) < 0)
            })
            .count();

        let completed_count = obligations
            .iter()
            .filter(|obligation| obligation.status == ObligationStatus::Completed)
            .count();

        // Compliant = completed on time plus everything still pending that
        // has not slipped past its deadline.
        let compliant_count = completed_count
            + obligations
                .iter()
                .filter(|obligation| {
                    obligation.status != ObligationStatus::Completed
                        && obligation.status != ObligationStatus::Overdue
                        && days_until(obligation.deadline, today) >= 0
                })
                .count();

        let total = obligations.len();
        let compliance_score = if total > 0 {
            ((compliant_count as f64 / total as f64) * 100.0).round() as u8
        } else {
            100
        };

        Self {
            total_obligations: total,
            upcoming_in_7_days: upcoming(7),
            upcoming_in_30_days: upcoming(30),
            upcoming_in_90_days: upcoming(90),
            overdue_count,
            completed_count,
            compliance_score,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBreakdownEntry {
    pub category: ObligationCategory,
    pub category_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusBreakdownEntry {
    pub status: ObligationStatus,
    pub status_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskBreakdownEntry {
    pub risk: RiskTier,
    pub risk_label: &'static str,
    pub count: usize,
}

/// Group-by counts over the three closed enumerations, for chart rendering.
/// Zero-count entries are kept so chart axes stay stable.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardBreakdowns {
    pub by_category: Vec<CategoryBreakdownEntry>,
    pub by_status: Vec<StatusBreakdownEntry>,
    pub by_risk: Vec<RiskBreakdownEntry>,
}

impl DashboardBreakdowns {
    pub fn compute(obligations: &[Obligation], today: NaiveDate) -> Self {
        let by_category = ObligationCategory::ordered()
            .into_iter()
            .map(|category| CategoryBreakdownEntry {
                category,
                category_label: category.label(),
                count: obligations
                    .iter()
                    .filter(|obligation| obligation.category == category)
                    .count(),
            })
            .collect();

        let by_status = ObligationStatus::ordered()
            .into_iter()
            .map(|status| StatusBreakdownEntry {
                status,
                status_label: status.label(),
                count: obligations
                    .iter()
                    .filter(|obligation| obligation.status == status)
                    .count(),
            })
            .collect();

        let by_risk = RiskTier::ordered()
            .into_iter()
            .map(|risk| RiskBreakdownEntry {
                risk,
                risk_label: risk.label(),
                count: obligations
                    .iter()
                    .filter(|obligation| classify(obligation, today) == risk)
                    .count(),
            })
            .collect();

        Self {
            by_category,
            by_status,
            by_risk,
        }
    }
}

/// Everything a dashboard render needs for one tenant.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyDashboard {
    pub today: NaiveDate,
    pub stats: DashboardStats,
    pub breakdowns: DashboardBreakdowns,
}

impl CompanyDashboard {
    pub fn compute(obligations: &[Obligation], today: NaiveDate) -> Self {
        Self {
            today,
            stats: DashboardStats::compute(obligations, today),
            breakdowns: DashboardBreakdowns::compute(obligations, today),
        }
    }
}
