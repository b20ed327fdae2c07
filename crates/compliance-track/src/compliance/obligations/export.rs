use chrono::NaiveDate;
use serde::Serialize;

use super::super::domain::{CompanyProfile, Obligation, ObligationStatus, RiskTier};
use super::super::risk::classify;

/// Fixed CSV column order; consumers key on position, not header text.
const CSV_HEADER: [&str; 8] = [
    "title",
    "description",
    "category",
    "deadline",
    "recurrence",
    "status",
    "assignee",
    "risk",
];

/// Project a tenant's obligations to CSV, one row per record, computed risk
/// tier in the final column.
pub fn export_csv(obligations: &[Obligation], today: NaiveDate) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for obligation in obligations {
        writer.write_record([
            obligation.title.as_str(),
            obligation.description.as_str(),
            obligation.category.label(),
            &obligation.deadline.format("%Y-%m-%d").to_string(),
            obligation.recurrence.label(),
            obligation.status.label(),
            obligation.assigned_to.as_str(),
            classify(obligation, today).label(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// One obligation row in a report table.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub title: String,
    pub category_label: &'static str,
    pub deadline: NaiveDate,
    pub status_label: &'static str,
    pub risk_label: &'static str,
    pub assigned_to: String,
}

impl ReportRow {
    fn from_record(record: &Obligation, today: NaiveDate) -> Self {
        Self {
            title: record.title.clone(),
            category_label: record.category.label(),
            deadline: record.deadline,
            status_label: record.status.label(),
            risk_label: classify(record, today).label(),
            assigned_to: record.assigned_to.clone(),
        }
    }
}

/// Counters for the report summary block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    pub high_risk: usize,
}

/// Header/summary/table projection of a tenant's list. The document renderer
/// consuming this (PDF or otherwise) is an external collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReport {
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    pub generated_on: NaiveDate,
    pub summary: ReportSummary,
    pub rows: Vec<ReportRow>,
}

impl ComplianceReport {
    pub fn build(
        obligations: &[Obligation],
        company: Option<&CompanyProfile>,
        today: NaiveDate,
    ) -> Self {
        let count_status = |status: ObligationStatus| {
            obligations
                .iter()
                .filter(|obligation| obligation.status == status)
                .count()
        };

        let summary = ReportSummary {
            total: obligations.len(),
            completed: count_status(ObligationStatus::Completed),
            pending: count_status(ObligationStatus::Pending),
            overdue: count_status(ObligationStatus::Overdue),
            high_risk: obligations
                .iter()
                .filter(|obligation| classify(obligation, today) == RiskTier::High)
                .count(),
        };

        Self {
            title: "Compliance Report",
            company_name: company.map(|profile| profile.name.clone()),
            registration_number: company
                .map(|profile| profile.registration_number.clone())
                .filter(|number| !number.is_empty()),
            generated_on: today,
            summary,
            rows: obligations
                .iter()
                .map(|record| ReportRow::from_record(record, today))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskDistributionEntry {
    pub risk: RiskTier,
    pub risk_label: &'static str,
    pub count: usize,
    /// Share of the full list, one decimal place.
    pub percentage: f64,
}

/// Risk-focused report: tier distribution plus the high-risk detail table.
#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub generated_on: NaiveDate,
    pub distribution: Vec<RiskDistributionEntry>,
    pub high_risk: Vec<ReportRow>,
}

impl RiskReport {
    pub fn build(
        obligations: &[Obligation],
        company: Option<&CompanyProfile>,
        today: NaiveDate,
    ) -> Self {
        let denominator = obligations.len().max(1) as f64;
        let distribution = RiskTier::ordered()
            .into_iter()
            .rev()
            .map(|risk| {
                let count = obligations
                    .iter()
                    .filter(|obligation| classify(obligation, today) == risk)
                    .count();
                RiskDistributionEntry {
                    risk,
                    risk_label: risk.label(),
                    count,
                    percentage: ((count as f64 / denominator) * 1000.0).round() / 10.0,
                }
            })
            .collect();

        let high_risk = obligations
            .iter()
            .filter(|obligation| classify(obligation, today) == RiskTier::High)
            .map(|record| ReportRow::from_record(record, today))
            .collect();

        Self {
            title: "Risk Indicator Report",
            company_name: company.map(|profile| profile.name.clone()),
            generated_on: today,
            distribution,
            high_risk,
        }
    }
}
