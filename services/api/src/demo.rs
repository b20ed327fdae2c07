use crate::infra::{
    sample_company, sample_obligations, sample_user, InMemoryObligationRepository,
    InMemoryTenantDirectory, OfflineInsightGateway, RecordingDigestSender,
};
use chrono::{Local, NaiveDate, Utc};
use clap::Args;
use compliance_track::compliance::insights::{InsightKind, InsightRequest, InsightService};
use compliance_track::compliance::notifications::{DeadlineDigestService, DigestOptions};
use compliance_track::compliance::obligations::{
    export_csv, ComplianceReport, ObligationRepository, ObligationService, RiskReport,
    TenantDirectory,
};
use compliance_track::compliance::{CompanyDashboard, CompanyId, Obligation};
use compliance_track::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ObligationReportArgs {
    /// Path to a JSON array of obligation records
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Evaluation date for the report (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Emit the CSV export instead of the dashboard projection
    #[arg(long)]
    pub(crate) csv: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reporting date (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the LLM insight portion of the demo.
    #[arg(long)]
    pub(crate) skip_insight: bool,
    /// Skip the deadline digest portion of the demo.
    #[arg(long)]
    pub(crate) skip_digest: bool,
}

pub(crate) fn run_obligation_report(args: ObligationReportArgs) -> Result<(), AppError> {
    let ObligationReportArgs { input, today, csv } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let raw = std::fs::read_to_string(input)?;
    let obligations: Vec<Obligation> = serde_json::from_str(&raw)?;

    if csv {
        match export_csv(&obligations, today) {
            Ok(body) => print!("{body}"),
            Err(err) => println!("CSV projection unavailable: {err}"),
        }
        return Ok(());
    }

    let dashboard = CompanyDashboard::compute(&obligations, today);
    println!("{}", serde_json::to_string_pretty(&dashboard)?);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        skip_insight,
        skip_digest,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let company = CompanyId("co-demo".to_string());

    let repository = Arc::new(InMemoryObligationRepository::default());
    let directory = Arc::new(InMemoryTenantDirectory::default());
    directory.upsert_company(sample_company(&company));
    directory.upsert_user(sample_user());
    for record in sample_obligations(&company, today) {
        if let Err(err) = repository.insert(record) {
            println!("  Seeding failed: {err}");
            return Ok(());
        }
    }

    let service = ObligationService::new(repository.clone());

    println!("Compliance obligation demo (evaluated {today})");
    println!("\nObligation overview");
    let views = match service.overview(&company, today) {
        Ok(views) => views,
        Err(err) => {
            println!("  Overview unavailable: {err}");
            return Ok(());
        }
    };
    for view in &views {
        println!(
            "- {} | {} | due {} ({} days) | {} | {}",
            view.record.title,
            view.category_label,
            view.record.deadline,
            view.days_until_deadline,
            view.status_label,
            view.risk_label
        );
    }

    match service.dashboard(&company, today) {
        Ok(dashboard) => {
            println!("\nDashboard");
            println!(
                "- {} obligations | {} overdue | {} completed | score {}%",
                dashboard.stats.total_obligations,
                dashboard.stats.overdue_count,
                dashboard.stats.completed_count,
                dashboard.stats.compliance_score
            );
            println!(
                "- Upcoming: {} in 7 days | {} in 30 days | {} in 90 days",
                dashboard.stats.upcoming_in_7_days,
                dashboard.stats.upcoming_in_30_days,
                dashboard.stats.upcoming_in_90_days
            );
        }
        Err(err) => println!("\nDashboard unavailable: {err}"),
    }

    let records = match service.list(&company) {
        Ok(records) => records,
        Err(err) => {
            println!("  Listing unavailable: {err}");
            return Ok(());
        }
    };
    let profile = match directory.company_profile(&company) {
        Ok(profile) => profile,
        Err(err) => {
            println!("  Company profile unavailable: {err}");
            None
        }
    };

    let report = ComplianceReport::build(&records, profile.as_ref(), today);
    println!(
        "\n{}: {} total, {} completed, {} pending, {} overdue, {} high risk",
        report.title,
        report.summary.total,
        report.summary.completed,
        report.summary.pending,
        report.summary.overdue,
        report.summary.high_risk
    );

    let risk_report = RiskReport::build(&records, profile.as_ref(), today);
    println!("\n{}", risk_report.title);
    for entry in &risk_report.distribution {
        println!(
            "- {}: {} ({:.1}%)",
            entry.risk_label, entry.count, entry.percentage
        );
    }

    if !skip_insight {
        println!("\nAI insight (offline gateway)");
        let insights = InsightService::new(Arc::new(OfflineInsightGateway), 10);
        let request = InsightRequest {
            kind: InsightKind::RiskAnalysis,
            requested_by: "user-demo".to_string(),
        };
        match insights.generate(&request, &records, profile.as_ref(), Utc::now()) {
            Ok(response) => println!("- {}", response.insight),
            Err(err) => println!("- Insight unavailable: {err}"),
        }
    }

    if !skip_digest {
        println!("\nDeadline digest");
        let sender = Arc::new(RecordingDigestSender::default());
        let digest = DeadlineDigestService::new(
            repository,
            directory,
            sender.clone(),
            DigestOptions {
                from_address: "ComplianceTrack <reminders@compliancetrack.local>".to_string(),
                dashboard_url: "https://compliancetrack.local".to_string(),
            },
        );
        match digest.run(today) {
            Ok(summary) => {
                println!(
                    "- {} sent | {} recipients | {} skipped",
                    summary.sent, summary.total_users, summary.skipped_users
                );
                for email in sender.emails() {
                    println!("- To {}: {}", email.to, email.subject);
                }
            }
            Err(err) => println!("- Digest unavailable: {err}"),
        }
    }

    Ok(())
}
