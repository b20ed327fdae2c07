use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::super::domain::{Obligation, RiskTier};
use super::super::obligations::repository::{
    ObligationRepository, RepositoryError, TenantDirectory,
};
use super::super::risk::classify;
use super::super::schedule::days_until;
use super::email::{DigestEmail, DigestSender};

/// The store query looks 30 days out; only obligations due within 7 days or
/// already overdue make it into an email.
const QUERY_WINDOW_DAYS: i64 = 30;
const URGENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct DigestOptions {
    pub from_address: String,
    pub dashboard_url: String,
}

/// Outcome of one digest run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DigestRunSummary {
    pub sent: usize,
    /// Owners with any reminder-enabled deadline inside the query window,
    /// urgent or not.
    pub total_users: usize,
    /// Users with urgent obligations but no directory profile.
    pub skipped_users: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// One obligation line in a digest email.
#[derive(Debug, Clone)]
pub struct DigestEntry {
    pub title: String,
    pub deadline: NaiveDate,
    pub days_until: i64,
    pub risk: RiskTier,
}

impl DigestEntry {
    fn from_record(record: &Obligation, today: NaiveDate) -> Self {
        Self {
            title: record.title.clone(),
            deadline: record.deadline,
            days_until: days_until(record.deadline, today),
            risk: classify(record, today),
        }
    }
}

/// Assembles and dispatches the cross-tenant deadline reminder emails, one
/// per owning user. Invoked by an external cron trigger; there is no
/// internal scheduler.
pub struct DeadlineDigestService<R, D, S> {
    repository: Arc<R>,
    directory: Arc<D>,
    sender: Arc<S>,
    options: DigestOptions,
}

impl<R, D, S> DeadlineDigestService<R, D, S>
where
    R: ObligationRepository + 'static,
    D: TenantDirectory + 'static,
    S: DigestSender + 'static,
{
    pub fn new(repository: Arc<R>, directory: Arc<D>, sender: Arc<S>, options: DigestOptions) -> Self {
        Self {
            repository,
            directory,
            sender,
            options,
        }
    }

    pub fn run(&self, today: NaiveDate) -> Result<DigestRunSummary, RepositoryError> {
        let window_end = today + Duration::days(QUERY_WINDOW_DAYS);
        let candidates = self.repository.due_within(window_end)?;

        let mut per_user: BTreeMap<String, Vec<Obligation>> = BTreeMap::new();
        for record in candidates {
            if let Some(config) = self.directory.reminder_config(&record.id)? {
                if !config.enabled {
                    continue;
                }
            }
            per_user
                .entry(record.owner_user_id.clone())
                .or_default()
                .push(record);
        }

        // Owners are grouped over the whole query window; only the urgent
        // subset of each owner's list is mailed.
        let mut summary = DigestRunSummary {
            total_users: per_user.len(),
            ..DigestRunSummary::default()
        };

        for (user_id, records) in per_user {
            let entries: Vec<DigestEntry> = records
                .iter()
                .filter(|record| days_until(record.deadline, today) <= URGENT_WINDOW_DAYS)
                .map(|record| DigestEntry::from_record(record, today))
                .collect();
            if entries.is_empty() {
                continue;
            }

            let Some(profile) = self.directory.user_profile(&user_id)? else {
                tracing::warn!(%user_id, "no profile for digest recipient; skipping");
                summary.skipped_users += 1;
                continue;
            };

            let email = DigestEmail {
                to: profile.email.clone(),
                from: self.options.from_address.clone(),
                subject: digest_subject(entries.len()),
                html: render_digest_html(&profile.full_name, &entries, &self.options.dashboard_url),
            };

            match self.sender.send(&email) {
                Ok(()) => {
                    tracing::info!(to = %email.to, obligations = entries.len(), "digest sent");
                    summary.sent += 1;
                }
                Err(error) => {
                    tracing::error!(to = %email.to, %error, "digest send failed");
                    summary.errors.push(format!("{}: {error}", email.to));
                }
            }
        }

        Ok(summary)
    }
}

pub fn digest_subject(count: usize) -> String {
    format!(
        "{count} compliance deadline{} approaching",
        if count == 1 { "" } else { "s" }
    )
}

/// Render the per-user HTML summary table.
pub fn render_digest_html(full_name: &str, entries: &[DigestEntry], dashboard_url: &str) -> String {
    let mut rows = String::new();
    for entry in entries {
        let time_left = if entry.days_until <= 0 {
            "OVERDUE".to_string()
        } else {
            format!(
                "{} day{}",
                entry.days_until,
                if entry.days_until == 1 { "" } else { "s" }
            )
        };
        rows.push_str(&format!(
            "<tr><td>{title}</td><td>{deadline}</td><td>{time_left}</td><td>{risk}</td></tr>\n",
            title = entry.title,
            deadline = entry.deadline.format("%Y-%m-%d"),
            risk = entry.risk.label(),
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<body>\n\
         <h1>Deadline reminder</h1>\n\
         <p>Hello <strong>{full_name}</strong>,</p>\n\
         <p>You have <strong>{count}</strong> obligation{plural} needing attention:</p>\n\
         <table>\n\
         <thead><tr><th>Obligation</th><th>Deadline</th><th>Time left</th><th>Risk</th></tr></thead>\n\
         <tbody>\n{rows}</tbody>\n\
         </table>\n\
         <p><a href=\"{dashboard_url}/obligations\">Open your obligations</a></p>\n\
         <p>This email was sent automatically by ComplianceTrack.</p>\n\
         </body>\n</html>\n",
        count = entries.len(),
        plural = if entries.len() == 1 { "" } else { "s" },
    )
}
