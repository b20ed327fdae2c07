use chrono::{Duration, NaiveDate, Utc};
use compliance_track::compliance::insights::{GatewayError, InsightGateway, InsightPrompt};
use compliance_track::compliance::notifications::{DigestEmail, DigestSender, SendError};
use compliance_track::compliance::obligations::{
    ObligationRepository, RepositoryError, TenantDirectory,
};
use compliance_track::compliance::{
    CompanyId, CompanyProfile, Obligation, ObligationCategory, ObligationId, ObligationStatus,
    PenaltySeverity, Recurrence, ReminderConfig, UserProfile,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryObligationRepository {
    records: Arc<Mutex<HashMap<ObligationId, Obligation>>>,
}

impl ObligationRepository for InMemoryObligationRepository {
    fn insert(&self, record: Obligation) -> Result<Obligation, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: Obligation) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn delete(&self, id: &ObligationId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn fetch(&self, id: &ObligationId) -> Result<Option<Obligation>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_for_company(&self, company: &CompanyId) -> Result<Vec<Obligation>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<Obligation> = guard
            .values()
            .filter(|record| &record.company_id == company)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.deadline.cmp(&b.deadline).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }

    fn due_within(&self, window_end: NaiveDate) -> Result<Vec<Obligation>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<Obligation> = guard
            .values()
            .filter(|record| record.status != ObligationStatus::Completed)
            .filter(|record| record.deadline <= window_end)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.deadline.cmp(&b.deadline).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryTenantDirectory {
    companies: Arc<Mutex<HashMap<CompanyId, CompanyProfile>>>,
    users: Arc<Mutex<HashMap<String, UserProfile>>>,
    reminders: Arc<Mutex<HashMap<ObligationId, ReminderConfig>>>,
}

impl InMemoryTenantDirectory {
    pub(crate) fn upsert_company(&self, profile: CompanyProfile) {
        let mut guard = self.companies.lock().expect("directory mutex poisoned");
        guard.insert(profile.id.clone(), profile);
    }

    pub(crate) fn upsert_user(&self, profile: UserProfile) {
        let mut guard = self.users.lock().expect("directory mutex poisoned");
        guard.insert(profile.user_id.clone(), profile);
    }

    pub(crate) fn upsert_reminder(&self, config: ReminderConfig) {
        let mut guard = self.reminders.lock().expect("directory mutex poisoned");
        guard.insert(config.obligation_id.clone(), config);
    }
}

impl TenantDirectory for InMemoryTenantDirectory {
    fn company_profile(
        &self,
        company: &CompanyId,
    ) -> Result<Option<CompanyProfile>, RepositoryError> {
        let guard = self.companies.lock().expect("directory mutex poisoned");
        Ok(guard.get(company).cloned())
    }

    fn user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, RepositoryError> {
        let guard = self.users.lock().expect("directory mutex poisoned");
        Ok(guard.get(user_id).cloned())
    }

    fn reminder_config(
        &self,
        obligation: &ObligationId,
    ) -> Result<Option<ReminderConfig>, RepositoryError> {
        let guard = self.reminders.lock().expect("directory mutex poisoned");
        Ok(guard.get(obligation).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct RecordingDigestSender {
    emails: Arc<Mutex<Vec<DigestEmail>>>,
}

impl DigestSender for RecordingDigestSender {
    fn send(&self, email: &DigestEmail) -> Result<(), SendError> {
        let mut guard = self.emails.lock().expect("sender mutex poisoned");
        guard.push(email.clone());
        Ok(())
    }
}

impl RecordingDigestSender {
    pub(crate) fn emails(&self) -> Vec<DigestEmail> {
        self.emails.lock().expect("sender mutex poisoned").clone()
    }
}

/// Offline stand-in for the hosted LLM gateway; deterministic so the demo
/// and tests do not depend on network credentials.
#[derive(Default, Clone)]
pub(crate) struct OfflineInsightGateway;

impl InsightGateway for OfflineInsightGateway {
    fn generate(&self, prompt: &InsightPrompt) -> Result<String, GatewayError> {
        Ok(format!(
            "[offline insight] analyzed {} characters of sanitized prompt context",
            prompt.user.chars().count()
        ))
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Seed one demo tenant with a spread of categories, statuses, and
/// deadlines relative to `today`.
pub(crate) fn sample_obligations(company: &CompanyId, today: NaiveDate) -> Vec<Obligation> {
    let now = Utc::now();
    let build = |n: u64,
                 title: &str,
                 category: ObligationCategory,
                 offset_days: i64,
                 recurrence: Recurrence,
                 status: ObligationStatus,
                 severity: PenaltySeverity| Obligation {
        id: ObligationId(format!("demo-{n:03}")),
        company_id: company.clone(),
        owner_user_id: "user-demo".to_string(),
        title: title.to_string(),
        description: String::new(),
        category,
        deadline: today + Duration::days(offset_days),
        recurrence,
        status,
        assigned_to: "Finance Team".to_string(),
        penalty_severity: severity,
        notes: None,
        created_at: now,
        updated_at: now,
    };

    vec![
        build(
            1,
            "Quarterly VAT return",
            ObligationCategory::TaxFinancial,
            5,
            Recurrence::Quarterly,
            ObligationStatus::InProgress,
            PenaltySeverity::High,
        ),
        build(
            2,
            "Renew trade license",
            ObligationCategory::LicensesPermits,
            25,
            Recurrence::Annual,
            ObligationStatus::Pending,
            PenaltySeverity::Medium,
        ),
        build(
            3,
            "Annual safety inspection",
            ObligationCategory::RegulatoryLegal,
            -3,
            Recurrence::Annual,
            ObligationStatus::Overdue,
            PenaltySeverity::High,
        ),
        build(
            4,
            "File payroll tax",
            ObligationCategory::TaxFinancial,
            40,
            Recurrence::Monthly,
            ObligationStatus::Pending,
            PenaltySeverity::Low,
        ),
        build(
            5,
            "Data protection audit",
            ObligationCategory::RegulatoryLegal,
            12,
            Recurrence::OneTime,
            ObligationStatus::Completed,
            PenaltySeverity::Medium,
        ),
    ]
}

pub(crate) fn sample_company(company: &CompanyId) -> CompanyProfile {
    CompanyProfile {
        id: company.clone(),
        name: "Acme Trading Srl".to_string(),
        registration_number: "IT-0042-ACME".to_string(),
        industry_sector: "Wholesale".to_string(),
        contact_email: "compliance@acme.example".to_string(),
    }
}

pub(crate) fn sample_user() -> UserProfile {
    UserProfile {
        user_id: "user-demo".to_string(),
        email: "owner@acme.example".to_string(),
        full_name: "Dana Verdi".to_string(),
    }
}
