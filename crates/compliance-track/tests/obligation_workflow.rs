//! Integration specifications for the obligation lifecycle.
//!
//! Scenarios run through the public service facade backed by an in-memory
//! repository, covering creation, partial updates, status writes, deletion,
//! and the derived overview rows.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;

    use compliance_track::compliance::obligations::{ObligationRepository, RepositoryError};
    use compliance_track::compliance::{CompanyId, Obligation, ObligationId, ObligationStatus};

    #[derive(Default)]
    pub(super) struct InMemoryRepository {
        records: Arc<Mutex<HashMap<ObligationId, Obligation>>>,
    }

    impl ObligationRepository for InMemoryRepository {
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

        fn list_for_company(
            &self,
            company: &CompanyId,
        ) -> Result<Vec<Obligation>, RepositoryError> {
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
            Ok(guard
                .values()
                .filter(|record| record.status != ObligationStatus::Completed)
                .filter(|record| record.deadline <= window_end)
                .cloned()
                .collect())
        }
    }
}

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use compliance_track::compliance::obligations::{
    ObligationDraft, ObligationService, ObligationServiceError, ObligationUpdate,
};
use compliance_track::compliance::{
    CompanyId, ObligationCategory, ObligationStatus, PenaltySeverity, Recurrence, RiskTier,
};

use common::InMemoryRepository;

fn service() -> ObligationService<InMemoryRepository> {
    ObligationService::new(Arc::new(InMemoryRepository::default()))
}

fn draft(title: &str, deadline: NaiveDate) -> ObligationDraft {
    ObligationDraft {
        title: title.to_string(),
        description: "Statutory filing".to_string(),
        category: ObligationCategory::TaxFinancial,
        deadline,
        recurrence: Recurrence::Quarterly,
        status: ObligationStatus::Pending,
        assigned_to: "Finance Team".to_string(),
        penalty_severity: PenaltySeverity::High,
        notes: None,
        owner_user_id: "user-1".to_string(),
    }
}

#[test]
fn create_mints_identity_and_timestamps() {
    let service = service();
    let company = CompanyId("co-1".to_string());
    let deadline = NaiveDate::from_ymd_opt(2026, 4, 30).expect("valid date");
    let now = Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap();

    let record = service
        .create(&company, draft("Quarterly VAT return", deadline), now)
        .expect("draft accepted");

    assert!(record.id.0.starts_with("obl-"));
    assert_eq!(record.company_id, company);
    assert_eq!(record.created_at, now);
    assert_eq!(record.updated_at, now);
    assert_eq!(record.status, ObligationStatus::Pending);
}

#[test]
fn create_rejects_blank_title_and_missing_owner() {
    let service = service();
    let company = CompanyId("co-1".to_string());
    let deadline = NaiveDate::from_ymd_opt(2026, 4, 30).expect("valid date");

    let blank = draft("   ", deadline);
    let result = service.create(&company, blank, Utc::now());
    assert!(matches!(result, Err(ObligationServiceError::Draft(_))));

    let mut unowned = draft("Quarterly VAT return", deadline);
    unowned.owner_user_id = String::new();
    let result = service.create(&company, unowned, Utc::now());
    assert!(matches!(result, Err(ObligationServiceError::Draft(_))));
}

#[test]
fn update_touches_only_supplied_fields() {
    let service = service();
    let company = CompanyId("co-1".to_string());
    let deadline = NaiveDate::from_ymd_opt(2026, 4, 30).expect("valid date");
    let created = Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap();
    let edited = Utc.with_ymd_and_hms(2026, 4, 2, 9, 0, 0).unwrap();

    let record = service
        .create(&company, draft("Quarterly VAT return", deadline), created)
        .expect("draft accepted");

    let update = ObligationUpdate {
        assigned_to: Some("Tax Advisor".to_string()),
        notes: Some(Some("extension requested".to_string())),
        ..ObligationUpdate::default()
    };
    let updated = service
        .update(&record.id, update, edited)
        .expect("update applies");

    assert_eq!(updated.title, "Quarterly VAT return");
    assert_eq!(updated.assigned_to, "Tax Advisor");
    assert_eq!(updated.notes.as_deref(), Some("extension requested"));
    assert_eq!(updated.created_at, created);
    assert_eq!(updated.updated_at, edited);
}

#[test]
fn status_accepts_any_transition() {
    let service = service();
    let company = CompanyId("co-1".to_string());
    let deadline = NaiveDate::from_ymd_opt(2026, 4, 30).expect("valid date");

    let record = service
        .create(&company, draft("Quarterly VAT return", deadline), Utc::now())
        .expect("draft accepted");

    let completed = service
        .set_status(&record.id, ObligationStatus::Completed, Utc::now())
        .expect("status writes");
    assert_eq!(completed.status, ObligationStatus::Completed);

    // No state machine: reopening a completed obligation is allowed.
    let reopened = service
        .set_status(&record.id, ObligationStatus::Pending, Utc::now())
        .expect("status writes");
    assert_eq!(reopened.status, ObligationStatus::Pending);
}

#[test]
fn delete_then_get_reports_not_found() {
    let service = service();
    let company = CompanyId("co-1".to_string());
    let deadline = NaiveDate::from_ymd_opt(2026, 4, 30).expect("valid date");

    let record = service
        .create(&company, draft("Quarterly VAT return", deadline), Utc::now())
        .expect("draft accepted");

    service.delete(&record.id).expect("delete succeeds");
    let result = service.get(&record.id);
    assert!(matches!(result, Err(ObligationServiceError::Repository(_))));
}

#[test]
fn list_is_scoped_to_the_tenant_and_deadline_ordered() {
    let service = service();
    let ours = CompanyId("co-1".to_string());
    let theirs = CompanyId("co-2".to_string());
    let now = Utc::now();

    let later = NaiveDate::from_ymd_opt(2026, 6, 30).expect("valid date");
    let sooner = NaiveDate::from_ymd_opt(2026, 5, 15).expect("valid date");

    service
        .create(&ours, draft("Annual accounts", later), now)
        .expect("draft accepted");
    service
        .create(&ours, draft("Quarterly VAT return", sooner), now)
        .expect("draft accepted");
    service
        .create(&theirs, draft("Their filing", sooner), now)
        .expect("draft accepted");

    let records = service.list(&ours).expect("list succeeds");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].deadline, sooner);
    assert_eq!(records[1].deadline, later);
    assert!(records.iter().all(|record| record.company_id == ours));
}

#[test]
fn overview_resolves_derived_fields() {
    let service = service();
    let company = CompanyId("co-1".to_string());
    let today = NaiveDate::from_ymd_opt(2026, 4, 25).expect("valid date");
    let deadline = NaiveDate::from_ymd_opt(2026, 4, 30).expect("valid date");

    service
        .create(&company, draft("Quarterly VAT return", deadline), Utc::now())
        .expect("draft accepted");

    let views = service.overview(&company, today).expect("overview builds");
    assert_eq!(views.len(), 1);
    let view = &views[0];
    assert_eq!(view.days_until_deadline, 5);
    // High severity five days out falls in the high band.
    assert_eq!(view.risk, RiskTier::High);
    assert_eq!(view.risk_label, "High Risk");
    assert_eq!(view.category_label, "Tax & Financial");
    assert_eq!(view.recurrence_label, "Quarterly");
}
