//! Integration specifications for the deadline digest run: candidate
//! selection, reminder opt-outs, per-owner grouping, rendering, and
//! transport failure accounting.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::{NaiveDate, TimeZone, Utc};

    use compliance_track::compliance::notifications::{DigestEmail, DigestSender, SendError};
    use compliance_track::compliance::obligations::{
        ObligationRepository, RepositoryError, TenantDirectory,
    };
    use compliance_track::compliance::{
        CompanyId, CompanyProfile, Obligation, ObligationCategory, ObligationId, ObligationStatus,
        PenaltySeverity, Recurrence, ReminderConfig, UserProfile,
    };

    #[derive(Default)]
    pub(super) struct InMemoryRepository {
        records: Arc<Mutex<HashMap<ObligationId, Obligation>>>,
    }

    impl InMemoryRepository {
        pub(super) fn seed(&self, record: Obligation) {
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            guard.insert(record.id.clone(), record);
        }
    }

    impl ObligationRepository for InMemoryRepository {
        fn insert(&self, record: Obligation) -> Result<Obligation, RepositoryError> {
            self.seed(record.clone());
            Ok(record)
        }

        fn update(&self, record: Obligation) -> Result<(), RepositoryError> {
            self.seed(record);
            Ok(())
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
            Ok(guard
                .values()
                .filter(|record| &record.company_id == company)
                .cloned()
                .collect())
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

    #[derive(Default)]
    pub(super) struct InMemoryDirectory {
        users: Arc<Mutex<HashMap<String, UserProfile>>>,
        reminders: Arc<Mutex<HashMap<ObligationId, ReminderConfig>>>,
    }

    impl InMemoryDirectory {
        pub(super) fn add_user(&self, user_id: &str, email: &str, full_name: &str) {
            let mut guard = self.users.lock().expect("directory mutex poisoned");
            guard.insert(
                user_id.to_string(),
                UserProfile {
                    user_id: user_id.to_string(),
                    email: email.to_string(),
                    full_name: full_name.to_string(),
                },
            );
        }

        pub(super) fn disable_reminders(&self, obligation: &ObligationId) {
            let mut guard = self.reminders.lock().expect("directory mutex poisoned");
            guard.insert(
                obligation.clone(),
                ReminderConfig {
                    obligation_id: obligation.clone(),
                    reminder_days: vec![7, 3, 1],
                    enabled: false,
                },
            );
        }
    }

    impl TenantDirectory for InMemoryDirectory {
        fn company_profile(
            &self,
            _company: &CompanyId,
        ) -> Result<Option<CompanyProfile>, RepositoryError> {
            Ok(None)
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

    /// Transport fake: records sent mail, optionally bouncing one address.
    #[derive(Default)]
    pub(super) struct RecordingSender {
        pub(super) sent: Arc<Mutex<Vec<DigestEmail>>>,
        pub(super) bounce: Option<String>,
    }

    impl DigestSender for RecordingSender {
        fn send(&self, email: &DigestEmail) -> Result<(), SendError> {
            if self.bounce.as_deref() == Some(email.to.as_str()) {
                return Err(SendError::Transport("mailbox unavailable".to_string()));
            }
            self.sent
                .lock()
                .expect("sender mutex poisoned")
                .push(email.clone());
            Ok(())
        }
    }

    pub(super) fn obligation(
        id: &str,
        owner: &str,
        title: &str,
        deadline: NaiveDate,
        status: ObligationStatus,
    ) -> Obligation {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
        Obligation {
            id: ObligationId(id.to_string()),
            company_id: CompanyId("co-1".to_string()),
            owner_user_id: owner.to_string(),
            title: title.to_string(),
            description: String::new(),
            category: ObligationCategory::TaxFinancial,
            deadline,
            recurrence: Recurrence::OneTime,
            status,
            assigned_to: "Finance Team".to_string(),
            penalty_severity: PenaltySeverity::High,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use compliance_track::compliance::notifications::{DeadlineDigestService, DigestOptions};
use compliance_track::compliance::{ObligationId, ObligationStatus};

use common::{obligation, InMemoryDirectory, InMemoryRepository, RecordingSender};

fn options() -> DigestOptions {
    DigestOptions {
        from_address: "ComplianceTrack <reminders@compliancetrack.local>".to_string(),
        dashboard_url: "https://app.compliancetrack.example".to_string(),
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date")
}

#[test]
fn only_urgent_obligations_make_the_email() {
    let today = today();
    let repository = Arc::new(InMemoryRepository::default());
    let directory = Arc::new(InMemoryDirectory::default());
    let sender = Arc::new(RecordingSender::default());
    directory.add_user("user-1", "dana@acme.example", "Dana Verdi");

    repository.seed(obligation(
        "obl-1",
        "user-1",
        "Due tomorrow",
        today + Duration::days(1),
        ObligationStatus::Pending,
    ));
    repository.seed(obligation(
        "obl-2",
        "user-1",
        "Already overdue",
        today - Duration::days(2),
        ObligationStatus::Overdue,
    ));
    // Inside the query window but outside the urgent one.
    repository.seed(obligation(
        "obl-3",
        "user-1",
        "Due in three weeks",
        today + Duration::days(21),
        ObligationStatus::Pending,
    ));
    repository.seed(obligation(
        "obl-4",
        "user-1",
        "Finished early",
        today + Duration::days(2),
        ObligationStatus::Completed,
    ));

    let digest =
        DeadlineDigestService::new(repository, directory, sender.clone(), options());
    let summary = digest.run(today).expect("digest runs");

    assert_eq!(summary.sent, 1);
    assert_eq!(summary.total_users, 1);
    assert_eq!(summary.skipped_users, 0);
    assert!(summary.errors.is_empty());

    let sent = sender.sent.lock().expect("sender mutex poisoned");
    assert_eq!(sent.len(), 1);
    let email = &sent[0];
    assert_eq!(email.to, "dana@acme.example");
    assert_eq!(email.subject, "2 compliance deadlines approaching");
    assert!(email.html.contains("Due tomorrow"));
    assert!(email.html.contains("Already overdue"));
    assert!(email.html.contains("OVERDUE"));
    assert!(!email.html.contains("Due in three weeks"));
    assert!(!email.html.contains("Finished early"));
    assert!(email
        .html
        .contains("https://app.compliancetrack.example/obligations"));
}

#[test]
fn disabled_reminders_keep_an_obligation_out() {
    let today = today();
    let repository = Arc::new(InMemoryRepository::default());
    let directory = Arc::new(InMemoryDirectory::default());
    let sender = Arc::new(RecordingSender::default());
    directory.add_user("user-1", "dana@acme.example", "Dana Verdi");

    repository.seed(obligation(
        "obl-1",
        "user-1",
        "Muted filing",
        today + Duration::days(1),
        ObligationStatus::Pending,
    ));
    directory.disable_reminders(&ObligationId("obl-1".to_string()));

    let digest = DeadlineDigestService::new(repository, directory, sender, options());
    let summary = digest.run(today).expect("digest runs");

    assert_eq!(summary.sent, 0);
    assert_eq!(summary.total_users, 0);
}

#[test]
fn each_owner_gets_their_own_email() {
    let today = today();
    let repository = Arc::new(InMemoryRepository::default());
    let directory = Arc::new(InMemoryDirectory::default());
    let sender = Arc::new(RecordingSender::default());
    directory.add_user("user-1", "dana@acme.example", "Dana Verdi");
    directory.add_user("user-2", "remy@acme.example", "Remy Toso");

    repository.seed(obligation(
        "obl-1",
        "user-1",
        "Dana's filing",
        today + Duration::days(3),
        ObligationStatus::Pending,
    ));
    repository.seed(obligation(
        "obl-2",
        "user-2",
        "Remy's filing",
        today + Duration::days(4),
        ObligationStatus::InProgress,
    ));

    let digest =
        DeadlineDigestService::new(repository, directory, sender.clone(), options());
    let summary = digest.run(today).expect("digest runs");

    assert_eq!(summary.sent, 2);
    assert_eq!(summary.total_users, 2);

    let sent = sender.sent.lock().expect("sender mutex poisoned");
    let dana = sent
        .iter()
        .find(|email| email.to == "dana@acme.example")
        .expect("dana's email");
    assert!(dana.html.contains("Dana's filing"));
    assert!(!dana.html.contains("Remy's filing"));
}

#[test]
fn missing_profiles_are_skipped_not_fatal() {
    let today = today();
    let repository = Arc::new(InMemoryRepository::default());
    let directory = Arc::new(InMemoryDirectory::default());
    let sender = Arc::new(RecordingSender::default());
    directory.add_user("user-1", "dana@acme.example", "Dana Verdi");

    repository.seed(obligation(
        "obl-1",
        "user-1",
        "Dana's filing",
        today + Duration::days(3),
        ObligationStatus::Pending,
    ));
    repository.seed(obligation(
        "obl-2",
        "user-ghost",
        "Orphaned filing",
        today + Duration::days(2),
        ObligationStatus::Pending,
    ));

    let digest =
        DeadlineDigestService::new(repository, directory, sender.clone(), options());
    let summary = digest.run(today).expect("digest runs");

    assert_eq!(summary.sent, 1);
    assert_eq!(summary.total_users, 2);
    assert_eq!(summary.skipped_users, 1);
    assert_eq!(sender.sent.lock().expect("sender mutex poisoned").len(), 1);
}

#[test]
fn transport_failures_are_collected_per_recipient() {
    let today = today();
    let repository = Arc::new(InMemoryRepository::default());
    let directory = Arc::new(InMemoryDirectory::default());
    let sender = Arc::new(RecordingSender {
        bounce: Some("remy@acme.example".to_string()),
        ..RecordingSender::default()
    });
    directory.add_user("user-1", "dana@acme.example", "Dana Verdi");
    directory.add_user("user-2", "remy@acme.example", "Remy Toso");

    repository.seed(obligation(
        "obl-1",
        "user-1",
        "Dana's filing",
        today + Duration::days(3),
        ObligationStatus::Pending,
    ));
    repository.seed(obligation(
        "obl-2",
        "user-2",
        "Remy's filing",
        today + Duration::days(4),
        ObligationStatus::Pending,
    ));

    let digest =
        DeadlineDigestService::new(repository, directory, sender.clone(), options());
    let summary = digest.run(today).expect("digest runs");

    assert_eq!(summary.sent, 1);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].starts_with("remy@acme.example:"));
}

#[test]
fn owners_without_urgent_work_count_but_get_no_mail() {
    let today = today();
    let repository = Arc::new(InMemoryRepository::default());
    let directory = Arc::new(InMemoryDirectory::default());
    let sender = Arc::new(RecordingSender::default());
    directory.add_user("user-1", "dana@acme.example", "Dana Verdi");
    directory.add_user("user-2", "remy@acme.example", "Remy Toso");

    repository.seed(obligation(
        "obl-1",
        "user-1",
        "Dana's filing",
        today + Duration::days(3),
        ObligationStatus::Pending,
    ));
    // Inside the query window, outside the urgent one.
    repository.seed(obligation(
        "obl-2",
        "user-2",
        "Remy's filing",
        today + Duration::days(20),
        ObligationStatus::Pending,
    ));

    let digest =
        DeadlineDigestService::new(repository, directory, sender.clone(), options());
    let summary = digest.run(today).expect("digest runs");

    assert_eq!(summary.total_users, 2);
    assert_eq!(summary.sent, 1);
    assert_eq!(summary.skipped_users, 0);
    assert_eq!(sender.sent.lock().expect("sender mutex poisoned").len(), 1);
}

#[test]
fn no_urgent_work_means_no_mail() {
    let today = today();
    let repository = Arc::new(InMemoryRepository::default());
    let directory = Arc::new(InMemoryDirectory::default());
    let sender = Arc::new(RecordingSender::default());
    directory.add_user("user-1", "dana@acme.example", "Dana Verdi");

    repository.seed(obligation(
        "obl-1",
        "user-1",
        "Comfortably distant",
        today + Duration::days(45),
        ObligationStatus::Pending,
    ));

    let digest =
        DeadlineDigestService::new(repository, directory, sender.clone(), options());
    let summary = digest.run(today).expect("digest runs");

    assert_eq!(summary.sent, 0);
    assert_eq!(summary.total_users, 0);
    assert!(sender.sent.lock().expect("sender mutex poisoned").is_empty());
}
