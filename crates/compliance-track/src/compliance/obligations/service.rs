use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use super::super::dashboard::CompanyDashboard;
use super::super::domain::{CompanyId, Obligation, ObligationId, ObligationStatus};
use super::domain::{DraftError, ObligationDraft, ObligationUpdate, ObligationView};
use super::repository::{ObligationRepository, RepositoryError};

/// Service wrapping the obligation store: validates drafts, mints identity
/// and timestamps, and computes the derived dashboard views.
pub struct ObligationService<R> {
    repository: Arc<R>,
}

static OBLIGATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_obligation_id() -> ObligationId {
    let id = OBLIGATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ObligationId(format!("obl-{id:06}"))
}

impl<R> ObligationService<R>
where
    R: ObligationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create an obligation for the tenant from a validated draft.
    pub fn create(
        &self,
        company: &CompanyId,
        draft: ObligationDraft,
        now: DateTime<Utc>,
    ) -> Result<Obligation, ObligationServiceError> {
        draft.validate()?;

        let record = Obligation {
            id: next_obligation_id(),
            company_id: company.clone(),
            owner_user_id: draft.owner_user_id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            deadline: draft.deadline,
            recurrence: draft.recurrence,
            status: draft.status,
            assigned_to: draft.assigned_to,
            penalty_severity: draft.penalty_severity,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Apply a partial edit. Last write wins; no conflict detection.
    pub fn update(
        &self,
        id: &ObligationId,
        update: ObligationUpdate,
        now: DateTime<Utc>,
    ) -> Result<Obligation, ObligationServiceError> {
        let mut record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        update.apply(&mut record)?;
        record.updated_at = now;
        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Direct status write. The status field is a loose enumeration, not a
    /// state machine: any transition is accepted.
    pub fn set_status(
        &self,
        id: &ObligationId,
        status: ObligationStatus,
        now: DateTime<Utc>,
    ) -> Result<Obligation, ObligationServiceError> {
        self.update(
            id,
            ObligationUpdate {
                status: Some(status),
                ..ObligationUpdate::default()
            },
            now,
        )
    }

    pub fn delete(&self, id: &ObligationId) -> Result<(), ObligationServiceError> {
        self.repository.delete(id)?;
        Ok(())
    }

    pub fn get(&self, id: &ObligationId) -> Result<Obligation, ObligationServiceError> {
        let record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// The tenant's full list, deadline ascending, as stored.
    pub fn list(&self, company: &CompanyId) -> Result<Vec<Obligation>, ObligationServiceError> {
        let records = self.repository.list_for_company(company)?;
        Ok(records)
    }

    /// The tenant's list with derived fields resolved for table rendering.
    pub fn overview(
        &self,
        company: &CompanyId,
        today: NaiveDate,
    ) -> Result<Vec<ObligationView>, ObligationServiceError> {
        let records = self.repository.list_for_company(company)?;
        Ok(records
            .iter()
            .map(|record| ObligationView::from_record(record, today))
            .collect())
    }

    /// Summary counters plus chart breakdowns, recomputed from scratch.
    pub fn dashboard(
        &self,
        company: &CompanyId,
        today: NaiveDate,
    ) -> Result<CompanyDashboard, ObligationServiceError> {
        let records = self.repository.list_for_company(company)?;
        Ok(CompanyDashboard::compute(&records, today))
    }
}

/// Error raised by the obligation service.
#[derive(Debug, thiserror::Error)]
pub enum ObligationServiceError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
