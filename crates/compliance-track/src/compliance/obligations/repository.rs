use chrono::NaiveDate;

use super::super::domain::{
    CompanyId, CompanyProfile, Obligation, ObligationId, ReminderConfig, UserProfile,
};

/// Storage abstraction over the remote obligation store so services and
/// routers can be exercised against in-memory fakes.
///
/// Implementations scope reads to the owning tenant and resolve concurrent
/// writes last-write-wins; the service layer adds nothing on top.
pub trait ObligationRepository: Send + Sync {
    fn insert(&self, record: Obligation) -> Result<Obligation, RepositoryError>;
    fn update(&self, record: Obligation) -> Result<(), RepositoryError>;
    fn delete(&self, id: &ObligationId) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ObligationId) -> Result<Option<Obligation>, RepositoryError>;
    /// All obligations for one tenant, ordered by deadline ascending.
    fn list_for_company(&self, company: &CompanyId) -> Result<Vec<Obligation>, RepositoryError>;
    /// Across all tenants: obligations not completed whose deadline falls on
    /// or before `window_end`. Feeds the deadline digest.
    fn due_within(&self, window_end: NaiveDate) -> Result<Vec<Obligation>, RepositoryError>;
}

/// Read access to the sibling entities the store carries alongside
/// obligations: company profiles, user profiles, reminder preferences.
pub trait TenantDirectory: Send + Sync {
    fn company_profile(&self, company: &CompanyId)
        -> Result<Option<CompanyProfile>, RepositoryError>;
    fn user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, RepositoryError>;
    fn reminder_config(
        &self,
        obligation: &ObligationId,
    ) -> Result<Option<ReminderConfig>, RepositoryError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
