//! Obligation store access: drafts, the repository seam over the remote
//! store, the service facade, HTTP routing, and export projections.

pub mod domain;
pub mod export;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{DraftError, ObligationDraft, ObligationUpdate, ObligationView};
pub use export::{
    export_csv, ComplianceReport, ReportRow, ReportSummary, RiskDistributionEntry, RiskReport,
};
pub use repository::{ObligationRepository, RepositoryError, TenantDirectory};
pub use router::{obligation_router, ObligationRoutes};
pub use service::{ObligationService, ObligationServiceError};
