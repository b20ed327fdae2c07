//! Deadline reminder digests: selection, grouping, HTML rendering, and the
//! transactional-email transport seam.

pub mod digest;
pub mod email;

pub use digest::{
    digest_subject, render_digest_html, DeadlineDigestService, DigestEntry, DigestOptions,
    DigestRunSummary,
};
pub use email::{DigestEmail, DigestSender, SendError};
