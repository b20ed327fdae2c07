use serde::{Deserialize, Serialize};

/// One rendered digest message, ready for the transactional email API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestEmail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub html: String,
}

/// Outbound transport seam; the hosted email API is an external
/// collaborator, so tests and the demo record instead of sending.
pub trait DigestSender: Send + Sync {
    fn send(&self, email: &DigestEmail) -> Result<(), SendError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("email transport unavailable: {0}")]
    Transport(String),
}
