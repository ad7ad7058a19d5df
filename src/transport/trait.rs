use async_trait::async_trait;
use crate::error::Result;

/// Raw outcome of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl SubmitResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[async_trait]
pub trait Submitter: Send + Sync {
    /// Deliver a signed payload once. Transport failures are errors; any
    /// HTTP status, including non-2xx, is returned as a response.
    async fn submit(&self, payload: &[u8], signature: &str) -> Result<SubmitResponse>;
}
