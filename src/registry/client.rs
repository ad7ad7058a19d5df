use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::analytics::stats::Stats;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::gate::RateGate;
use crate::http::HttpSubmitter;
use crate::registry::document::Document;
use crate::transport::{SubmitResponse, Submitter};
use crate::utils::time::{elapsed_ms, now_instant};

/// Rate-limited front for document submission.
///
/// Every call takes one slot from the gate, then delivers exactly once.
/// Slots are charged per attempt: a failed delivery is not refunded.
pub struct RegistryClient<S = HttpSubmitter> {
    gate: Arc<RateGate>,
    submitter: Arc<S>,
}

impl<S> Clone for RegistryClient<S> {
    fn clone(&self) -> Self {
        Self {
            gate: self.gate.clone(),
            submitter: self.submitter.clone(),
        }
    }
}

impl RegistryClient<HttpSubmitter> {
    pub fn from_config(config: &Config) -> Result<Self> {
        let gate = RateGate::from_config(config)?;
        let submitter = HttpSubmitter::from_config(config)?;
        Ok(Self::new(gate, submitter))
    }
}

impl<S: Submitter> RegistryClient<S> {
    pub fn new(gate: RateGate, submitter: S) -> Self {
        Self::with_shared(Arc::new(gate), Arc::new(submitter))
    }

    /// Several clients may share one gate to draw from the same quota.
    pub fn with_shared(gate: Arc<RateGate>, submitter: Arc<S>) -> Self {
        Self { gate, submitter }
    }

    pub fn gate(&self) -> &RateGate {
        &self.gate
    }

    pub fn stats(&self) -> &Stats {
        self.gate.stats()
    }

    pub async fn create_document(&self, document: &Document, signature: &str) -> Result<SubmitResponse> {
        self.create_document_until(document, signature, std::future::pending::<()>()).await
    }

    pub async fn create_document_timeout(
        &self,
        document: &Document,
        signature: &str,
        timeout: Duration,
    ) -> Result<SubmitResponse> {
        self.create_document_until(document, signature, tokio::time::sleep(timeout)).await
    }

    /// Serializes before queueing so a bad document never costs a slot.
    pub async fn create_document_until<C>(
        &self,
        document: &Document,
        signature: &str,
        cancel: C,
    ) -> Result<SubmitResponse>
    where
        C: Future<Output = ()>,
    {
        let payload = document.to_payload()?;
        self.submit_payload_until(&payload, signature, cancel).await
    }

    pub async fn submit_payload(&self, payload: &[u8], signature: &str) -> Result<SubmitResponse> {
        self.submit_payload_until(payload, signature, std::future::pending::<()>()).await
    }

    pub async fn submit_payload_until<C>(
        &self,
        payload: &[u8],
        signature: &str,
        cancel: C,
    ) -> Result<SubmitResponse>
    where
        C: Future<Output = ()>,
    {
        self.gate.acquire_until(cancel).await?;

        let start = now_instant();
        let result = self.submitter.submit(payload, signature).await;
        let stats = self.stats();
        stats.update_submit_latency(elapsed_ms(start));

        match result {
            Ok(response) if response.is_success() => {
                stats.inc_successful_submissions();
                debug!("Document accepted with status {}", response.status);
                Ok(response)
            }
            Ok(response) => {
                stats.inc_failed_submissions();
                Err(AppError::SubmissionFailed {
                    status: response.status,
                    body: response.body_text(),
                })
            }
            Err(e) => {
                stats.inc_failed_submissions();
                Err(e)
            }
        }
    }
}
