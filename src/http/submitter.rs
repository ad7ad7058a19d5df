use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::http::pool::create_http_client;
use crate::transport::{SubmitResponse, Submitter};
use crate::utils::time::{elapsed_ms, now_instant};

const SIGNATURE_HEADER: &str = "Signature";

/// Posts signed documents to the registry's create endpoint.
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: Client,
    url: Url,
}

impl HttpSubmitter {
    pub fn new(client: Client, url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| AppError::InvalidConfiguration(format!("Invalid registry URL '{}': {}", url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::InvalidConfiguration(format!(
                "Registry URL must be http(s), got '{}'",
                url.scheme()
            )));
        }

        Ok(Self { client, url })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = create_http_client(config)?;
        Self::new(client, &config.registry_url)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Submitter for HttpSubmitter {
    async fn submit(&self, payload: &[u8], signature: &str) -> Result<SubmitResponse> {
        let start = now_instant();
        let response = self.client.post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, signature)
            .body(payload.to_vec())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        debug!("Registry responded {} in {}ms", status, elapsed_ms(start));

        Ok(SubmitResponse { status, body })
    }
}
