use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::EnvFilter;

use registry_gate::config::{Config, LogFormat};
use registry_gate::registry::{Document, RegistryClient};

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config);

    let mut args = std::env::args().skip(1);
    let (Some(path), Some(signature)) = (args.next(), args.next()) else {
        bail!("usage: registry-gate <document.json> <signature>");
    };

    let raw = tokio::fs::read(&path)
        .await
        .with_context(|| format!("failed to read {}", path))?;
    let document = Document::from_json(&raw)
        .with_context(|| format!("{} is not a valid document", path))?;

    let client = RegistryClient::from_config(&config).context("failed to build registry client")?;
    info!(
        "Submitting {} to {} (limit {} per {:?})",
        document.doc_id,
        config.registry_url,
        client.gate().limit(),
        client.gate().window()
    );

    let response = match config.acquire_timeout() {
        Some(timeout) => client.create_document_timeout(&document, &signature, timeout).await,
        None => client.create_document(&document, &signature).await,
    }
    .context("document submission failed")?;

    info!("Registry accepted document with status {}", response.status);
    println!("{}", response.body_text());
    client.stats().log_stats();

    Ok(())
}
