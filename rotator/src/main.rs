//! Scheduled job entry point: fetch the configured key, then rotate it.

mod job;

use anyhow::Context;
use azure_keyvault_client::{KeyVaultConfig, VaultClient};
use keyvault_common::{init_tracing, TracingConfig};
use std::process::ExitCode;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let lookup = |name: &str| std::env::var(name).ok();
    let tracing_config = TracingConfig::from_lookup(&lookup)?;
    init_tracing(&tracing_config);

    let config = KeyVaultConfig::from_env().context("failed to load key vault configuration")?;
    info!(key = %config.key, authority = %config.authority_host, "Loaded configuration");

    let client = VaultClient::new(&config).context("failed to build key vault client")?;

    let mut stdout = std::io::stdout().lock();
    let report = job::run(&client, &config.key, &mut stdout)
        .await
        .context("failed to write job output")?;

    Ok(report.exit_code())
}
