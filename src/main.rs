//! keywheel — validated key pool bootstrap and quota status dump.
//!
//! Usage: `keywheel <config.yaml>`
//!
//! Loads the pool configuration, probes every key against the live service
//! (probe URL template from `KEYWHEEL_PROBE_URL`, `{key}` substituted),
//! fetches the current key, and prints the per-key quota status as JSON.

use std::path::Path;
use std::sync::Arc;
use tracing::info;

use keywheel::{mask_key, HttpProbeValidator, KeyRotationManager, RotatorConfig, TracingAudit};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keywheel=info".into()),
        )
        .with_target(false)
        .init();

    info!("keywheel v{}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "keywheel.yaml".to_string());
    let config = RotatorConfig::from_yaml_file(Path::new(&config_path))?;
    info!(
        pool = config.api_keys.len(),
        "configuration loaded from {}", config_path
    );

    let probe_url = std::env::var("KEYWHEEL_PROBE_URL")
        .map_err(|_| "KEYWHEEL_PROBE_URL is not set (probe URL template with {key})")?;

    let validator = HttpProbeValidator::new(probe_url);
    let manager = KeyRotationManager::new(config, &validator, Arc::new(TracingAudit)).await?;
    info!(pool = manager.pool_size(), "pool validated");

    let key = manager.get_current_key()?;
    info!(key = %mask_key(&key), "current key ready");

    println!("{}", serde_json::to_string_pretty(&manager.quota_status())?);

    Ok(())
}
