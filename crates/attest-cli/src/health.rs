//! `attest health`: Probe the verification service.

use anyhow::Result;

use attest_verifier::VerificationClient;

use crate::config::AppConfig;

/// Execute the health subcommand. Exit code 1 when the service is unhealthy.
pub async fn run_health(config: &AppConfig) -> Result<u8> {
    let client = VerificationClient::new(config.verifier_config()?)?;
    match client.health().await {
        Ok(msg) => {
            println!("{msg}");
            Ok(0)
        }
        Err(e) => {
            println!("verifier unhealthy: {e}");
            Ok(1)
        }
    }
}
