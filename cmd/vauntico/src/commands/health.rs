//! Health command implementation.

use super::{emit, Connection, OutputFormat};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Runs the health command.
pub async fn run(connection: &Connection, format: OutputFormat) -> Result<()> {
    let client = connection.connect()?;
    let health = client
        .health_check()
        .await
        .with_context(|| "Failed to check API health")?;

    if health.is_healthy() {
        info!("API is healthy ({} services)", health.services.len());
    } else {
        warn!(
            "API is {}; impaired services: {}",
            health.status,
            health.impaired_services().join(", ")
        );
    }
    emit(client, &health, format)
}
