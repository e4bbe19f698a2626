//! Trends command implementation.

use super::{emit, Connection, OutputFormat};
use anyhow::{Context, Result};
use tracing::info;
use vauntico_sdk::types::{Granularity, Timeframe};
use vauntico_sdk::TrendsParams;

/// Runs the trends command.
pub async fn run(
    connection: &Connection,
    format: OutputFormat,
    user_id: &str,
    timeframe: Timeframe,
    granularity: Granularity,
    include_benchmark: bool,
) -> Result<()> {
    let client = connection.connect()?;
    let params = TrendsParams {
        timeframe,
        granularity,
        include_benchmark,
    };

    let trend = client
        .get_trust_score_trends(user_id, params)
        .await
        .with_context(|| format!("Failed to get trends for {user_id}"))?;

    info!(
        "Loaded {} {} data points over {}",
        trend.data.len(),
        granularity,
        trend.timeframe
    );
    emit(client, &trend, format)
}
