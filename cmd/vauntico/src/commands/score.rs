//! Score and calculate command implementations.

use super::{emit, Connection, OutputFormat};
use anyhow::{Context, Result};
use tracing::info;
use vauntico_sdk::types::{ScoreFactor, TrustScoreCalculationRequest};
use vauntico_sdk::TrustScoreParams;

/// Runs the score command.
pub async fn run(
    connection: &Connection,
    format: OutputFormat,
    user_id: &str,
    include_factors: bool,
    cache: bool,
) -> Result<()> {
    let client = connection.connect()?;
    let params = TrustScoreParams {
        include_factors,
        cache,
    };

    let score = client
        .get_trust_score(user_id, params)
        .await
        .with_context(|| format!("Failed to get trust score for {user_id}"))?;

    info!("Trust score for {}: {:.1} ({})", user_id, score.score, score.tier);
    emit(client, &score, format)
}

/// Runs the calculate command.
pub async fn calculate(
    connection: &Connection,
    format: OutputFormat,
    user_id: &str,
    force: bool,
    factors: Vec<ScoreFactor>,
) -> Result<()> {
    let client = connection.connect()?;

    let mut request = TrustScoreCalculationRequest::new(user_id).force(force);
    if !factors.is_empty() {
        request = request.factors(factors);
    }

    let job = client
        .calculate_trust_score(&request)
        .await
        .with_context(|| format!("Failed to start calculation for {user_id}"))?;

    info!(
        "Calculation {} is {} (estimated {}s)",
        job.calculation_id, job.status, job.estimated_time
    );
    emit(client, &job, format)
}
