//! Features command implementation.

use super::{emit, Connection, OutputFormat};
use anyhow::{Context, Result};
use tracing::info;
use vauntico_sdk::types::{FeatureCategory, FeatureStatus};
use vauntico_sdk::FeaturesParams;

/// Runs the features command.
pub async fn run(
    connection: &Connection,
    format: OutputFormat,
    user_id: &str,
    category: Option<FeatureCategory>,
    status: Option<FeatureStatus>,
    include_coming_soon: bool,
) -> Result<()> {
    let client = connection.connect()?;
    let params = FeaturesParams {
        category,
        status,
        include_coming_soon,
    };

    let features = client
        .get_user_features(user_id, params)
        .await
        .with_context(|| format!("Failed to list features for {user_id}"))?;

    info!(
        "{} of {} features unlocked at {} level",
        features.unlocked_count, features.total_count, features.user_level
    );
    emit(client, &features, format)
}
