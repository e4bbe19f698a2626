//! User profile command implementations.

use super::{emit, Connection, OutputFormat};
use anyhow::{Context, Result};
use vauntico_sdk::UserParams;

/// Runs the me command.
pub async fn current(connection: &Connection, format: OutputFormat) -> Result<()> {
    let client = connection.connect()?;
    let user = client
        .get_current_user()
        .await
        .with_context(|| "Failed to get current user")?;
    emit(client, &user, format)
}

/// Runs the user command.
pub async fn by_id(
    connection: &Connection,
    format: OutputFormat,
    id: &str,
    include_private: bool,
) -> Result<()> {
    let client = connection.connect()?;
    let user = client
        .get_user_by_id(id, UserParams { include_private })
        .await
        .with_context(|| format!("Failed to get user {id}"))?;
    emit(client, &user, format)
}
