//! Command implementations.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::time::Duration;
use vauntico_sdk::{Client, ClientConfig, Credentials};

pub mod features;
pub mod health;
pub mod score;
pub mod trends;
pub mod users;

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

/// Connection settings collected from global flags and the environment.
#[derive(Debug, Clone)]
pub struct Connection {
    pub base_url: String,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
    pub retries: u32,
    pub headers: Vec<(String, String)>,
}

impl Connection {
    fn credentials(&self) -> Credentials {
        match (&self.api_key, &self.access_token) {
            (Some(key), _) => Credentials::api_key(key),
            (None, Some(token)) => Credentials::bearer_token(token),
            (None, None) => Credentials::None,
        }
    }

    fn config(&self) -> ClientConfig {
        self.headers.iter().fold(
            ClientConfig::default()
                .with_base_url(&self.base_url)
                .with_credentials(self.credentials())
                .with_timeout(Duration::from_secs(self.timeout_secs))
                .with_retries(self.retries),
            |config, (name, value)| config.with_header(name, value),
        )
    }

    /// Builds a client for these settings.
    pub fn connect(&self) -> Result<Client> {
        Client::new(self.config()).with_context(|| "Failed to create Vauntico client")
    }
}

/// Serializes `value` in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).with_context(|| "Failed to serialize JSON output")
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).with_context(|| "Failed to serialize YAML output")
        }
    }
}

/// Writes `value` to stdout and closes the client.
pub fn emit<T: Serialize>(mut client: Client, value: &T, format: OutputFormat) -> Result<()> {
    let output = render(value, format)?;
    println!("{}", output.trim_end());
    client.close().with_context(|| "Failed to close client")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn connection() -> Connection {
        Connection {
            base_url: "http://localhost:9000/v1".to_string(),
            api_key: None,
            access_token: None,
            timeout_secs: 5,
            retries: 2,
            headers: vec![("X-Team".to_string(), "growth".to_string())],
        }
    }

    #[test]
    fn api_key_wins_over_access_token() {
        let connection = Connection {
            api_key: Some("k".to_string()),
            access_token: Some("t".to_string()),
            ..connection()
        };
        assert_eq!(connection.credentials(), Credentials::api_key("k"));
    }

    #[test]
    fn access_token_becomes_bearer_credential() {
        let connection = Connection {
            access_token: Some("t".to_string()),
            ..connection()
        };
        assert_eq!(connection.credentials(), Credentials::bearer_token("t"));
    }

    #[test]
    fn config_carries_flags() {
        let config = connection().config();
        assert_eq!(config.base_url, "http://localhost:9000/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.attempts, 2);
        assert_eq!(config.headers["x-team"], "growth");
        assert_eq!(config.credentials, Credentials::None);
    }

    #[test]
    fn invalid_base_url_fails_to_connect() {
        let connection = Connection {
            base_url: "not a url".to_string(),
            ..connection()
        };
        assert!(connection.connect().is_err());
    }

    #[test]
    fn renders_json_and_yaml() {
        let value = json!({ "status": "healthy" });
        assert_eq!(
            render(&value, OutputFormat::Json).unwrap(),
            "{\n  \"status\": \"healthy\"\n}"
        );
        assert_eq!(
            render(&value, OutputFormat::Yaml).unwrap(),
            "status: healthy\n"
        );
    }
}
