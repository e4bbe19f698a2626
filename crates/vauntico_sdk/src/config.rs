//! Client configuration and credentials.

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Url;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.vauntico.com/v1";

/// Per-request timeout used unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying an API key.
pub const API_KEY_HEADER: &str = "x-api-key";

const SDK_USER_AGENT: &str = concat!("vauntico-sdk-rust/", env!("CARGO_PKG_VERSION"));

/// The credential sent with every request.
///
/// At most one credential is active at a time.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum Credentials {
    /// Unauthenticated requests.
    #[default]
    None,
    /// Sent as `X-API-Key: <key>`.
    ApiKey(String),
    /// Sent as `Authorization: Bearer <token>`.
    BearerToken(String),
}

impl Credentials {
    /// API key credential.
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    /// Bearer token credential.
    pub fn bearer_token(token: impl Into<String>) -> Self {
        Self::BearerToken(token.into())
    }

    /// Short label for logs; never includes the secret.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ApiKey(_) => "api-key",
            Self::BearerToken(_) => "bearer-token",
        }
    }

    fn header(&self) -> Result<Option<(HeaderName, HeaderValue)>> {
        let (name, value) = match self {
            Self::None => return Ok(None),
            Self::ApiKey(key) => (HeaderName::from_static(API_KEY_HEADER), key.clone()),
            Self::BearerToken(token) => (AUTHORIZATION, format!("Bearer {token}")),
        };
        let mut value = HeaderValue::from_str(&value)
            .map_err(|_| Error::config(format!("{} contains invalid characters", self.kind())))?;
        value.set_sensitive(true);
        Ok(Some((name, value)))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::BearerToken(_) => f.write_str("BearerToken(<redacted>)"),
        }
    }
}

/// Configuration for the Vauntico client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL; endpoint paths are appended to it.
    pub base_url: String,
    /// Active credential.
    pub credentials: Credentials,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Attempt count and backoff schedule for transport failures.
    pub retry: RetryPolicy,
    /// Extra headers sent with every request, keyed by lowercase name.
    pub headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: Credentials::None,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            headers: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the credential.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how many times a request is attempted.
    #[must_use]
    pub const fn with_retries(mut self, attempts: u32) -> Self {
        self.retry.attempts = attempts;
        self
    }

    /// Replaces the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Adds an extra header, replacing any header of the same name in any case.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(header_key(name), value.into());
        self
    }

    /// Checks that the base URL and every header are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        self.parsed_base_url()?;
        self.header_map()?;
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub(crate) fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(self.base())
            .map_err(|e| Error::config(format!("invalid base URL '{}': {e}", self.base_url)))?;
        if url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "base URL '{}' cannot carry a path",
                self.base_url
            )));
        }
        Ok(url)
    }

    /// Headers sent with every request.
    ///
    /// Extra headers override the defaults but never the credential: any
    /// `Authorization` or `X-API-Key` among them is dropped so that only the
    /// active credential authenticates the request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a header name or value is invalid.
    pub fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        map.insert(USER_AGENT, HeaderValue::from_static(SDK_USER_AGENT));

        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::config(format!("invalid header name '{name}'")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| Error::config(format!("invalid value for header '{name}'")))?;
            map.insert(name, value);
        }

        map.remove(AUTHORIZATION);
        map.remove(API_KEY_HEADER);
        if let Some((name, value)) = self.credentials.header()? {
            map.insert(name, value);
        }
        Ok(map)
    }

    /// Returns a copy of this configuration with `update` applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the updated configuration is invalid.
    pub fn apply(&self, update: ConfigUpdate) -> Result<Self> {
        let mut next = self.clone();
        if let Some(base_url) = update.base_url {
            next.base_url = base_url;
        }
        if let Some(credentials) = update.credentials {
            next.credentials = credentials;
        }
        if let Some(timeout) = update.timeout {
            next.timeout = timeout;
        }
        next.headers.extend(
            update
                .headers
                .into_iter()
                .map(|(name, value)| (header_key(name), value)),
        );
        next.validate()?;
        Ok(next)
    }
}

/// Partial configuration applied to a live client.
///
/// Unset fields keep their current value; headers are merged.
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    /// New base URL.
    pub base_url: Option<String>,
    /// New credential, replacing the active one.
    pub credentials: Option<Credentials>,
    /// New per-request timeout.
    pub timeout: Option<Duration>,
    /// Headers merged into the extra headers.
    pub headers: BTreeMap<String, String>,
}

impl ConfigUpdate {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Replaces the credential.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Replaces the timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds or overrides one extra header. Names match case-insensitively.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(header_key(name), value.into());
        self
    }
}

fn header_key(name: impl Into<String>) -> String {
    let mut name = name.into();
    name.make_ascii_lowercase();
    name
}
