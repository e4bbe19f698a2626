//! Vauntico API client.

use crate::config::{ClientConfig, ConfigUpdate};
use crate::error::{Error, Result};
use crate::request::Request;
use crate::types::{
    FeatureCategory, FeatureStatus, FeaturesResponse, Granularity, HealthCheck, SuccessEnvelope,
    Timeframe, TrendResponse, TrustScore, TrustScoreCalculation, TrustScoreCalculationRequest,
    User,
};
use reqwest::header::HeaderMap;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info};

/// Options for [`Client::get_trust_score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustScoreParams {
    /// Include the factor breakdown.
    pub include_factors: bool,
    /// Allow a cached score.
    pub cache: bool,
}

impl Default for TrustScoreParams {
    fn default() -> Self {
        Self {
            include_factors: true,
            cache: true,
        }
    }
}

/// Options for [`Client::get_trust_score_trends`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendsParams {
    /// Window to cover.
    pub timeframe: Timeframe,
    /// Bucket size.
    pub granularity: Granularity,
    /// Include the platform benchmark series.
    pub include_benchmark: bool,
}

impl Default for TrendsParams {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::default(),
            granularity: Granularity::default(),
            include_benchmark: true,
        }
    }
}

/// Options for [`Client::get_user_features`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturesParams {
    /// Only features in this category.
    pub category: Option<FeatureCategory>,
    /// Only features with this status.
    pub status: Option<FeatureStatus>,
    /// Include announced features.
    pub include_coming_soon: bool,
}

impl Default for FeaturesParams {
    fn default() -> Self {
        Self {
            category: None,
            status: None,
            include_coming_soon: true,
        }
    }
}

/// Options for [`Client::get_user_by_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserParams {
    /// Include private profile fields.
    pub include_private: bool,
}

/// Async client for the Vauntico API.
///
/// Every operation retries transport failures with exponential backoff and
/// reports everything else through [`Error`]. Concurrent calls share one
/// connection pool.
pub struct Client {
    http: Option<reqwest::Client>,
    config: ClientConfig,
    headers: HeaderMap,
}

impl Client {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the base URL or a header is invalid, or
    /// the HTTP client cannot be initialised.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let headers = config.header_map()?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::config(format!("failed to initialise HTTP client: {e}")))?;

        info!(
            base_url = %config.base_url,
            credentials = config.credentials.kind(),
            "Created Vauntico client"
        );

        Ok(Self {
            http: Some(http),
            config,
            headers,
        })
    }

    /// Current configuration.
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Headers sent with every request, credential included.
    pub const fn default_headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Whether [`close`](Self::close) has been called.
    pub const fn is_closed(&self) -> bool {
        self.http.is_none()
    }

    /// Applies a partial configuration update.
    ///
    /// Replacing the credential removes the previous auth header, so only
    /// one credential is ever active.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] on a closed client and [`Error::Config`] if
    /// the result is invalid; the current configuration is kept in both cases.
    pub fn update_config(&mut self, update: ConfigUpdate) -> Result<()> {
        if self.is_closed() {
            return Err(Error::Closed);
        }

        let next = self.config.apply(update)?;
        let headers = next.header_map()?;

        if next.credentials.kind() != self.config.credentials.kind() {
            info!(
                from = self.config.credentials.kind(),
                to = next.credentials.kind(),
                "Switched credentials"
            );
        }
        debug!(base_url = %next.base_url, timeout = ?next.timeout, "Updated client configuration");

        self.config = next;
        self.headers = headers;
        Ok(())
    }

    /// Releases the connection pool. The client cannot be reopened.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the client was already closed.
    pub fn close(&mut self) -> Result<()> {
        match self.http.take() {
            Some(_) => {
                info!("Closed Vauntico client");
                Ok(())
            }
            None => Err(Error::Closed),
        }
    }

    /// Executes `request` and returns the raw JSON body.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the last attempt.
    pub async fn execute(&self, request: &Request) -> Result<Value> {
        let http = self.http.as_ref().ok_or(Error::Closed)?;
        let url = request.url(self.config.base())?;

        self.config
            .retry
            .run(|attempt| self.send(http, request, url.clone(), attempt))
            .await
    }

    async fn send(
        &self,
        http: &reqwest::Client,
        request: &Request,
        url: Url,
        attempt: u32,
    ) -> Result<Value> {
        debug!(method = %request.method(), %url, attempt = attempt + 1, "Sending request");
        let started = Instant::now();

        let mut builder = http
            .request(request.method().clone(), url)
            .headers(self.headers.clone())
            .timeout(self.config.timeout);
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| Error::from_transport(&e))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::from_transport(&e))?;

        debug!(
            status = status.as_u16(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            bytes = body.len(),
            "Received response"
        );

        if status.as_u16() >= 400 {
            return Err(Error::from_response(status, &headers, &body));
        }

        serde_json::from_slice(&body)
            .map_err(|e| Error::unknown(format!("response body is not JSON: {e}")))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let payload = self.execute(&request).await?;
        decode_data(payload)
    }

    /// Gets a user's trust score.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed.
    pub async fn get_trust_score(
        &self,
        user_id: &str,
        params: TrustScoreParams,
    ) -> Result<TrustScore> {
        self.fetch(
            Request::get("/dashboard/trustscore")
                .query("userId", user_id)
                .query("includeFactors", params.include_factors)
                .query("cache", params.cache),
        )
        .await
    }

    /// Triggers a trust score calculation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed.
    pub async fn calculate_trust_score(
        &self,
        request: &TrustScoreCalculationRequest,
    ) -> Result<TrustScoreCalculation> {
        self.fetch(Request::post("/dashboard/trustscore").json(request)?)
            .await
    }

    /// Gets a user's trust score history.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed.
    pub async fn get_trust_score_trends(
        &self,
        user_id: &str,
        params: TrendsParams,
    ) -> Result<TrendResponse> {
        self.fetch(
            Request::get("/dashboard/trend")
                .query("userId", user_id)
                .query("timeframe", params.timeframe)
                .query("granularity", params.granularity)
                .query("includeBenchmark", params.include_benchmark),
        )
        .await
    }

    /// Lists the sacred features available to a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed.
    pub async fn get_user_features(
        &self,
        user_id: &str,
        params: FeaturesParams,
    ) -> Result<FeaturesResponse> {
        self.fetch(
            Request::get("/dashboard/features")
                .query("userId", user_id)
                .query("includeComingSoon", params.include_coming_soon)
                .query_opt("category", params.category)
                .query_opt("status", params.status),
        )
        .await
    }

    /// Gets the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed.
    pub async fn get_current_user(&self) -> Result<User> {
        self.fetch(Request::get("/users/me")).await
    }

    /// Gets a user's profile by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed.
    pub async fn get_user_by_id(&self, user_id: &str, params: UserParams) -> Result<User> {
        self.fetch(
            Request::get("/users")
                .segment(user_id)
                .query("includePrivate", params.include_private),
        )
        .await
    }

    /// Checks system health.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed.
    pub async fn health_check(&self) -> Result<HealthCheck> {
        self.fetch(Request::get("/health")).await
    }
}

/// Decodes a success envelope, then its `data` into `T`.
fn decode_data<T: DeserializeOwned>(payload: Value) -> Result<T> {
    let envelope = match SuccessEnvelope::<Value>::deserialize(&payload) {
        Ok(envelope) => envelope,
        Err(e) => {
            return Err(Error::Decode {
                message: format!("malformed response envelope: {e}"),
                response: payload,
            })
        }
    };

    if let Some(metadata) = &envelope.metadata {
        debug!(request_id = %metadata.request_id, "Decoding response data");
    }

    <T as Deserialize>::deserialize(&envelope.data).map_err(|e| Error::Decode {
        message: e.to_string(),
        response: envelope.data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credentials, API_KEY_HEADER};
    use crate::types::HealthStatus;
    use reqwest::header::AUTHORIZATION;
    use serde_json::json;

    fn client() -> Client {
        Client::new(ClientConfig::default().with_credentials(Credentials::api_key("key-1")))
            .unwrap()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let result = Client::new(ClientConfig::default().with_base_url("nowhere"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn update_switches_between_credentials() {
        let mut client = client();
        assert_eq!(client.default_headers()[API_KEY_HEADER], "key-1");

        client
            .update_config(ConfigUpdate::new().credentials(Credentials::bearer_token("tok")))
            .unwrap();
        assert!(client.default_headers().get(API_KEY_HEADER).is_none());
        assert_eq!(client.default_headers()[AUTHORIZATION], "Bearer tok");

        client
            .update_config(ConfigUpdate::new().credentials(Credentials::api_key("key-2")))
            .unwrap();
        assert!(client.default_headers().get(AUTHORIZATION).is_none());
        assert_eq!(client.default_headers()[API_KEY_HEADER], "key-2");
    }

    #[test]
    fn rejected_update_keeps_previous_config() {
        let mut client = client();
        let result = client.update_config(ConfigUpdate::new().header("bad header", "x"));
        assert!(result.is_err());
        assert_eq!(client.default_headers()[API_KEY_HEADER], "key-1");
        assert!(client.config().headers.is_empty());
    }

    #[tokio::test]
    async fn closed_client_refuses_work() {
        let mut client = client();
        client.close().unwrap();

        assert!(client.is_closed());
        assert_eq!(client.health_check().await.unwrap_err().code(), "CLIENT_CLOSED");
        assert!(matches!(client.close(), Err(Error::Closed)));
        assert!(matches!(
            client.update_config(ConfigUpdate::new().base_url("http://localhost")),
            Err(Error::Closed)
        ));
    }

    #[test]
    fn decode_data_reads_payload_field() {
        let health: HealthCheck = decode_data(json!({
            "success": true,
            "data": {
                "status": "healthy",
                "timestamp": "2024-01-15T10:30:00Z",
                "services": { "api": { "status": "up" } }
            },
            "metadata": {
                "version": "1.0.0",
                "timestamp": "2024-01-15T10:30:00Z",
                "requestId": "req-1"
            }
        }))
        .unwrap();
        assert_eq!(health.status, HealthStatus::Healthy);
    }

    #[test]
    fn decode_data_reports_shape_mismatch() {
        let err = decode_data::<HealthCheck>(json!({
            "success": true,
            "data": { "status": "healthy" }
        }))
        .unwrap_err();

        assert_eq!(err.code(), "INVALID_RESPONSE");
        assert_eq!(err.response(), json!({ "status": "healthy" }));
    }

    #[test]
    fn decode_data_requires_data_field() {
        let err = decode_data::<User>(json!({ "success": true })).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
        assert!(err.to_string().contains("missing field `data`"));
        assert_eq!(err.response(), json!({ "success": true }));
    }

    #[test]
    fn decode_data_rejects_malformed_metadata() {
        let err = decode_data::<Value>(json!({
            "success": true,
            "data": {},
            "metadata": { "requestId": 7 }
        }))
        .unwrap_err();
        assert_eq!(err.code(), "INVALID_RESPONSE");
    }

    #[test]
    fn header_update_replaces_differently_cased_name() {
        let mut client = Client::new(ClientConfig::default().with_header("x-team", "old")).unwrap();
        client
            .update_config(ConfigUpdate::new().header("X-Team", "new"))
            .unwrap();

        assert_eq!(client.default_headers()["x-team"], "new");
        assert_eq!(client.default_headers().get_all("x-team").iter().count(), 1);
        assert_eq!(client.config().headers.len(), 1);
    }

    #[test]
    fn params_default_to_documented_values() {
        assert_eq!(
            TrustScoreParams::default(),
            TrustScoreParams {
                include_factors: true,
                cache: true
            }
        );
        let trends = TrendsParams::default();
        assert_eq!(trends.timeframe, Timeframe::Days30);
        assert!(trends.include_benchmark);
        assert!(FeaturesParams::default().include_coming_soon);
        assert!(!UserParams::default().include_private);
    }
}
