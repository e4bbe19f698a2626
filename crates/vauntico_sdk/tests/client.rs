//! End-to-end tests against a mock Vauntico API.

use serde_json::{json, Value};
use std::time::{Duration, Instant};
use vauntico_sdk::types::{
    FeatureCategory, HealthStatus, ScoreFactor, SubscriptionTier, Timeframe,
    TrustScoreCalculationRequest,
};
use vauntico_sdk::{
    Client, ClientConfig, ConfigUpdate, Credentials, FeaturesParams, RetryPolicy, TrendsParams,
    TrustScoreParams, UserParams,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn envelope(data: Value) -> Value {
    json!({
        "success": true,
        "data": data,
        "metadata": {
            "version": "1.0.0",
            "timestamp": "2024-01-15T10:30:00Z",
            "requestId": "req-abc"
        }
    })
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(envelope(data))
}

fn user_json(id: &str) -> Value {
    json!({
        "id": id,
        "email": "ada@example.com",
        "username": "ada",
        "tier": "gold",
        "createdAt": "2023-05-01T08:00:00Z",
        "verified": true
    })
}

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::default()
        .with_base_url(format!("{}/v1", server.uri()))
        .with_credentials(Credentials::api_key("test-key"))
        .with_retry_policy(RetryPolicy::new(3, Duration::from_millis(10)))
}

fn client_for(server: &MockServer) -> Client {
    Client::new(config_for(server)).unwrap()
}

#[tokio::test]
async fn health_check_returns_typed_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/health"))
        .and(header("x-api-key", "test-key"))
        .and(header("content-type", "application/json"))
        .respond_with(ok(json!({
            "status": "healthy",
            "timestamp": "2024-01-15T10:30:00Z",
            "uptime": 3600,
            "services": {
                "database": { "status": "up", "responseTime": 3.5 },
                "cache": { "status": "up" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let health = client_for(&server).health_check().await.unwrap();

    assert_eq!(health.status, HealthStatus::Healthy);
    assert!(!health.services.is_empty());
    assert_eq!(health.services["database"].response_time, Some(3.5));
}

#[tokio::test]
async fn get_trust_score_sends_query_and_decodes_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/dashboard/trustscore"))
        .and(query_param("userId", "user-123"))
        .and(query_param("includeFactors", "true"))
        .and(query_param("cache", "false"))
        .respond_with(ok(json!({
            "score": 87.5,
            "tier": "gold",
            "factors": {
                "engagement": 90.0,
                "consistency": 85.0,
                "quality": 88.0,
                "community": 87.0
            },
            "calculatedAt": "2024-01-15T10:30:00Z",
            "expiresAt": "2024-01-15T11:30:00Z",
            "trend": "up",
            "change": 2.5,
            "lastUpdated": "2024-01-15T10:30:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = TrustScoreParams {
        cache: false,
        ..TrustScoreParams::default()
    };
    let score = client_for(&server)
        .get_trust_score("user-123", params)
        .await
        .unwrap();

    assert!((score.score - 87.5).abs() < f64::EPSILON);
    assert_eq!(score.tier, SubscriptionTier::Gold);
    assert!((score.factors.quality - 88.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn calculate_trust_score_posts_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/dashboard/trustscore"))
        .and(body_json(json!({
            "userId": "user-123",
            "force": true,
            "factors": ["engagement"]
        })))
        .respond_with(ok(json!({
            "calculationId": "calc-42",
            "status": "processing",
            "estimatedTime": 30,
            "startedAt": "2024-01-15T10:30:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = TrustScoreCalculationRequest::new("user-123")
        .force(true)
        .factors([ScoreFactor::Engagement]);
    let job = client_for(&server)
        .calculate_trust_score(&request)
        .await
        .unwrap();

    assert_eq!(job.calculation_id, "calc-42");
    assert_eq!(job.estimated_time, 30);
}

#[tokio::test]
async fn trends_and_features_send_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/dashboard/trend"))
        .and(query_param("timeframe", "7d"))
        .and(query_param("granularity", "daily"))
        .and(query_param("includeBenchmark", "true"))
        .respond_with(ok(json!({
            "data": [{ "date": "2024-01-15", "score": 87.5, "benchmark": 70.0 }],
            "timeframe": "7d",
            "metadata": {
                "version": "1.0.0",
                "endpoint": "/dashboard/trend",
                "generatedAt": "2024-01-15T10:30:00Z",
                "count": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/dashboard/features"))
        .and(query_param("userId", "user-123"))
        .and(query_param("includeComingSoon", "false"))
        .and(query_param("category", "ai"))
        .respond_with(ok(json!({
            "features": [],
            "userLevel": "silver",
            "unlockedCount": 0,
            "totalCount": 12,
            "metadata": {
                "version": "1.0.0",
                "endpoint": "/dashboard/features",
                "generatedAt": "2024-01-15T10:30:00Z"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let trend = client
        .get_trust_score_trends(
            "user-123",
            TrendsParams {
                timeframe: Timeframe::Days7,
                ..TrendsParams::default()
            },
        )
        .await
        .unwrap();
    let features = client
        .get_user_features(
            "user-123",
            FeaturesParams {
                category: Some(FeatureCategory::Ai),
                include_coming_soon: false,
                ..FeaturesParams::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(trend.data.len(), 1);
    assert_eq!(trend.timeframe, "7d");
    assert_eq!(features.user_level, SubscriptionTier::Silver);
    assert_eq!(features.total_count, 12);
}

#[tokio::test]
async fn user_lookups_hit_expected_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/me"))
        .respond_with(ok(user_json("me-1")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users/user-77"))
        .and(query_param("includePrivate", "true"))
        .respond_with(ok(user_json("user-77")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let me = client.get_current_user().await.unwrap();
    let other = client
        .get_user_by_id(
            "user-77",
            UserParams {
                include_private: true,
            },
        )
        .await
        .unwrap();

    assert_eq!(me.id, "me-1");
    assert_eq!(other.id, "user-77");
}

#[tokio::test]
async fn rate_limit_is_classified_and_not_retried() {
    let server = MockServer::start().await;
    Mock::given(path("/v1/health"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": "rate limited",
            "retryAfter": 30,
            "limit": 100,
            "remaining": 0,
            "reset": 1_700_000_000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).health_check().await.unwrap_err();

    assert_eq!(err.code(), "RATE_LIMIT_EXCEEDED");
    let info = err.rate_limit().unwrap();
    assert_eq!(info.retry_after, Some(30));
    assert_eq!(info.limit, Some(100));
    assert_eq!(info.remaining, Some(0));
    assert_eq!(info.reset, Some(1_700_000_000));
}

#[tokio::test]
async fn unparsable_server_error_becomes_http_error() {
    let server = MockServer::start().await;
    Mock::given(path("/v1/health"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_string("<html>upstream exploded</html>")
                .insert_header("x-correlation-id", "corr-500"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).health_check().await.unwrap_err();

    assert_eq!(err.code(), "HTTP_ERROR");
    assert_eq!(err.to_string(), "HTTP 500");
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.correlation_id(), Some("corr-500"));
}

#[tokio::test]
async fn error_envelope_code_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(path("/v1/users/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "User not found",
            "code": "USER_NOT_FOUND",
            "metadata": {
                "version": "1.0.0",
                "timestamp": "2024-01-15T10:30:00Z",
                "correlationId": "corr-404",
                "endpoint": "/users/ghost"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_user_by_id("ghost", UserParams::default())
        .await
        .unwrap_err();

    assert_eq!(err.code(), "USER_NOT_FOUND");
    assert_eq!(err.to_string(), "User not found");
    assert_eq!(err.correlation_id(), Some("corr-404"));
    assert_eq!(err.response()["metadata"]["endpoint"], "/users/ghost");
}

#[tokio::test]
async fn timeouts_are_retried_until_attempts_run_out() {
    let server = MockServer::start().await;
    Mock::given(path("/v1/health"))
        .respond_with(ok(json!({})).set_delay(Duration::from_millis(500)))
        .expect(3)
        .mount(&server)
        .await;

    let client =
        Client::new(config_for(&server).with_timeout(Duration::from_millis(50))).unwrap();
    let err = client.health_check().await.unwrap_err();

    assert_eq!(err.code(), "NETWORK_ERROR");
    assert!(err.to_string().starts_with("Network error"));
}

async fn redirect_loop_requests(attempts: u32) -> (String, usize) {
    let server = MockServer::start().await;
    Mock::given(path("/v1/health"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/v1/health", server.uri())),
        )
        .mount(&server)
        .await;

    let client = Client::new(
        config_for(&server).with_retry_policy(RetryPolicy::new(attempts, Duration::from_millis(10))),
    )
    .unwrap();
    let err = client.health_check().await.unwrap_err();
    assert!(err.to_string().starts_with("HTTP error"), "{err}");
    assert_eq!(err.status(), None);

    let requests = server.received_requests().await.unwrap();
    (err.code().to_string(), requests.len())
}

#[tokio::test]
async fn redirect_loops_are_retried_then_reported_as_http_errors() {
    let (single_code, single_attempt) = redirect_loop_requests(1).await;
    let (code, all_attempts) = redirect_loop_requests(3).await;

    assert_eq!(single_code, "HTTP_ERROR");
    assert_eq!(code, "HTTP_ERROR");
    assert!(single_attempt > 1);
    assert_eq!(all_attempts, single_attempt * 3);
}

#[tokio::test]
async fn header_update_replaces_value_regardless_of_case() {
    let server = MockServer::start().await;
    Mock::given(path("/v1/users/me"))
        .respond_with(ok(user_json("me-1")))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = Client::new(config_for(&server).with_header("x-team", "old")).unwrap();
    client
        .update_config(ConfigUpdate::new().header("X-Team", "new"))
        .unwrap();
    client.get_current_user().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let sent: Vec<_> = requests[0].headers.get_all("x-team").iter().collect();
    assert_eq!(sent, ["new"]);
}

#[tokio::test]
async fn connection_failures_back_off_then_give_up() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = Client::new(
        ClientConfig::default()
            .with_base_url(format!("http://127.0.0.1:{port}/v1"))
            .with_timeout(Duration::from_secs(2)),
    )
    .unwrap();

    let started = Instant::now();
    let err = client.health_check().await.unwrap_err();
    let elapsed = started.elapsed();

    assert_eq!(err.code(), "NETWORK_ERROR");
    // 1s + 2s of backoff; a fourth attempt would add another 4s.
    assert!(elapsed >= Duration::from_secs(3), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(7), "{elapsed:?}");
}

#[tokio::test]
async fn switching_credentials_changes_request_headers() {
    let server = MockServer::start().await;
    Mock::given(path("/v1/users/me"))
        .respond_with(ok(user_json("me-1")))
        .expect(3)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.get_current_user().await.unwrap();

    client
        .update_config(ConfigUpdate::new().credentials(Credentials::bearer_token("tok-1")))
        .unwrap();
    client.get_current_user().await.unwrap();

    client
        .update_config(ConfigUpdate::new().credentials(Credentials::api_key("key-2")))
        .unwrap();
    client.get_current_user().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);

    assert_eq!(requests[0].headers.get("x-api-key").unwrap(), "test-key");
    assert!(requests[0].headers.get("authorization").is_none());

    assert!(requests[1].headers.get("x-api-key").is_none());
    assert_eq!(requests[1].headers.get("authorization").unwrap(), "Bearer tok-1");

    assert_eq!(requests[2].headers.get("x-api-key").unwrap(), "key-2");
    assert!(requests[2].headers.get("authorization").is_none());
}

#[tokio::test]
async fn base_url_and_headers_can_be_updated() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    Mock::given(path("/v1/users/me"))
        .respond_with(ok(user_json("me-1")))
        .expect(0)
        .mount(&first)
        .await;
    Mock::given(path("/v2/users/me"))
        .and(header("x-team", "growth"))
        .respond_with(ok(user_json("me-2")))
        .expect(1)
        .mount(&second)
        .await;

    let mut client = client_for(&first);
    client
        .update_config(
            ConfigUpdate::new()
                .base_url(format!("{}/v2", second.uri()))
                .header("X-Team", "growth"),
        )
        .unwrap();

    assert_eq!(client.get_current_user().await.unwrap().id, "me-2");
}

#[tokio::test]
async fn malformed_data_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(path("/v1/users/me"))
        .respond_with(ok(json!({ "id": "me-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).get_current_user().await.unwrap_err();

    assert_eq!(err.code(), "INVALID_RESPONSE");
    assert_eq!(err.response(), json!({ "id": "me-1" }));
}

#[tokio::test]
async fn non_json_success_body_is_unknown_and_not_retried() {
    let server = MockServer::start().await;
    Mock::given(path("/v1/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).health_check().await.unwrap_err();
    assert_eq!(err.code(), "UNKNOWN_ERROR");
}

#[tokio::test]
async fn closed_client_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(path("/v1/health"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.close().unwrap();

    let err = client.health_check().await.unwrap_err();
    assert_eq!(err.code(), "CLIENT_CLOSED");
}
