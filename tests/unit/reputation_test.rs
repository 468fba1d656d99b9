use threat_intel_pipeline::abuseipdb::{AbuseIpDbClient, ReputationLookup};
use threat_intel_pipeline::utils::IntelError;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::test_utils::{check_body, reputation_config, API_KEY};

#[tokio::test]
async fn check_sends_key_and_lookback_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/check"))
        .and(query_param("ipAddress", "8.8.8.8"))
        .and(query_param("maxAgeInDays", "90"))
        .and(header("Key", API_KEY))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(check_body("8.8.8.8", 0, "US", 0)))
        .expect(1)
        .mount(&server)
        .await;

    let client = AbuseIpDbClient::new(&reputation_config(&server.uri())).unwrap();
    let record = client.check("8.8.8.8").await.unwrap();

    assert_eq!(record.ip, "8.8.8.8");
    assert_eq!(record.abuse_score, 0);
    assert_eq!(record.country_code.as_deref(), Some("US"));
    assert_eq!(record.total_reports, 0);
    assert!(record.last_reported_at.is_none());
}

#[tokio::test]
async fn non_200_is_service_error_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/check"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Daily rate limit exceeded"))
        .expect(1)
        .mount(&server)
        .await;

    let client = AbuseIpDbClient::new(&reputation_config(&server.uri())).unwrap();
    match client.check("1.2.3.4").await {
        Err(IntelError::Service { status, body }) => {
            assert_eq!(status, 429);
            assert_eq!(body, "Daily rate limit exceeded");
        }
        other => panic!("expected service error, got {:?}", other),
    }
}

#[tokio::test]
async fn unexpected_payload_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"errors": []})))
        .mount(&server)
        .await;

    let client = AbuseIpDbClient::new(&reputation_config(&server.uri())).unwrap();
    assert!(matches!(
        client.check("1.2.3.4").await,
        Err(IntelError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let client = AbuseIpDbClient::new(&reputation_config("http://127.0.0.1:1")).unwrap();
    assert!(matches!(
        client.check("1.2.3.4").await,
        Err(IntelError::Transport(_))
    ));
}
