use serde_json::json;
use threat_intel_pipeline::cloudflare::{
    CloudflareClient, CloudflareListsManager, ListDirectory, ListMutator,
};
use threat_intel_pipeline::core::validate;
use threat_intel_pipeline::service::{write_outcome, BlockStage, BlockingService, EXIT_FAILED};
use threat_intel_pipeline::utils::IntelError;
use wiremock::matchers::{any, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::test_utils::{cloudflare_config, ACCOUNT_ID, API_TOKEN};

fn lists_path() -> String {
    format!("/accounts/{}/rules/lists", ACCOUNT_ID)
}

fn items_path(list_id: &str) -> String {
    format!("/accounts/{}/rules/lists/{}/items", ACCOUNT_ID, list_id)
}

fn manager(server: &MockServer) -> CloudflareListsManager {
    let config = cloudflare_config(&server.uri());
    CloudflareListsManager::new(CloudflareClient::new(&config).unwrap(), &config)
}

fn service(server: &MockServer) -> BlockingService<CloudflareListsManager, CloudflareListsManager> {
    let lists = manager(server);
    BlockingService::new(lists.clone(), lists, "blacklist")
}

async fn mount_lists(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(lists_path()))
        .and(header("Authorization", format!("Bearer {}", API_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "messages": [],
            "result": [
                {"id": "list-allow", "name": "allowlist", "kind": "ip", "num_items": 3},
                {"id": "list-block", "name": "BlackList", "kind": "ip", "num_items": 10}
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn find_list_matches_name_case_insensitively() {
    let server = MockServer::start().await;
    mount_lists(&server).await;

    let lists = manager(&server);
    assert_eq!(lists.find_list("blacklist").await.unwrap(), "list-block");
    assert!(matches!(
        lists.find_list("missing").await,
        Err(IntelError::NotFound(name)) if name == "missing"
    ));
}

#[tokio::test]
async fn failed_fetch_is_reported_as_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(lists_path()))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "errors": [{"code": 10000, "message": "Authentication error"}]
        })))
        .mount(&server)
        .await;

    assert!(matches!(
        manager(&server).find_list("blacklist").await,
        Err(IntelError::NotFound(_))
    ));
}

#[tokio::test]
async fn add_entry_posts_ip_with_timestamped_comment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(items_path("list-block")))
        .and(header("Authorization", format!("Bearer {}", API_TOKEN).as_str()))
        .and(body_partial_json(json!([{"ip": "203.0.113.9"}])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "messages": [],
            "result": {"operation_id": "4da8780eeb215e6cb7f48dd981c4ea02"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ip = validate("203.0.113.9").unwrap();
    let operation = manager(&server).add_entry("list-block", &ip).await.unwrap();
    assert_eq!(operation.as_deref(), Some("4da8780eeb215e6cb7f48dd981c4ea02"));

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    let comment = items[0]["comment"].as_str().unwrap();
    let stamp = comment.strip_prefix("Blocked via Wazuh at ").unwrap();
    assert!(chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").is_ok());
}

#[tokio::test]
async fn non_2xx_mutation_is_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(items_path("list-block")))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream failure"))
        .expect(1)
        .mount(&server)
        .await;

    let ip = validate("203.0.113.9").unwrap();
    assert!(matches!(
        manager(&server).add_entry("list-block", &ip).await,
        Err(IntelError::Service { status: 500, .. })
    ));
}

#[tokio::test]
async fn block_ip_succeeds_end_to_end() {
    let server = MockServer::start().await;
    mount_lists(&server).await;
    Mock::given(method("POST"))
        .and(path(items_path("list-block")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "result": {"operation_id": "op-1"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = service(&server).block_ip("198.51.100.7").await.unwrap();
    assert_eq!(receipt.ip.as_str(), "198.51.100.7");
    assert_eq!(receipt.list_id, "list-block");
    assert_eq!(receipt.operation_id.as_deref(), Some("op-1"));
}

#[tokio::test]
async fn invalid_ip_makes_no_http_call() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let failure = service(&server).block_ip("not-an-ip").await.unwrap_err();
    assert_eq!(failure.stage, BlockStage::Validating);
    assert!(matches!(failure.error, IntelError::InvalidFormat(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_ip_exits_with_failure_line() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let blocking = service(&server);
    let outcome = blocking.block_ip("not-an-ip").await;
    let mut out = Vec::new();
    let code = write_outcome(&mut out, "not-an-ip", blocking.list_name(), outcome.is_ok()).unwrap();

    assert_eq!(code, EXIT_FAILED);
    assert_eq!(code, 1);
    assert_eq!(String::from_utf8(out).unwrap(), "Failed to block IP not-an-ip\n");
}

#[tokio::test]
async fn find_list_accepts_envelope_without_success_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(lists_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"id": "list-block", "name": "blacklist"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(manager(&server).find_list("blacklist").await.unwrap(), "list-block");
}

#[tokio::test]
async fn missing_list_skips_mutation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(lists_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "result": [{"id": "list-allow", "name": "allowlist"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let failure = service(&server).block_ip("198.51.100.7").await.unwrap_err();
    assert_eq!(failure.stage, BlockStage::ListResolving);
    assert!(matches!(failure.error, IntelError::NotFound(_)));
}

#[tokio::test]
async fn success_false_with_http_200_is_failure() {
    let server = MockServer::start().await;
    mount_lists(&server).await;
    Mock::given(method("POST"))
        .and(path(items_path("list-block")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "errors": ["duplicate"],
            "result": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let failure = service(&server).block_ip("198.51.100.7").await.unwrap_err();
    assert_eq!(failure.stage, BlockStage::Mutating);
    match failure.error {
        IntelError::Service { status, body } => {
            assert_eq!(status, 200);
            assert!(body.contains("duplicate"));
        }
        other => panic!("expected service error, got {:?}", other),
    }
}
