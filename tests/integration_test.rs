//! Integration tests for the catalog search service.
//!
//! The upstream search endpoint is replaced by a wiremock server; tools are
//! driven directly through `CatalogTools`, the health routes through the
//! router.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use catalog_search::{
    config::SearchConfig, handlers, AppState, CatalogTool, CatalogTools, SearchRecorder,
    SearchRequest,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Keeps every recorded event for assertions.
#[derive(Default)]
struct CapturingRecorder {
    searches: Mutex<Vec<bool>>,
    tools: Mutex<Vec<(String, bool)>>,
    active: Mutex<Vec<usize>>,
}

impl SearchRecorder for CapturingRecorder {
    fn record_search(&self, _started: Instant, success: bool) {
        self.searches.lock().unwrap().push(success);
    }

    fn record_tool_usage(&self, tool: &str, _started: Instant, success: bool) {
        self.tools.lock().unwrap().push((tool.to_string(), success));
    }

    fn record_active_connections(&self, count: usize) {
        self.active.lock().unwrap().push(count);
    }
}

/// State over `search`, with the upstream client already built.
async fn start_state(search: SearchConfig) -> (Arc<AppState>, Arc<CapturingRecorder>) {
    let recorder = Arc::new(CapturingRecorder::default());
    let state = AppState::new(search, recorder.clone());
    state.start().await.expect("Failed to start search service");
    (Arc::new(state), recorder)
}

/// State wired to `server` with default client settings.
async fn create_test_state(server: &MockServer) -> (Arc<AppState>, Arc<CapturingRecorder>) {
    start_state(SearchConfig::with_endpoint(format!("{}/search", server.uri()))).await
}

fn tools(state: &AppState) -> &CatalogTools {
    &state.tools
}

/// GET `uri` on the router, returning status and parsed JSON body.
async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, serde_json::from_slice(&body_bytes).unwrap())
}

fn partner_payload() -> Value {
    json!({
        "response": {
            "numFound": 1,
            "docs": [{
                "allTitle": "Acme Consulting",
                "documentKind": "BusinessPartner",
                "partnerName": "Acme",
                "industry": ["Finance", "Health", "Retail", "Telco"],
                "total_accreditations": 12
            }]
        }
    })
}

async fn mount_ok(server: &MockServer, payload: Value) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(server)
        .await;
}

/// Query pairs of the `n`th request the mock server received.
async fn received_pairs(server: &MockServer, n: usize) -> Vec<(String, String)> {
    let requests = server.received_requests().await.unwrap();
    requests[n].url.query_pairs().into_owned().collect()
}

fn values<'a>(pairs: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}

// ============================================================================
// Health Tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoint_returns_200() {
    let server = MockServer::start().await;
    let (state, _) = create_test_state(&server).await;

    let (status, body) = get_json(handlers::router(state), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ready_endpoint_follows_lifecycle() {
    let server = MockServer::start().await;
    let recorder = Arc::new(CapturingRecorder::default());
    let endpoint = format!("{}/search", server.uri());
    let state = Arc::new(AppState::new(
        SearchConfig::with_endpoint(endpoint.clone()),
        recorder,
    ));

    let (status, body) = get_json(handlers::router(state.clone()), "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ready"], false);

    state.start().await.unwrap();
    let (status, body) = get_json(handlers::router(state.clone()), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
    assert_eq!(body["upstream"], endpoint.as_str());

    state.close().await;
    let (status, _) = get_json(handlers::router(state), "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// Tool Call Tests
// ============================================================================

#[tokio::test]
async fn test_business_partner_call() {
    let server = MockServer::start().await;
    mount_ok(&server, partner_payload()).await;
    let (state, _) = create_test_state(&server).await;

    let report = tools(&state)
        .search_business_partners("consulting", 0, 10)
        .await;

    assert!(report.starts_with("Found 1 business partners\n\n1. Acme Consulting"));
    assert!(report.ends_with("   Industries: Finance, Health, Retail\n   Accreditations: 12"));

    let pairs = received_pairs(&server, 0).await;
    assert_eq!(values(&pairs, "q"), vec!["consulting"]);
    assert_eq!(values(&pairs, "start"), vec!["0"]);
    assert_eq!(values(&pairs, "rows"), vec!["10"]);
    assert_eq!(values(&pairs, "fq"), vec!["documentKind:BusinessPartner"]);
}

#[tokio::test]
async fn test_rows_clamped_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("rows", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(partner_payload()))
        .expect(1)
        .mount(&server)
        .await;
    let (state, _) = create_test_state(&server).await;

    let report = tools(&state)
        .search_business_partners("consulting", 0, 500)
        .await;

    assert!(report.starts_with("Found 1 business partners"));
}

#[tokio::test]
async fn test_multi_valued_parameters_repeat_keys() {
    let server = MockServer::start().await;
    mount_ok(&server, json!({ "response": { "numFound": 0, "docs": [] } })).await;
    let (state, _) = create_test_state(&server).await;

    tools(&state).search_certified_software("ansible", 0, 10).await;

    let pairs = received_pairs(&server, 0).await;
    let fq = values(&pairs, "fq");
    assert_eq!(fq.len(), 3);
    assert_eq!(fq[0], "documentKind:CertifiedSoftware OR (documentKind:EcoSolution)");
    assert_eq!(fq[2], "-type:\"Vulnerability Scanner\"");

    let facets = values(&pairs, "facet.field");
    assert_eq!(facets.len(), 5);
    assert_eq!(facets[0], "{!ex=documentKind_tag}documentKind");
    assert!(facets.iter().all(|f| !f.contains(',')));
}

#[tokio::test]
async fn test_empty_result_report() {
    let server = MockServer::start().await;
    mount_ok(&server, json!({ "response": { "numFound": 0, "docs": [] } })).await;
    let (state, _) = create_test_state(&server).await;

    let report = tools(&state).search_cloud_solutions("nothing", 0, 10).await;

    assert_eq!(report, "Found 0 cloud solutions\nNo results found");
}

#[tokio::test]
async fn test_general_search_appends_kind_clause() {
    let server = MockServer::start().await;
    mount_ok(
        &server,
        json!({
            "response": { "numFound": 0, "docs": [] },
            "facet_counts": { "facet_fields": { "documentKind": ["CertifiedSoftware", 3] } }
        }),
    )
    .await;
    let (state, _) = create_test_state(&server).await;

    let report = tools(&state)
        .general_catalog_search("rhel", 0, 10, Some(vec!["CertifiedSoftware".to_string()]))
        .await;

    let pairs = received_pairs(&server, 0).await;
    let fq = values(&pairs, "fq");
    assert_eq!(fq.len(), 4);
    assert_eq!(fq[3], "(documentKind:CertifiedSoftware)");

    let facets = "📊 Search Facets:\n   Document Types:\n     - CertifiedSoftware: 3";
    assert!(report.contains(facets));
}

#[tokio::test]
async fn test_kind_filter_ignored_by_other_tools() {
    let server = MockServer::start().await;
    mount_ok(&server, partner_payload()).await;
    let (state, _) = create_test_state(&server).await;

    let request = SearchRequest::new("x").kinds(["CertifiedSoftware"]);
    let report = tools(&state)
        .invoke(CatalogTool::BusinessPartners, request)
        .await;

    assert!(report.starts_with("Found 1 business partners"));
    let pairs = received_pairs(&server, 0).await;
    assert_eq!(values(&pairs, "fq"), vec!["documentKind:BusinessPartner"]);
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn test_http_error_becomes_error_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let (state, recorder) = create_test_state(&server).await;

    let outcome = tools(&state)
        .call(CatalogTool::CertifiedSoftware, SearchRequest::new("ansible"))
        .await;

    assert!(!outcome.is_success());
    assert_eq!(
        outcome.into_text(),
        "Error searching certified software: Search request failed with status 503"
    );
    assert_eq!(*recorder.searches.lock().unwrap(), vec![false]);
    assert_eq!(
        *recorder.tools.lock().unwrap(),
        vec![("search_certified_software".to_string(), false)]
    );
}

#[tokio::test]
async fn test_malformed_body_is_unexpected_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;
    let (state, recorder) = create_test_state(&server).await;

    let report = tools(&state).search_certified_hardware("dell", 0, 10).await;

    assert!(report.starts_with("Error searching certified hardware: Unexpected search failure:"));
    assert_eq!(*recorder.searches.lock().unwrap(), vec![false]);
}

#[tokio::test]
async fn test_unreachable_upstream_is_network_failure() {
    // Grab a free port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let recorder = Arc::new(CapturingRecorder::default());
    let state = AppState::new(
        SearchConfig::with_endpoint(format!("http://{addr}/search")),
        recorder.clone(),
    );

    let report = tools(&state)
        .general_catalog_search("rhel", 0, 10, None)
        .await;

    assert!(report.starts_with("Error in general catalog search: Search request failed:"));
    assert!(!report.contains("facet.field"));
    assert!(!report.contains("/search?"));
    assert_eq!(*recorder.searches.lock().unwrap(), vec![false]);
}

#[tokio::test]
async fn test_queued_calls_bounded_by_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(partner_payload())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    let (state, recorder) = start_state(SearchConfig {
        endpoint: format!("{}/search", server.uri()),
        timeout: Duration::from_secs(1),
        max_connections: 1,
        max_idle_connections: 1,
    })
    .await;
    let tools = tools(&state);

    let started = Instant::now();
    let (first, second, third) = tokio::join!(
        tools.search_business_partners("a", 0, 10),
        tools.search_business_partners("b", 0, 10),
        tools.search_business_partners("c", 0, 10),
    );

    assert!(started.elapsed() < Duration::from_millis(2500));
    for report in [first, second, third] {
        assert!(
            report.starts_with("Error searching business partners: Search request failed:"),
            "{report}"
        );
    }
    assert_eq!(*recorder.searches.lock().unwrap(), vec![false, false, false]);
    assert_eq!(recorder.active.lock().unwrap().last(), Some(&0));
}

#[tokio::test]
async fn test_success_records_metrics() {
    let server = MockServer::start().await;
    mount_ok(&server, partner_payload()).await;
    let (state, recorder) = create_test_state(&server).await;

    tools(&state).search_business_partners("acme", 0, 10).await;

    assert_eq!(*recorder.searches.lock().unwrap(), vec![true]);
    assert_eq!(
        *recorder.tools.lock().unwrap(),
        vec![("search_business_partners".to_string(), true)]
    );
    assert_eq!(*recorder.active.lock().unwrap(), vec![1, 0]);
}

#[tokio::test]
async fn test_closed_service_returns_error_text() {
    let server = MockServer::start().await;
    mount_ok(&server, partner_payload()).await;
    let (state, _) = create_test_state(&server).await;

    state.close().await;
    let report = tools(&state).search_business_partners("acme", 0, 10).await;

    assert_eq!(
        report,
        "Error searching business partners: Search request failed: search client is closed"
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[tokio::test]
async fn test_concurrent_calls_do_not_cross_talk() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("fq", "documentKind:BusinessPartner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(partner_payload()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("fq", "documentKind:ContainerProductListing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "numFound": 1,
                "docs": [{ "allTitle": "ubi9", "repository": "ubi9/ubi", "architecture": "amd64" }]
            }
        })))
        .mount(&server)
        .await;
    let (state, _) = create_test_state(&server).await;
    let tools = tools(&state);

    let (partners, containers) = tokio::join!(
        tools.search_business_partners("acme", 0, 10),
        tools.search_container_repositories("ubi", 0, 10),
    );

    assert!(partners.starts_with("Found 1 business partners"));
    assert!(partners.contains("Acme Consulting"));
    assert!(!partners.contains("Repository:"));

    assert!(containers.starts_with("Found 1 container repositories"));
    assert!(containers.ends_with("   Repository: ubi9/ubi\n   Architecture: amd64"));
    assert!(!containers.contains("Acme"));
}
