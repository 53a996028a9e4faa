//! Integration tests for the REST API
//!
//! Drives the full router over the mock source with frozen prices:
//! - Quote proxy contract and error bodies
//! - Order placement, listing and cancellation
//! - Balance, positions and summary
//! - Watch list endpoints

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use papertrade_clock::ManualClock;
use papertrade_quotes::{MockSourceConfig, SourceConfig};
use papertrade_server::{App, ServerConfig};
use serde_json::{Value, json};
use tower::ServiceExt;

// ============================================================================
// Test Fixtures
// ============================================================================

fn create_test_app() -> App {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut config = ServerConfig::default();
    config.quotes.source = SourceConfig::Mock(MockSourceConfig::fixed());
    App::with_clock(config, ManualClock::new(None)).unwrap()
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::GET, uri, None).await
}

fn assert_error_body(body: &Value) {
    assert_eq!(body["error"], json!(true));
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}

// ============================================================================
// Quote Proxy
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();
    let (status, body) = get(&app.router(), "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["source"], json!("mock"));
    assert_eq!(body["cacheTtlSecs"], json!(300));
}

#[tokio::test]
async fn test_stock_contract() {
    let app = create_test_app();
    let (status, body) = get(&app.router(), "/api/stock/reliance?interval=5m&range=1d").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], json!("RELIANCE.NS"));
    assert_eq!(body["name"], json!("Reliance Industries Ltd"));
    assert_eq!(body["price"].as_f64(), Some(2450.0));
    assert_eq!(body["change"].as_f64(), Some(0.0));
    assert_eq!(body["changePercent"].as_f64(), Some(0.0));
    assert!(body.get("open").is_some());
    assert!(body.get("volume").is_some());
    assert!(body["lastUpdated"].is_string());

    let chart = body["chartData"].as_array().unwrap();
    assert_eq!(chart.len(), 288);
    for key in ["time", "open", "high", "low", "close", "volume"] {
        assert!(chart[0].get(key).is_some(), "chartData item missing {}", key);
    }
    let times: Vec<i64> = chart.iter().map(|c| c["time"].as_i64().unwrap()).collect();
    assert!(times.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_stock_uses_default_window() {
    let app = create_test_app();
    let (status, body) = get(&app.router(), "/api/stock/TCS.BO").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], json!("TCS.BO"));
    assert_eq!(body["chartData"].as_array().unwrap().len(), 288);
}

#[tokio::test]
async fn test_stock_without_bars_has_empty_chart() {
    let app = create_test_app();
    let (status, body) = get(&app.router(), "/api/stock/infy?interval=7m").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"].as_f64(), Some(1480.0));
    assert_eq!(body["chartData"], json!([]));
}

#[tokio::test]
async fn test_stock_unknown_symbol() {
    let app = create_test_app();
    let (status, body) = get(&app.router(), "/api/stock/nosuchco").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_body(&body);
    assert_eq!(body["message"], json!("Symbol not found: NOSUCHCO.NS"));
}

#[tokio::test]
async fn test_search_endpoint() {
    let app = create_test_app();
    let router = app.router();

    let (status, body) = get(&router, "/api/search/tata").await;
    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert!(!results.is_empty());
    assert_eq!(results[0]["exchange"], json!("NSE"));
    assert_eq!(results[0]["type"], json!("EQUITY"));
    assert!(results.iter().any(|r| r["symbol"] == json!("TCS.NS")));

    let (status, body) = get(&router, "/api/search/t").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

// ============================================================================
// Orders & Ledger
// ============================================================================

#[tokio::test]
async fn test_market_order_flow() {
    let app = create_test_app();
    let router = app.router();

    let (status, order) = send(
        &router,
        Method::POST,
        "/api/orders",
        Some(json!({"symbol": "RELIANCE", "side": "buy", "type": "market", "quantity": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["symbol"], json!("RELIANCE.NS"));
    assert_eq!(order["status"], json!("filled"));
    assert_eq!(order["type"], json!("market"));
    assert_eq!(order["price"].as_f64(), Some(2450.0));

    let (_, balance) = get(&router, "/api/balance").await;
    assert_eq!(balance["balance"].as_f64(), Some(975500.0));

    let (_, positions) = get(&router, "/api/positions").await;
    let positions = positions.as_array().unwrap();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0]["symbol"], json!("RELIANCE.NS"));
    assert_eq!(positions[0]["quantity"], json!(10));
    assert_eq!(positions[0]["averagePrice"].as_f64(), Some(2450.0));

    let (_, orders) = get(&router, "/api/orders").await;
    assert_eq!(orders.as_array().unwrap().len(), 1);
    assert_eq!(orders[0]["id"], order["id"]);

    let (_, summary) = get(&router, "/api/summary").await;
    assert_eq!(summary["invested"].as_f64(), Some(24500.0));
    assert_eq!(summary["equity"].as_f64(), Some(1000000.0));
    assert_eq!(summary["openPositions"], json!(1));
    assert_eq!(summary["orderCount"], json!(1));
}

#[tokio::test]
async fn test_limit_order_cancel_flow() {
    let app = create_test_app();
    let router = app.router();

    let (status, order) = send(
        &router,
        Method::POST,
        "/api/orders",
        Some(json!({"symbol": "sbin", "side": "buy", "type": "limit", "quantity": 4, "limitPrice": 600.5})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], json!("pending"));
    assert_eq!(order["price"].as_f64(), Some(600.5));

    let (_, balance) = get(&router, "/api/balance").await;
    assert_eq!(balance["balance"].as_f64(), Some(1000000.0));

    let id = order["id"].as_str().unwrap().to_string();
    let uri = format!("/api/orders/{}", id);

    let (status, cancelled) = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], json!("cancelled"));

    let (status, body) = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error_body(&body);
}

#[tokio::test]
async fn test_cancel_unknown_order() {
    let app = create_test_app();
    let router = app.router();

    let (status, body) = send(
        &router,
        Method::DELETE,
        "/api/orders/00000000-0000-4000-8000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_body(&body);

    let (status, body) = send(&router, Method::DELETE, "/api/orders/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&body);
}

#[tokio::test]
async fn test_rejected_orders() {
    let app = create_test_app();
    let router = app.router();

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/orders",
        Some(json!({"symbol": "tcs", "side": "buy", "type": "market", "quantity": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&body);

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/orders",
        Some(json!({"symbol": "tcs", "side": "hold", "type": "market", "quantity": 1})),
    )
    .await;
    assert!(status.is_client_error());
    assert_error_body(&body);

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/orders",
        Some(json!({"symbol": "nosuchco", "side": "buy", "type": "market", "quantity": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_body(&body);

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/orders",
        Some(json!({
            "symbol": "itc",
            "side": "buy",
            "type": "limit",
            "quantity": 1_000_000_000_000_000_000u64,
            "limitPrice": 1e12
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&body);

    let (_, orders) = get(&router, "/api/orders").await;
    assert_eq!(orders, json!([]));
}

// ============================================================================
// Watch List
// ============================================================================

#[tokio::test]
async fn test_watch_endpoints() {
    let app = create_test_app();
    let router = app.router();

    let (status, body) = send(&router, Method::POST, "/api/watch/tcs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], json!("TCS.NS"));
    assert_eq!(body["watched"], json!(["TCS.NS"]));

    let (_, watched) = get(&router, "/api/watch").await;
    assert_eq!(watched, json!(["TCS.NS"]));

    let (status, body) = send(&router, Method::POST, "/api/watch/nosuchco", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_body(&body);

    let (status, body) = send(&router, Method::DELETE, "/api/watch/TCS.NS", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["watched"], json!([]));

    let (status, _) = send(&router, Method::DELETE, "/api/watch/tcs", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.state.poller.shutdown();
}

#[tokio::test]
async fn test_cors_is_permissive() {
    let app = create_test_app();

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
