mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::Algorithm;
use auth::TokenAuthority;
use auth::TokenConfig;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use backoffice_service::inbound::http::audit::audit;
use backoffice_service::inbound::http::router::AppState;
use backoffice_service::outbound::directory::InMemoryUserDirectory;
use common::TestApp;
use reqwest::StatusCode;

/// Spawn a bare router wrapped only in the audit layer, with a handler that
/// always panics.
async fn spawn_panicking_app() -> String {
    let state = AppState {
        authority: Arc::new(TokenAuthority::new(&TokenConfig {
            secret: common::TEST_SECRET.to_string(),
            algorithm: Algorithm::HS256,
            default_ttl_minutes: 60,
        })),
        users: Arc::new(InMemoryUserDirectory::new()),
        token_expire_seconds: 3600,
        trust_proxy_headers: true,
    };

    async fn panicking_handler() -> axum::http::StatusCode {
        panic!("handler blew up")
    }

    let application: Router = Router::new()
        .route("/api/anything", get(panicking_handler))
        .layer(middleware::from_fn_with_state(state, audit));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(
            listener,
            application.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    });

    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn test_panicking_handler_degrades_to_500_with_correlation_id() {
    let address = spawn_panicking_app().await;

    let response = reqwest::get(format!("{}/api/anything", address))
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let header_request_id = response
        .headers()
        .get("x-request-id")
        .expect("X-Request-ID header missing")
        .to_str()
        .unwrap()
        .to_string();
    assert!(response.headers().get("x-process-time").is_some());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["detail"], "Internal server error");
    assert_eq!(body["request_id"], header_request_id);
}

#[tokio::test]
async fn test_server_survives_handler_panic() {
    let address = spawn_panicking_app().await;

    let first = reqwest::get(format!("{}/api/anything", address)).await.unwrap();
    assert_eq!(first.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // The process still serves; the panic never crossed the pipeline.
    let second = reqwest::get(format!("{}/api/anything", address)).await.unwrap();
    assert_eq!(second.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_every_response_carries_audit_headers() {
    let app = TestApp::spawn().await;

    let ok = app.get("/health").send().await.expect("request failed");
    assert!(ok.headers().get("x-request-id").is_some());
    let process_time = ok
        .headers()
        .get("x-process-time")
        .expect("X-Process-Time header missing")
        .to_str()
        .unwrap()
        .to_string();
    process_time
        .parse::<f64>()
        .expect("X-Process-Time is not decimal seconds");
    // Three fractional digits
    assert_eq!(process_time.split('.').nth(1).map(str::len), Some(3));

    // Unmatched routes still pass through the audit layer.
    let not_found = app.get("/api/nowhere").send().await.expect("request failed");
    assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
    assert!(not_found.headers().get("x-request-id").is_some());
    assert!(not_found.headers().get("x-process-time").is_some());
}

#[tokio::test]
async fn test_request_ids_are_unique_per_request() {
    let app = TestApp::spawn().await;

    let first = app.get("/health").send().await.expect("request failed");
    let second = app.get("/health").send().await.expect("request failed");

    let first_id = first.headers().get("x-request-id").unwrap().clone();
    let second_id = second.headers().get("x-request-id").unwrap().clone();
    assert_ne!(first_id, second_id);
}
