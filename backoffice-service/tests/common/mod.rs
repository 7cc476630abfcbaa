use std::net::SocketAddr;
use std::sync::Arc;

use auth::Algorithm;
use auth::JwtHandler;
use auth::TokenAuthority;
use auth::TokenConfig;
use backoffice_service::domain::user::models::UserRecord;
use backoffice_service::inbound::http::router::create_router;
use backoffice_service::inbound::http::router::AppState;
use backoffice_service::outbound::directory::InMemoryUserDirectory;
use serde_json::json;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin_pass_word!";
pub const RIDER_EMAIL: &str = "rider@example.com";
pub const RIDER_PASSWORD: &str = "rider_pass_word!";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authority: Arc<TokenAuthority>,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let authority = Arc::new(TokenAuthority::new(&TokenConfig {
            secret: TEST_SECRET.to_string(),
            algorithm: Algorithm::HS256,
            default_ttl_minutes: 60,
        }));

        let users = Arc::new(
            InMemoryUserDirectory::new()
                .with_user(UserRecord {
                    id: 1,
                    email: ADMIN_EMAIL.to_string(),
                    role: "admin".to_string(),
                    password_hash: authority
                        .hash_password(ADMIN_PASSWORD)
                        .expect("Failed to hash admin password"),
                })
                .with_user(UserRecord {
                    id: 2,
                    email: RIDER_EMAIL.to_string(),
                    role: "user".to_string(),
                    password_hash: authority
                        .hash_password(RIDER_PASSWORD)
                        .expect("Failed to hash rider password"),
                }),
        );

        let state = AppState {
            authority: Arc::clone(&authority),
            users,
            token_expire_seconds: 3600,
            trust_proxy_headers: true,
        };

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let application = create_router(state, &["http://localhost:3000".to_string()]);
        tokio::spawn(async move {
            axum::serve(
                listener,
                application.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            authority,
            jwt_handler: JwtHandler::new(TEST_SECRET.as_bytes(), Algorithm::HS256),
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Log in and return the issued access token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute login request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["access_token"]
            .as_str()
            .expect("Login response carries no token")
            .to_string()
    }
}
