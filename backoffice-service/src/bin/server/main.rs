use std::net::SocketAddr;
use std::sync::Arc;

use auth::TokenAuthority;
use auth::TokenConfig;
use backoffice_service::config::Config;
use backoffice_service::domain::user::models::UserRecord;
use backoffice_service::inbound::http::router::create_router;
use backoffice_service::inbound::http::router::AppState;
use backoffice_service::outbound::directory::InMemoryUserDirectory;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backoffice_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "backoffice-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    // The secret itself never reaches the logs.
    tracing::info!(
        http_port = config.server.http_port,
        jwt_algorithm = %config.jwt.algorithm,
        jwt_expire_minutes = config.jwt.expire_minutes,
        trust_proxy_headers = config.audit.trust_proxy_headers,
        cors_origins = %config.cors.origins,
        "Configuration loaded"
    );

    let authority = Arc::new(TokenAuthority::new(&TokenConfig {
        secret: config.jwt.secret.clone(),
        algorithm: config.jwt.algorithm()?,
        default_ttl_minutes: config.jwt.expire_minutes,
    }));

    // Bootstrap administrator; real user records live with the external
    // directory collaborator.
    let admin_password_hash = authority.hash_password(&config.directory.seed_admin_password)?;
    let users = Arc::new(InMemoryUserDirectory::new().with_user(UserRecord {
        id: 1,
        email: config.directory.seed_admin_email.clone(),
        role: "admin".to_string(),
        password_hash: admin_password_hash,
    }));
    tracing::info!(
        admin = %config.directory.seed_admin_email,
        "User directory seeded"
    );

    let state = AppState {
        authority,
        users,
        token_expire_seconds: config.jwt.expire_minutes * 60,
        trust_proxy_headers: config.audit.trust_proxy_headers,
    };

    let address = format!("0.0.0.0:{}", config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        address = %address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let application = create_router(state, &config.cors.origin_list());
    axum::serve(
        listener,
        application.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
