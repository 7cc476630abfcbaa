use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;

pub async fn root() -> ApiSuccess<ServiceBanner> {
    ApiSuccess::new(
        StatusCode::OK,
        ServiceBanner {
            message: "Ride-hailing back-office API".to_string(),
            status: "running".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    )
}

pub async fn health() -> ApiSuccess<HealthStatus> {
    ApiSuccess::new(
        StatusCode::OK,
        HealthStatus {
            status: "healthy".to_string(),
            services: ServicesStatus {
                auth: "operational".to_string(),
            },
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceBanner {
    pub message: String,
    pub status: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub services: ServicesStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicesStatus {
    pub auth: String,
}
