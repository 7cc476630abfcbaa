use std::any::Any;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use std::time::Instant;

use axum::extract::ConnectInfo;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use futures::FutureExt;
use serde_json::json;
use uuid::Uuid;

use crate::inbound::http::router::AppState;

/// Requests slower than this get a separately filterable performance record.
const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(2);

static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
static X_PROCESS_TIME: HeaderName = HeaderName::from_static("x-process-time");

/// Correlation identifier attached to the request context before the
/// downstream handler runs; error handlers read it back from extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Per-request outcome of the downstream handler. A panic degrades to a
/// synthesized 500; it never crosses the middleware.
enum HandlerOutcome {
    Success(Response),
    HandlerFailure(String),
}

/// Wraps the full request/response cycle: correlation id, timing, entry and
/// exit logs, panic isolation, and security classification. No request can
/// complete without passing through every step; logging and classification
/// can never alter the response handed back to the transport.
pub async fn audit(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let started = Instant::now();

    let method = req.method().clone();
    let url = req.uri().to_string();
    let client_ip = client_ip(&req, state.trust_proxy_headers);
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("Unknown")
        .to_string();

    req.extensions_mut().insert(RequestId(request_id.clone()));

    tracing::info!(
        request_id = %request_id,
        client_ip = %client_ip,
        user_agent = %user_agent,
        "Request {} {}",
        method,
        url
    );

    let outcome = match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => HandlerOutcome::Success(response),
        Err(panic) => HandlerOutcome::HandlerFailure(panic_message(panic)),
    };

    let (mut response, error_occurred) = match outcome {
        HandlerOutcome::Success(response) => (response, false),
        HandlerOutcome::HandlerFailure(reason) => {
            tracing::error!(
                request_id = %request_id,
                client_ip = %client_ip,
                error = %reason,
                "Error while handling request {} {}",
                method,
                url
            );

            let body = Json(json!({
                "detail": "Internal server error",
                "request_id": request_id,
            }));
            (
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response(),
                true,
            )
        }
    };

    let process_time = started.elapsed();
    let status = response.status().as_u16();

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        headers.insert(&X_REQUEST_ID, value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!("{:.3}", process_time.as_secs_f64())) {
        headers.insert(&X_PROCESS_TIME, value);
    }

    if error_occurred {
        tracing::error!(
            request_id = %request_id,
            method = %method,
            url = %url,
            status_code = status,
            process_time_s = process_time.as_secs_f64(),
            client_ip = %client_ip,
            user_agent = %user_agent,
            "Request finished with handler failure"
        );
    } else if status >= 400 {
        tracing::warn!(
            request_id = %request_id,
            method = %method,
            url = %url,
            status_code = status,
            process_time_s = process_time.as_secs_f64(),
            client_ip = %client_ip,
            user_agent = %user_agent,
            "Request finished with error {}",
            status
        );
    } else {
        tracing::info!(
            request_id = %request_id,
            method = %method,
            url = %url,
            status_code = status,
            process_time_s = process_time.as_secs_f64(),
            client_ip = %client_ip,
            user_agent = %user_agent,
            "Request finished"
        );
    }

    if process_time > SLOW_REQUEST_THRESHOLD {
        tracing::warn!(
            request_id = %request_id,
            status_code = status,
            process_time_s = process_time.as_secs_f64(),
            performance_alert = true,
            "Slow request: {} {}",
            method,
            url
        );
    }

    if let Some(event) = classify(&method, &url, status, &client_ip, &user_agent) {
        emit_security_event(&event);
    }

    response
}

/// Client IP extraction, first match wins: X-Forwarded-For (first entry,
/// trimmed), X-Real-IP, transport peer address, "Unknown".
///
/// Proxy headers are only believed when `trust_proxy_headers` is set; they
/// carry whatever the nearest hop wrote into them.
fn client_ip(req: &Request, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        let forwarded_for = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty());
        if let Some(forwarded_for) = forwarded_for {
            if let Some(first) = forwarded_for.split(',').next() {
                return first.trim().to_string();
            }
        }

        let real_ip = req
            .headers()
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty());
        if let Some(real_ip) = real_ip {
            return real_ip.to_string();
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Audit-worthy outcome of a completed exchange, distinct from ordinary
/// request logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityEvent {
    FailedAuthentication {
        client_ip: String,
        user_agent: String,
        endpoint: String,
    },
    SuccessfulAuthentication {
        client_ip: String,
        endpoint: String,
    },
    ForbiddenAccessAttempt {
        client_ip: String,
        user_agent: String,
        endpoint: String,
    },
}

fn is_mutating(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Classify a completed exchange. Pure: the exchange either maps to one
/// security event or to none.
fn classify(
    method: &Method,
    url: &str,
    status: u16,
    client_ip: &str,
    user_agent: &str,
) -> Option<SecurityEvent> {
    if url.contains("/auth/") {
        if status == 401 {
            return Some(SecurityEvent::FailedAuthentication {
                client_ip: client_ip.to_string(),
                user_agent: user_agent.to_string(),
                endpoint: url.to_string(),
            });
        }

        if status == 200 && is_mutating(method) {
            return Some(SecurityEvent::SuccessfulAuthentication {
                client_ip: client_ip.to_string(),
                endpoint: url.to_string(),
            });
        }
    }

    if status == 403 {
        return Some(SecurityEvent::ForbiddenAccessAttempt {
            client_ip: client_ip.to_string(),
            user_agent: user_agent.to_string(),
            endpoint: url.to_string(),
        });
    }

    None
}

fn emit_security_event(event: &SecurityEvent) {
    match event {
        SecurityEvent::FailedAuthentication {
            client_ip,
            user_agent,
            endpoint,
        } => tracing::warn!(
            security_event = "failed_authentication",
            client_ip = %client_ip,
            user_agent = %user_agent,
            endpoint = %endpoint,
            "Security event recorded"
        ),
        SecurityEvent::SuccessfulAuthentication {
            client_ip,
            endpoint,
        } => tracing::warn!(
            security_event = "successful_authentication",
            client_ip = %client_ip,
            endpoint = %endpoint,
            "Security event recorded"
        ),
        SecurityEvent::ForbiddenAccessAttempt {
            client_ip,
            user_agent,
            endpoint,
        } => tracing::warn!(
            security_event = "forbidden_access_attempt",
            client_ip = %client_ip,
            user_agent = %user_agent,
            endpoint = %endpoint,
            "Security event recorded"
        ),
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
