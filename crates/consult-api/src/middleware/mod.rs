//! Middleware stack for the API server
//!
//! Provides request ID generation, logging, timeouts, and CORS.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, request::Parts, HeaderValue, Method, Request, StatusCode},
    Router,
};
use consult_common::CorsConfig;
use regex::Regex;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Local development frontend
const LOCAL_ORIGIN: &str = "http://localhost:3000";

/// Private LAN hosts serving the frontend on port 3000
const LAN_ORIGIN_PATTERN: &str = r"^https?://(192\.168\.\d{1,3}\.\d{1,3}|10\.\d{1,3}\.\d{1,3}\.\d{1,3}|172\.(1[6-9]|2\d|3[01])\.\d{1,3}\.\d{1,3}):3000$";

/// Request timeout; longer than any collaborator call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Apply the middleware stack
///
/// Layers run outermost first on requests: request id, propagation,
/// tracing, timeout, then CORS next to the handlers.
pub fn apply_middleware<S>(router: Router<S>, cors: &CorsConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            // Request ID
            .layer(SetRequestIdLayer::new(
                header::HeaderName::from_static(REQUEST_ID_HEADER),
                MakeRequestUuid,
            ))
            .layer(PropagateRequestIdLayer::new(header::HeaderName::from_static(
                REQUEST_ID_HEADER,
            )))
            // Tracing
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get(REQUEST_ID_HEADER)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("unknown");

                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id,
                        )
                    })
                    .on_request(DefaultOnRequest::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            // Timeout (503 Service Unavailable)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::SERVICE_UNAVAILABLE,
                REQUEST_TIMEOUT,
            ))
            // CORS
            .layer(create_cors_layer(cors)),
    )
}

/// Decides which browser origins may call the API
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    exact: Vec<String>,
    lan: Option<Regex>,
}

impl OriginPolicy {
    /// Local frontend, LAN frontends, and the configured frontend URL
    pub fn from_config(config: &CorsConfig) -> Self {
        let mut exact = vec![LOCAL_ORIGIN.to_string()];
        if let Some(url) = config.frontend_url.as_deref().map(str::trim) {
            if !url.is_empty() {
                exact.push(url.trim_end_matches('/').to_string());
            }
        }

        let lan = match Regex::new(LAN_ORIGIN_PATTERN) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!(error = %e, "Invalid LAN origin pattern; LAN origins disabled");
                None
            }
        };

        Self { exact, lan }
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.exact.iter().any(|allowed| allowed == origin)
            || self.lan.as_ref().is_some_and(|re| re.is_match(origin))
    }
}

/// Create CORS layer from configuration
///
/// Requests without an `Origin` header (curl, mobile apps, same-origin) are
/// not subject to CORS and pass through untouched.
fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    let policy = Arc::new(OriginPolicy::from_config(config));
    tracing::info!(origins = ?policy.exact, "CORS: allowing configured and LAN origins");

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([
            header::CONTENT_DISPOSITION,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .allow_credentials(true)
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                let allowed = origin.to_str().is_ok_and(|o| policy.allows(o));
                if !allowed {
                    tracing::warn!(origin = ?origin, "CORS: origin rejected");
                }
                allowed
            },
        ))
}
