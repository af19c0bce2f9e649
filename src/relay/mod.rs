use crate::cli::globals::GlobalArgs;
use anyhow::Result;
use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
    Extension, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{debug_span, info, Span};
use ulid::Ulid;
use utoipa::OpenApi;

pub mod emailjs;
pub mod handlers;
pub mod turnstile;

/// Shared per-process state: the outbound HTTP client and the read-only
/// configuration. Handlers never mutate it.
pub struct AppState {
    pub http: reqwest::Client,
    pub globals: GlobalArgs,
}

/// The validated contact message. Serializes into the `template_params`
/// object the delivery API expects.
#[derive(Debug, Serialize)]
pub struct Submission {
    pub user_name: String,
    pub user_email: String,
    pub user_subject: String,
    pub user_message: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(handlers::contact::relay),
    tags(
        (name = "contact", description = "Contact form relay API"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Build the relay router.
///
/// A single catch-all handler owns the method gate so the contract
/// (OPTIONS preflight, POST pipeline, 405 otherwise) applies at every path.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new().fallback(handlers::relay).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(middleware::from_fn(allow_origin))
            .layer(Extension(state)),
    )
}

/// Start the relay server.
/// # Errors
/// Returns an error if the HTTP client cannot be built or the server fails to start.
pub async fn new(port: u16, globals: GlobalArgs) -> Result<()> {
    let http = reqwest::Client::builder()
        .user_agent(crate::APP_USER_AGENT)
        .build()?;

    let state = Arc::new(AppState { http, globals });

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, router(state).into_make_service()).await?;

    Ok(())
}

// Every response, on every path, reflects the caller's Origin (or `*` when
// absent). Applied as a layer so error paths and the 405 branch get it too.
async fn allow_origin(request: Request<Body>, next: Next) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();

    let mut response = next.run(request).await;

    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        origin.unwrap_or_else(|| HeaderValue::from_static("*")),
    );

    response
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let path = request.uri().path();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", path, request_id)
}
