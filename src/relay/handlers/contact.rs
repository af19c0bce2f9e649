use crate::relay::{emailjs, handlers::valid_email, turnstile, AppState, Submission};
use axum::{
    extract::{Extension, Form, FromRequest, Multipart, Request},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_MAX_AGE,
            CONTENT_TYPE,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, error, instrument};

pub const TURNSTILE_FIELD: &str = "cf-turnstile-response";
pub const REQUIRED_FIELDS: [&str; 4] = ["user_name", "user_email", "user_subject", "user_message"];

// Trusted connecting-IP header set by the edge network.
const CLIENT_IP_HEADER: &str = "cf-connecting-ip";

/// Failures of the POST pipeline.
///
/// `Invalid` carries the precise reason back to the caller (400). Everything
/// else funnels through the blanket `From` into `Internal` and collapses to
/// an opaque 500, so upstream diagnostics stay server-side.
#[derive(Debug)]
pub enum RelayError {
    Invalid(String),
    Internal(anyhow::Error),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            Self::Invalid(reason) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": reason }))).into_response()
            }
            Self::Internal(err) => {
                error!("Relay failed: {err:#}");

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Server error" })),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for RelayError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

/// Catch-all handler: CORS preflight, the POST pipeline, or 405.
#[utoipa::path(
    post,
    path = "/",
    responses(
        (status = 200, description = "Message relayed"),
        (status = 400, description = "Missing field, invalid email or captcha failure"),
        (status = 500, description = "Verification or delivery failure"),
    ),
    tag = "contact",
)]
#[instrument(skip_all, fields(method = %request.method(), path = %request.uri().path()))]
pub async fn relay(Extension(state): Extension<Arc<AppState>>, request: Request) -> Response {
    if request.method() == Method::OPTIONS {
        return preflight().into_response();
    }

    if request.method() == Method::POST {
        return submit(&state, request).await.into_response();
    }

    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response()
}

// The Allow-Origin header is added by the router layer, like on every
// other response.
fn preflight() -> impl IntoResponse {
    let mut headers = HeaderMap::new();

    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));

    (StatusCode::NO_CONTENT, headers)
}

// Validation short-circuits with precise reasons; verification always runs
// before delivery, and a single `?` boundary turns everything downstream
// into the opaque server error.
async fn submit(state: &AppState, request: Request) -> Result<Json<Value>, RelayError> {
    let client_ip = request
        .headers()
        .get(CLIENT_IP_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);

    let fields = form_fields(request).await?;

    let token = fields
        .get(TURNSTILE_FIELD)
        .filter(|token| !token.is_empty())
        .cloned()
        .ok_or_else(|| RelayError::Invalid("Captcha failed".to_string()))?;

    for name in REQUIRED_FIELDS {
        if fields.get(name).map_or(true, |value| value.is_empty()) {
            return Err(RelayError::Invalid(format!(
                "Missing required field {name}."
            )));
        }
    }

    let submission = Submission {
        user_name: fields.get("user_name").cloned().unwrap_or_default(),
        user_email: fields.get("user_email").cloned().unwrap_or_default(),
        user_subject: fields.get("user_subject").cloned().unwrap_or_default(),
        user_message: fields.get("user_message").cloned().unwrap_or_default(),
    };

    if !valid_email(&submission.user_email) {
        return Err(RelayError::Invalid("Invalid email address.".to_string()));
    }

    let outcome = turnstile::verify(&state.http, &state.globals, &token, client_ip.as_deref()).await?;

    if !outcome.success {
        debug!("Turnstile rejected the token: {:?}", outcome.error_codes);

        return Err(RelayError::Invalid("Captcha failed".to_string()));
    }

    emailjs::send(&state.http, &state.globals, &submission).await?;

    Ok(Json(json!({ "success": true })))
}

// Accepts both encodings the browsers send for forms and flattens them into
// one field map. Encoding errors bubble up to the 500 boundary.
async fn form_fields(request: Request) -> anyhow::Result<HashMap<String, String>> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    if is_multipart {
        let mut multipart = Multipart::from_request(request, &()).await?;
        let mut fields = HashMap::new();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };
            fields.insert(name, field.text().await?);
        }

        return Ok(fields);
    }

    let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, &()).await?;

    Ok(pairs.into_iter().collect())
}
