use crate::{cli::globals::GlobalArgs, relay::Submission};
use anyhow::{bail, Result};
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::{error, instrument};

/// Relay a validated submission to the delivery endpoint.
///
/// A non-2xx answer is logged with the diagnostic body and turned into an
/// error; the caller never sees the upstream detail.
///
/// # Errors
///
/// Returns an error if the call fails or the service answers non-2xx.
#[instrument(skip_all)]
pub async fn send(
    client: &reqwest::Client,
    globals: &GlobalArgs,
    submission: &Submission,
) -> Result<()> {
    let payload = json!({
        "service_id": globals.emailjs_service_id,
        "template_id": globals.emailjs_template_id,
        "user_id": globals.emailjs_user_id,
        "accessToken": globals.emailjs_access_token.expose_secret(),
        "template_params": submission,
    });

    let response = client
        .post(&globals.emailjs_url)
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        error!("Delivery rejected: {status} {body}");

        bail!("email delivery failed with status {status}");
    }

    Ok(())
}
