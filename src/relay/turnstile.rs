use crate::cli::globals::GlobalArgs;
use anyhow::Result;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;

/// Outcome of a siteverify call. Only `success` drives control flow; the
/// error codes are kept for server-side logging.
#[derive(Debug, Deserialize)]
pub struct SiteVerify {
    pub success: bool,
    #[serde(rename = "error-codes", default)]
    pub error_codes: Vec<String>,
}

/// Ask the verification endpoint whether the challenge token was solved.
///
/// `remote_ip` comes from the edge-supplied connecting-IP header and is
/// omitted from the form entirely when the header was absent.
///
/// # Errors
///
/// Returns an error if the call fails, answers non-2xx, or the reply is not
/// the expected JSON.
#[instrument(skip_all)]
pub async fn verify(
    client: &reqwest::Client,
    globals: &GlobalArgs,
    token: &str,
    remote_ip: Option<&str>,
) -> Result<SiteVerify> {
    let mut form = vec![
        ("secret", globals.turnstile_secret.expose_secret()),
        ("response", token),
    ];

    if let Some(ip) = remote_ip {
        form.push(("remoteip", ip));
    }

    let outcome = client
        .post(&globals.turnstile_url)
        .form(&form)
        .send()
        .await?
        .error_for_status()?
        .json::<SiteVerify>()
        .await?;

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn globals(turnstile_url: String) -> GlobalArgs {
        GlobalArgs {
            turnstile_url,
            turnstile_secret: SecretString::from("0x4AAA"),
            emailjs_url: "https://api.emailjs.com/api/v1.0/email/send".to_string(),
            emailjs_service_id: "service_abc".to_string(),
            emailjs_template_id: "template_abc".to_string(),
            emailjs_user_id: "user_abc".to_string(),
            emailjs_access_token: SecretString::from("token_abc"),
        }
    }

    #[tokio::test]
    async fn verify_forwards_secret_token_and_remoteip() -> Result<()> {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/siteverify"))
            .and(body_string_contains("secret=0x4AAA"))
            .and(body_string_contains("response=tok-123"))
            .and(body_string_contains("remoteip=203.0.113.9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let globals = globals(format!("{}/siteverify", server.uri()));
        let client = reqwest::Client::new();

        let outcome = verify(&client, &globals, "tok-123", Some("203.0.113.9")).await?;
        assert!(outcome.success);
        Ok(())
    }

    #[tokio::test]
    async fn verify_omits_remoteip_when_absent() -> Result<()> {
        let server = MockServer::start().await;

        // A form carrying remoteip must not match; mounted first so it would
        // shadow the generic mock if the field were ever sent.
        Mock::given(method("POST"))
            .and(path("/siteverify"))
            .and(body_string_contains("remoteip"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(0)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/siteverify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let globals = globals(format!("{}/siteverify", server.uri()));
        let client = reqwest::Client::new();

        let outcome = verify(&client, &globals, "tok-123", None).await?;
        assert!(outcome.success);
        Ok(())
    }

    #[tokio::test]
    async fn verify_surfaces_rejection_with_error_codes() -> Result<()> {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/siteverify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error-codes": ["invalid-input-response"],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let globals = globals(format!("{}/siteverify", server.uri()));
        let client = reqwest::Client::new();

        let outcome = verify(&client, &globals, "bad-token", None).await?;
        assert!(!outcome.success);
        assert_eq!(outcome.error_codes, vec!["invalid-input-response"]);
        Ok(())
    }

    #[tokio::test]
    async fn verify_errors_on_non_2xx() -> Result<()> {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/siteverify"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let globals = globals(format!("{}/siteverify", server.uri()));
        let client = reqwest::Client::new();

        let result = verify(&client, &globals, "tok-123", None).await;
        assert!(result.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn verify_errors_on_malformed_reply() -> Result<()> {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/siteverify"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .expect(1)
            .mount(&server)
            .await;

        let globals = globals(format!("{}/siteverify", server.uri()));
        let client = reqwest::Client::new();

        let result = verify(&client, &globals, "tok-123", None).await;
        assert!(result.is_err());
        Ok(())
    }
}
