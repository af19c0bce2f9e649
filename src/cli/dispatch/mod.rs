use crate::cli::actions::{server::Args, Action};
use anyhow::{Context, Result};
use secrecy::SecretString;
use url::Url;

/// # Errors
/// Returns an error if required arguments are missing or an endpoint URL is malformed.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);

    let turnstile_secret = required(matches, "turnstile-secret")?;
    let emailjs_service_id = required(matches, "emailjs-service-id")?;
    let emailjs_template_id = required(matches, "emailjs-template-id")?;
    let emailjs_user_id = required(matches, "emailjs-user-id")?;
    let emailjs_access_token = required(matches, "emailjs-access-token")?;

    // A bad endpoint override should fail at startup, not per request.
    let turnstile_url = endpoint(matches, "turnstile-url")?;
    let emailjs_url = endpoint(matches, "emailjs-url")?;

    Ok(Action::Server(Args {
        port,
        turnstile_url,
        turnstile_secret: SecretString::from(turnstile_secret),
        emailjs_url,
        emailjs_service_id,
        emailjs_template_id,
        emailjs_user_id,
        emailjs_access_token: SecretString::from(emailjs_access_token),
    }))
}

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

fn endpoint(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    let value = required(matches, name)?;

    Url::parse(&value).with_context(|| format!("invalid URL for --{name}: {value}"))?;

    Ok(value)
}
