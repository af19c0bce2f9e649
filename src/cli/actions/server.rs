use crate::{cli::globals::GlobalArgs, relay};
use anyhow::Result;
use secrecy::SecretString;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub turnstile_url: String,
    pub turnstile_secret: SecretString,
    pub emailjs_url: String,
    pub emailjs_service_id: String,
    pub emailjs_template_id: String,
    pub emailjs_user_id: String,
    pub emailjs_access_token: SecretString,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the HTTP client cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let port = args.port;

    let globals = GlobalArgs {
        turnstile_url: args.turnstile_url,
        turnstile_secret: args.turnstile_secret,
        emailjs_url: args.emailjs_url,
        emailjs_service_id: args.emailjs_service_id,
        emailjs_template_id: args.emailjs_template_id,
        emailjs_user_id: args.emailjs_user_id,
        emailjs_access_token: args.emailjs_access_token,
    };

    relay::new(port, globals).await
}

// Secrets stay out of the startup log; SecretString redacts them in Debug anyway.
fn log_startup_args(args: &Args) {
    info!(
        port = args.port,
        turnstile_url = %args.turnstile_url,
        emailjs_url = %args.emailjs_url,
        emailjs_service_id = %args.emailjs_service_id,
        emailjs_template_id = %args.emailjs_template_id,
        emailjs_user_id = %args.emailjs_user_id,
        "Startup configuration"
    );
}
