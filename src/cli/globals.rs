use secrecy::SecretString;

/// Read-only configuration shared by every invocation of the relay handler.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub turnstile_url: String,
    pub turnstile_secret: SecretString,
    pub emailjs_url: String,
    pub emailjs_service_id: String,
    pub emailjs_template_id: String,
    pub emailjs_user_id: String,
    pub emailjs_access_token: SecretString,
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs {
            turnstile_url: "https://challenges.cloudflare.com/turnstile/v0/siteverify".to_string(),
            turnstile_secret: SecretString::from("0x4AAA"),
            emailjs_url: "https://api.emailjs.com/api/v1.0/email/send".to_string(),
            emailjs_service_id: "service_abc".to_string(),
            emailjs_template_id: "template_abc".to_string(),
            emailjs_user_id: "user_abc".to_string(),
            emailjs_access_token: SecretString::from("tok"),
        };

        assert_eq!(args.turnstile_secret.expose_secret(), "0x4AAA");
        assert_eq!(args.emailjs_service_id, "service_abc");

        // Secrets must not leak through Debug
        let debug = format!("{args:?}");
        assert!(!debug.contains("0x4AAA"));
    }
}
