use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub const TURNSTILE_VERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";
pub const EMAILJS_SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("buzon")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("BUZON_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("turnstile-secret")
                .long("turnstile-secret")
                .help("Turnstile secret key used for siteverify calls")
                .env("BUZON_TURNSTILE_SECRET")
                .required(true),
        )
        .arg(
            Arg::new("turnstile-url")
                .long("turnstile-url")
                .help("Turnstile verification endpoint")
                .default_value(TURNSTILE_VERIFY_URL)
                .env("BUZON_TURNSTILE_URL"),
        )
        .arg(
            Arg::new("emailjs-service-id")
                .long("emailjs-service-id")
                .help("EmailJS service id")
                .env("BUZON_EMAILJS_SERVICE_ID")
                .required(true),
        )
        .arg(
            Arg::new("emailjs-template-id")
                .long("emailjs-template-id")
                .help("EmailJS template id")
                .env("BUZON_EMAILJS_TEMPLATE_ID")
                .required(true),
        )
        .arg(
            Arg::new("emailjs-user-id")
                .long("emailjs-user-id")
                .help("EmailJS account (public key) id")
                .env("BUZON_EMAILJS_USER_ID")
                .required(true),
        )
        .arg(
            Arg::new("emailjs-access-token")
                .long("emailjs-access-token")
                .help("EmailJS private access token")
                .env("BUZON_EMAILJS_ACCESS_TOKEN")
                .required(true),
        )
        .arg(
            Arg::new("emailjs-url")
                .long("emailjs-url")
                .help("EmailJS send endpoint")
                .default_value(EMAILJS_SEND_URL)
                .env("BUZON_EMAILJS_URL"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("BUZON_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
