pub mod contact;
pub use self::contact::relay;


// common functions for the handlers
use regex::Regex;

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .map_or(false, |re| re.is_match(email))
}
