// botdeck-core/src/auth/validation.rs

use once_cell::sync::Lazy;
use regex::Regex;

use crate::Error;

// Same loose syntactic check the dashboards apply: something, an @,
// something, a dot, something. Deliverability is the server's problem.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// Client-side form check run before any network call. A failure here
/// means the login request is never issued.
pub fn validate_login_form(email: &str, password: &str) -> Result<(), Error> {
    let email = email.trim();
    if email.is_empty() {
        return Err(Error::Validation("Please enter your email address".to_string()));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(Error::Validation("Please enter a valid email address".to_string()));
    }
    if password.is_empty() {
        return Err(Error::Validation("Please enter your password".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<(), Error>) -> String {
        match result {
            Err(Error::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn empty_email_is_rejected() {
        assert_eq!(
            message(validate_login_form("", "hunter2")),
            "Please enter your email address"
        );
        // Whitespace-only counts as empty.
        assert_eq!(
            message(validate_login_form("   ", "hunter2")),
            "Please enter your email address"
        );
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["not-an-email", "a@b", "a b@c.com", "@c.com", "a@.com "] {
            assert_eq!(
                message(validate_login_form(bad, "hunter2")),
                "Please enter a valid email address",
                "input: {bad:?}"
            );
        }
    }

    #[test]
    fn empty_password_is_rejected() {
        assert_eq!(
            message(validate_login_form("cat@kittyn.cat", "")),
            "Please enter your password"
        );
    }

    #[test]
    fn well_formed_input_passes() {
        assert!(validate_login_form("cat@kittyn.cat", "hunter2").is_ok());
    }
}
