use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Regex patterns used for PII redaction in log output.
///
/// All patterns are vetted literals; construction cannot fail.
pub struct PiiRegexRegistry;

impl PiiRegexRegistry {
    pub fn email() -> &'static Regex {
        static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
        });
        &EMAIL_REGEX
    }

    /// International or local phone numbers, 7 to 15 digits with an optional `+`.
    pub fn phone() -> &'static Regex {
        static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\+?\b\d{7,15}\b").unwrap()
        });
        &PHONE_REGEX
    }

    /// Three dot-separated base64url segments, as in a JWT.
    pub fn jwt() -> &'static Regex {
        static JWT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\b").unwrap()
        });
        &JWT_REGEX
    }

    /// Opaque base64-like runs of 24 or more characters.
    pub fn opaque_token() -> &'static Regex {
        static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9+/]{24,}={0,2}").unwrap()
        });
        &TOKEN_REGEX
    }
}

fn mask_email(full: &str) -> String {
    match full.find('@') {
        Some(0) | None => full.to_string(),
        Some(at) => format!("{}***{}", &full[..1], &full[at..]),
    }
}

fn mask_phone(full: &str) -> String {
    let digits = full.trim_start_matches('+');
    let tail = &digits[digits.len().saturating_sub(2)..];
    format!("***{tail}")
}

/// Masks emails, phone numbers, and bearer tokens in `input`.
///
/// Emails keep their first character and domain; phones keep their last two
/// digits; tokens become `[REDACTED_TOKEN]`. Tokens are handled first so a
/// JWT segment is never half-masked as a phone.
pub fn redact(input: &str) -> String {
    let out = PiiRegexRegistry::jwt().replace_all(input, "[REDACTED_TOKEN]");
    let out = PiiRegexRegistry::opaque_token().replace_all(&out, "[REDACTED_TOKEN]");
    let out = PiiRegexRegistry::email()
        .replace_all(&out, |caps: &regex::Captures| mask_email(&caps[0]));
    PiiRegexRegistry::phone()
        .replace_all(&out, |caps: &regex::Captures| mask_phone(&caps[0]))
        .into_owned()
}

/// Display wrapper that redacts on format.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
