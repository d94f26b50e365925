use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref URL_RE: Regex = Regex::new(r"^https?://[^\s/?#]+\.[^\s/?#]+(?:[/?#]\S*)?$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Absolute http(s) URL with a dotted host.
pub fn is_valid_url(url: &str) -> bool {
    URL_RE.is_match(url)
}

/// At least 8 characters with a lowercase letter, an uppercase letter and a digit.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Accumulates per-field validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|e| e.field)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Trims `value`; records an error when the result is empty.
    pub fn required(&mut self, field: &'static str, value: &str) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.push(field, format!("{field} is required"));
        }
        trimmed.to_owned()
    }

    /// Normalises an optional URL field: blank becomes `None`, anything else must parse.
    pub fn optional_url(&mut self, field: &'static str, value: Option<&str>) -> Option<String> {
        let trimmed = value.map(str::trim).filter(|v| !v.is_empty())?;
        if !is_valid_url(trimmed) {
            self.push(field, "must be a valid http(s) URL");
        }
        Some(trimmed.to_owned())
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Trims entries, drops blanks and repeated values, keeping first-seen order.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if !out.iter().any(|seen| seen == tag) {
            out.push(tag.to_owned());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_format() {
        assert!(is_valid_email("dev@example.com"));
        assert!(!is_valid_email("dev@example"));
        assert!(!is_valid_email("dev example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn url_format() {
        assert!(is_valid_url("https://github.com/ada/engine"));
        assert!(is_valid_url("http://demo.example.org"));
        assert!(!is_valid_url("github.com/ada"));
        assert!(!is_valid_url("ftp://files.example.org"));
        assert!(!is_valid_url("https://localhost"));
    }

    #[test]
    fn password_strength() {
        assert!(is_strong_password("Secur3Pass"));
        assert!(!is_strong_password("short1A"));
        assert!(!is_strong_password("alllowercase1"));
        assert!(!is_strong_password("NoDigitsHere"));
    }

    #[test]
    fn required_and_optional_url_collect_errors() {
        let mut errors = ValidationErrors::new();
        assert_eq!(errors.required("title", "  Engine "), "Engine");
        errors.required("description", "   ");
        assert_eq!(errors.optional_url("githubUrl", Some("  ")), None);
        errors.optional_url("demoUrl", Some("not a url"));

        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec!["description", "demoUrl"]);
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn normalize_tags_dedupes_in_order() {
        let tags = vec![" Rust".into(), "Go".into(), "".into(), "Rust".into(), "rust".into()];
        assert_eq!(normalize_tags(&tags), vec!["Rust", "Go", "rust"]);
    }
}
