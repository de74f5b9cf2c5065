//! Form validation shared by the REST API and the client.

use axum_helpers::errors::json_field_name;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use validator::{ValidationError, ValidationErrors};

/// Loose address shape: `local@domain.tld` without whitespace
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Minimum trimmed length of claim ownership details.
pub const MIN_CLAIM_DETAILS: usize = 8;

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

pub(crate) fn is_valid_email(value: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

pub(crate) fn claim_details(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < MIN_CLAIM_DETAILS {
        return Err(ValidationError::new("too_short"));
    }
    Ok(())
}

/// One human-readable message per invalid field, keyed by wire name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::default();
        errors.insert(field, message);
        errors
    }

    pub fn insert(&mut self, field: &str, message: &str) {
        self.0.insert(json_field_name(field), message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut out = Self::default();
        for (field, errs) in errors.field_errors() {
            let message = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Invalid".to_string());
            out.insert(field.as_ref(), &message);
        }
        out
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b.co").is_ok());
        assert!(is_valid_email(" student@campus.edu ").is_ok());
        assert!(is_valid_email("bad-email").is_err());
        assert!(is_valid_email("a b@c.de").is_err());
        assert!(is_valid_email("a@b").is_err());
    }

    #[test]
    fn test_claim_details_counts_trimmed_chars() {
        assert!(claim_details("12345678").is_ok());
        assert!(claim_details("   1234567   ").is_err());
    }

    #[test]
    fn test_field_names_are_camel_cased() {
        let errors = FieldErrors::single("date_found", "Required");
        assert_eq!(errors.get("dateFound"), Some("Required"));
        assert_eq!(errors.to_string(), "dateFound: Required");
    }
}
