//! Request input validation
//!
//! Field checks accumulate per-field messages into [`ValidationErrors`];
//! handlers turn a non-empty set into a 422 response. Messages follow the
//! wording clients already display, so keep them stable.

use crate::error::ServerError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Per-field validation messages, ordered by field name
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure message against a field
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a field has at least one failure recorded
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Convert into a handler result: `Ok` when no failures were recorded
    pub fn into_result(self) -> Result<(), ServerError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ServerError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, " ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// The field must be present with `min..=max` characters
pub fn required_string(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    min: usize,
    max: usize,
) {
    match value {
        None => errors.add(field, format!("The {} field is required.", field)),
        Some(v) if v.chars().count() < min => errors.add(
            field,
            format!("The {} must be at least {} characters.", field, min),
        ),
        Some(v) if v.chars().count() > max => errors.add(
            field,
            format!("The {} may not be greater than {} characters.", field, max),
        ),
        Some(_) => {}
    }
}

/// When present, the field must not exceed `max` characters
pub fn optional_string(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) {
    if let Some(v) = value {
        if v.chars().count() > max {
            errors.add(
                field,
                format!("The {} may not be greater than {} characters.", field, max),
            );
        }
    }
}

/// When present, the field must be an integer of at least `min`
pub fn optional_int_min(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<i64>,
    min: i64,
) {
    if let Some(v) = value {
        if v < min {
            errors.add(field, format!("The {} must be at least {}.", field, min));
        }
    }
}

/// When present, the field must be an integer inside `min..=max`
pub fn optional_int_range(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<i64>,
    min: i64,
    max: i64,
) {
    if let Some(v) = value {
        if v < min || v > max {
            errors.add(
                field,
                format!("The {} must be between {} and {}.", field, min, max),
            );
        }
    }
}

/// Parse a raw text field as an integer, recording a failure on garbage.
///
/// Multipart form fields always arrive as text, so numeric fields pass
/// through here before the range checks.
pub fn parse_int(errors: &mut ValidationErrors, field: &str, value: Option<&str>) -> Option<i64> {
    let raw = value?;
    match raw.trim().parse::<i64>() {
        Ok(v) => Some(v),
        Err(_) => {
            errors.add(field, format!("The {} must be an integer.", field));
            None
        }
    }
}

/// The field must be present and shaped like an email address
pub fn required_email(errors: &mut ValidationErrors, field: &str, value: Option<&str>, max: usize) {
    match value {
        None => errors.add(field, format!("The {} field is required.", field)),
        Some(v) => {
            if v.chars().count() > max {
                errors.add(
                    field,
                    format!("The {} may not be greater than {} characters.", field, max),
                );
            }
            if !looks_like_email(v) {
                errors.add(
                    field,
                    format!("The {} must be a valid email address.", field),
                );
            }
        }
    }
}

/// The field must be present, at least `min` characters, and match its
/// `_confirmation` companion
pub fn required_confirmed(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    confirmation: Option<&str>,
    min: usize,
) {
    match value {
        None => errors.add(field, format!("The {} field is required.", field)),
        Some(v) => {
            if v.chars().count() < min {
                errors.add(
                    field,
                    format!("The {} must be at least {} characters.", field, min),
                );
            }
            if confirmation != Some(v) {
                errors.add(field, format!("The {} confirmation does not match.", field));
            }
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}
