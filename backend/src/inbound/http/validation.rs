//! Shared validation helpers for inbound HTTP adapters.
//!
//! Identifier messages match what the dashboard frontend displays:
//! `"Customer Id cannot be empty"` for a missing query parameter and
//! `"Customer Id cannot be 0"` for a zero value, in query strings and bodies
//! alike.

use serde_json::json;

use crate::domain::{AccountValidationError, BillingPeriodError, EntityId, Error};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
    EmptyField,
    InvalidDate,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::EmptyField => "empty_field",
            ErrorCode::InvalidDate => "invalid_date",
        }
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code.as_str(),
        }))
    }
}

/// Parse a required identifier from a query parameter.
pub(crate) fn required_id<T: EntityId>(raw: Option<&str>) -> Result<T, Error> {
    let value = raw.unwrap_or_default();
    if value.is_empty() {
        return Err(ValidationError::new(T::FIELD, format!("{} cannot be empty", T::LABEL))
            .with_code(ErrorCode::MissingField));
    }
    let parsed = value.trim().parse::<i32>().map_err(|_| {
        ValidationError::new(T::FIELD, format!("{} must be an integer", T::LABEL))
            .with_value(ErrorCode::InvalidId, value)
    })?;
    body_id(parsed)
}

/// Validate an identifier taken from a JSON body, where absence reads as 0.
pub(crate) fn body_id<T: EntityId>(raw: i32) -> Result<T, Error> {
    T::try_new(raw).map_err(Error::from)
}

pub(crate) fn account_field_error(err: AccountValidationError) -> Error {
    ValidationError::new(err.field(), err.to_string()).with_code(ErrorCode::EmptyField)
}

pub(crate) fn billing_date_error(err: BillingPeriodError) -> Error {
    let message = err.to_string();
    match err {
        BillingPeriodError::Unparseable { input } => ValidationError::new("currentDate", message)
            .with_value(ErrorCode::InvalidDate, &input),
        BillingPeriodError::OutOfRange => {
            ValidationError::new("currentDate", message).with_code(ErrorCode::InvalidDate)
        }
    }
}
