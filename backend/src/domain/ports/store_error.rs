//! Error shared by every relational store port.

use super::define_port_error;

define_port_error! {
    /// Failures raised by relational store adapters.
    pub enum StoreError {
        /// The database could not be reached or a connection was lost.
        Connection { message: String } => "store connection failed: {message}",
        /// A statement failed or returned data the domain cannot accept.
        Query { message: String } => "store query failed: {message}",
        /// A unique constraint rejected the write.
        Duplicate { constraint: String } => "unique constraint {constraint} violated",
    }
}

impl From<StoreError> for crate::domain::Error {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Connection { message } => {
                tracing::warn!(%message, "relational store unreachable");
                Self::service_unavailable("database unavailable")
            }
            StoreError::Query { message } => Self::internal(message),
            StoreError::Duplicate { constraint } => {
                Self::conflict("record already exists")
                    .with_details(serde_json::json!({ "constraint": constraint }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Error, ErrorCode};
    use rstest::rstest;

    #[rstest]
    #[case(StoreError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(StoreError::query("syntax error"), ErrorCode::InternalError)]
    #[case(StoreError::duplicate("customers_email_key"), ErrorCode::Conflict)]
    fn maps_to_domain_codes(#[case] error: StoreError, #[case] expected: ErrorCode) {
        assert_eq!(Error::from(error).code(), expected);
    }
}
