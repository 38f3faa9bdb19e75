//! Typed identifiers for stored entities.
//!
//! Every identifier is a positive 32-bit integer. Zero is the "missing"
//! sentinel clients send when a field is absent, so construction rejects it
//! with the message the dashboard frontend expects.

use serde::Serialize;
use utoipa::ToSchema;
use thiserror::Error;

use super::Error;

/// Reasons an identifier was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdValidationError {
    /// The identifier was zero or absent.
    #[error("{label} cannot be 0")]
    Zero {
        /// Human label such as `Customer Id`.
        label: &'static str,
        /// Request field carrying the identifier.
        field: &'static str,
    },
    /// The identifier was negative.
    #[error("{label} must be positive")]
    Negative {
        /// Human label such as `Customer Id`.
        label: &'static str,
        /// Request field carrying the identifier.
        field: &'static str,
    },
}

impl IdValidationError {
    /// Request field the identifier came from.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Zero { field, .. } | Self::Negative { field, .. } => field,
        }
    }
}

impl From<IdValidationError> for Error {
    fn from(value: IdValidationError) -> Self {
        let code = match value {
            IdValidationError::Zero { .. } => "zero_id",
            IdValidationError::Negative { .. } => "negative_id",
        };
        Self::invalid_request(value.to_string())
            .with_details(serde_json::json!({ "field": value.field(), "code": code }))
    }
}

/// Shared surface of the identifier newtypes, used by adapters that validate
/// identifiers generically.
pub trait EntityId: Sized + Copy {
    /// Human label used in validation messages, e.g. `Customer Id`.
    const LABEL: &'static str;
    /// Request field name carrying this identifier.
    const FIELD: &'static str;

    /// Validate a raw identifier.
    fn try_new(raw: i32) -> Result<Self, IdValidationError>;
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal, $field:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Human label used in validation messages.
            pub const LABEL: &'static str = $label;
            /// Request field name carrying this identifier.
            pub const FIELD: &'static str = $field;

            /// Validate a raw identifier.
            pub fn new(raw: i32) -> Result<Self, IdValidationError> {
                match raw {
                    0 => Err(IdValidationError::Zero {
                        label: $label,
                        field: $field,
                    }),
                    r if r < 0 => Err(IdValidationError::Negative {
                        label: $label,
                        field: $field,
                    }),
                    r => Ok(Self(r)),
                }
            }

            /// Raw database value.
            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl EntityId for $name {
            const LABEL: &'static str = $label;
            const FIELD: &'static str = $field;

            fn try_new(raw: i32) -> Result<Self, IdValidationError> {
                Self::new(raw)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = IdValidationError;

            fn try_from(raw: i32) -> Result<Self, Self::Error> {
                Self::new(raw)
            }
        }
    };
}

define_id!(
    /// Identifier of a registered customer.
    CustomerId,
    "Customer Id",
    "customerId"
);
define_id!(
    /// Identifier of a physical location (address record).
    LocationId,
    "Location Id",
    "locationId"
);
define_id!(
    /// Identifier of a customer's service location.
    ServiceLocationId,
    "Service Location Id",
    "serviceLocationId"
);
define_id!(
    /// Identifier of a catalog device.
    DeviceId,
    "Device Id",
    "deviceId"
);
define_id!(
    /// Identifier of a device enrolled at a service location.
    EnrolledDeviceId,
    "Enrolled Device Id",
    "enrolledDeviceId"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(0, "Customer Id cannot be 0")]
    #[case(-4, "Customer Id must be positive")]
    fn rejects_non_positive_customer_ids(#[case] raw: i32, #[case] message: &str) {
        let err = CustomerId::new(raw).expect_err("non-positive id");
        assert_eq!(err.to_string(), message);
    }

    #[rstest]
    fn zero_enrolled_device_id_keeps_frontend_message() {
        let err = EnrolledDeviceId::new(0).expect_err("zero id");
        assert_eq!(err.to_string(), "Enrolled Device Id cannot be 0");
        assert_eq!(err.field(), "enrolledDeviceId");
    }

    #[rstest]
    fn accepts_positive_ids() {
        let id = ServiceLocationId::new(7).expect("positive id");
        assert_eq!(id.get(), 7);
        assert_eq!(id.to_string(), "7");
    }

    #[rstest]
    fn entity_id_exposes_label_and_field() {
        assert_eq!(<ServiceLocationId as EntityId>::LABEL, "Service Location Id");
        assert_eq!(<ServiceLocationId as EntityId>::FIELD, "serviceLocationId");
        assert_eq!(DeviceId::try_new(3).map(DeviceId::get), Ok(3));
    }

    #[rstest]
    fn converts_into_invalid_request_with_field_details() {
        let err: Error = DeviceId::new(0).expect_err("zero id").into();
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Device Id cannot be 0");
        assert_eq!(
            err.details(),
            Some(&serde_json::json!({ "field": "deviceId", "code": "zero_id" }))
        );
    }
}
