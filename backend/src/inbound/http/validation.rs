//! Request field parsing for the inbound HTTP adapters.
//!
//! Request DTOs carry raw strings; these helpers turn them into domain values
//! and report failures as `invalid_request` errors whose details name the
//! offending `field` and a machine-readable `code`.

use std::str::FromStr;

use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Wire name of a request field, as the client spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn missing(self) -> Error {
        let name = self.0;
        Error::invalid_request(format!("missing required field: {name}"))
            .with_details(json!({ "field": name, "code": "missing_field" }))
    }

    fn rejected(self, message: String, code: &'static str, value: &str) -> Error {
        Error::invalid_request(message).with_details(json!({
            "field": self.0,
            "value": value,
            "code": code,
        }))
    }
}

/// Require an optional DTO field.
pub(crate) fn require_field<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| field.missing())
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        field.rejected(format!("{} must be a valid UUID", field.0), "invalid_uuid", value)
    })
}

/// Parse a string into a closed domain enum such as a difficulty.
pub(crate) fn parse_value<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value.parse().map_err(|_| {
        field.rejected(
            format!("{} has an unsupported value", field.0),
            "invalid_value",
            value,
        )
    })
}
