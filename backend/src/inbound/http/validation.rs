//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper produces an `invalid_request` error whose details name the
//! offending JSON field and a stable machine-readable code.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::domain::{Email, Error, MedicineId, start_of_day_utc};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidField,
    InvalidUuid,
    InvalidDate,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidField => "invalid_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String, value: Option<&str>) -> Error {
    let mut details = json!({
        "field": field.as_str(),
        "code": code.as_str(),
    });
    if let Some(value) = value {
        details["value"] = json!(value);
    }
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {}", field.as_str()),
        None,
    )
}

/// Wrap a domain validation failure for `field`.
pub(crate) fn invalid_field_error(field: FieldName, reason: impl std::fmt::Display) -> Error {
    field_error(field, ErrorCode::InvalidField, reason.to_string(), None)
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_email(raw: &str, field: FieldName) -> Result<Email, Error> {
    Email::new(raw).map_err(|err| invalid_field_error(field, err))
}

pub(crate) fn parse_medicine_id(raw: &str, field: FieldName) -> Result<MedicineId, Error> {
    MedicineId::parse(raw).map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            Some(raw),
        )
    })
}

/// Parse a `YYYY-MM-DD` calendar date as midnight UTC.
pub(crate) fn parse_calendar_date(raw: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(start_of_day_utc)
        .map_err(|_| {
            field_error(
                field,
                ErrorCode::InvalidDate,
                format!("{} must be a YYYY-MM-DD date", field.as_str()),
                Some(raw),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    const FIELD: FieldName = FieldName::new("expiryDate");

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details().and_then(|d| d.get(key)).and_then(|v| v.as_str())
    }

    #[test]
    fn missing_field_names_the_field() {
        let error = missing_field_error(FieldName::new("phone"));
        assert_eq!(error.message(), "missing required field: phone");
        assert_eq!(detail(&error, "field"), Some("phone"));
        assert_eq!(detail(&error, "code"), Some("missing_field"));
    }

    #[test]
    fn calendar_dates_start_at_midnight_utc() {
        let parsed = parse_calendar_date("2026-05-17", FIELD).expect("valid date");
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2026, 5, 17, 0, 0, 0).single().expect("timestamp")
        );
    }

    #[rstest]
    #[case::slashes("17/05/2026")]
    #[case::timestamp("2026-05-17T00:00:00Z")]
    #[case::impossible("2026-02-30")]
    fn rejects_non_calendar_dates(#[case] raw: &str) {
        let error = parse_calendar_date(raw, FIELD).expect_err("invalid date");
        assert_eq!(detail(&error, "code"), Some("invalid_date"));
        assert_eq!(detail(&error, "value"), Some(raw));
    }

    #[test]
    fn invalid_medicine_ids_carry_the_value() {
        let error = parse_medicine_id("abc", FieldName::new("medicineId")).expect_err("bad id");
        assert_eq!(detail(&error, "code"), Some("invalid_uuid"));
        assert_eq!(detail(&error, "value"), Some("abc"));
    }

    #[test]
    fn emails_are_normalised() {
        let email = parse_email("  Asha@Example.COM ", FieldName::new("email")).expect("email");
        assert_eq!(email.as_ref(), "asha@example.com");
    }
}
