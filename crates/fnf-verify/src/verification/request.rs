use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{parse_calendar_date, EmployeeId, EmployeeRecord, SubmittedData};

pub const MAX_TEXT_LENGTH: usize = 200;

/// Raw verification payload as posted by a verifier.
///
/// Every field is optional at the wire level so that shape problems surface as per-field
/// validation errors instead of opaque deserialization failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub entity_name: Option<String>,
    #[serde(default)]
    pub date_of_joining: Option<String>,
    #[serde(default)]
    pub date_of_leaving: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub exit_reason: Option<String>,
    #[serde(default)]
    pub consent_given: Option<bool>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub employee_id: EmployeeId,
    pub submitted: SubmittedData,
}

impl VerificationRequest {
    pub fn validate(self) -> Result<ValidatedRequest, ValidationError> {
        let mut errors = Vec::new();

        let employee_id = EmployeeId::new(self.employee_id.as_deref().unwrap_or_default());
        if employee_id.is_empty() {
            errors.push(FieldError::new("employee_id", "employee_id is required"));
        }

        if self.consent_given != Some(true) {
            errors.push(FieldError::new(
                "consent_given",
                "consent must be given to proceed with verification",
            ));
        }

        let name = text_field("name", self.name, &mut errors);
        let entity_name = text_field("entity_name", self.entity_name, &mut errors);
        let designation = text_field("designation", self.designation, &mut errors);
        let exit_reason = text_field("exit_reason", self.exit_reason, &mut errors);
        let date_of_joining = date_field("date_of_joining", self.date_of_joining, &mut errors);
        let date_of_leaving = date_field("date_of_leaving", self.date_of_leaving, &mut errors);

        if let (Some(joined), Some(left)) = (date_of_joining, date_of_leaving) {
            if left < joined {
                errors.push(FieldError::new(
                    "date_of_leaving",
                    "date_of_leaving cannot be earlier than date_of_joining",
                ));
            }
        }

        if !errors.is_empty() {
            return Err(ValidationError(errors));
        }

        Ok(ValidatedRequest {
            employee_id,
            submitted: SubmittedData {
                name,
                entity_name,
                date_of_joining,
                date_of_leaving,
                designation,
                exit_reason,
                consent_given: true,
            },
        })
    }
}

/// Shape checks applied to admin-managed employee records.
pub fn validate_employee(record: &EmployeeRecord) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    if record.employee_id.is_empty() {
        errors.push(FieldError::new("employee_id", "employee_id is required"));
    }
    if record.name.trim().is_empty() {
        errors.push(FieldError::new("name", "name is required"));
    }
    if let Some(left) = record.date_of_leaving {
        if left < record.date_of_joining {
            errors.push(FieldError::new(
                "date_of_leaving",
                "date_of_leaving cannot be earlier than date_of_joining",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError(errors))
    }
}

fn text_field(
    field: &'static str,
    value: Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let value = value.filter(|value| !value.trim().is_empty())?;
    if value.chars().count() > MAX_TEXT_LENGTH {
        errors.push(FieldError::new(
            field,
            format!("{field} must be at most {MAX_TEXT_LENGTH} characters"),
        ));
        return None;
    }
    Some(value)
}

fn date_field(
    field: &'static str,
    value: Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<chrono::NaiveDate> {
    let value = value.filter(|value| !value.trim().is_empty())?;
    match parse_calendar_date(&value) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new(
                field,
                format!("{field} must be a date (YYYY-MM-DD)"),
            ));
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// One or more field-level problems with an inbound payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub Vec<FieldError>);

impl ValidationError {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self
            .0
            .iter()
            .map(|error| error.field.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "validation failed for {fields}")
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request() -> VerificationRequest {
        VerificationRequest {
            employee_id: Some(" e001 ".to_string()),
            name: Some("Jane Doe".to_string()),
            date_of_joining: Some("2019-04-01".to_string()),
            consent_given: Some(true),
            ..VerificationRequest::default()
        }
    }

    #[test]
    fn valid_request_normalizes_id_and_drops_blank_fields() {
        let mut raw = request();
        raw.designation = Some("   ".to_string());

        let validated = raw.validate().expect("request is valid");

        assert_eq!(validated.employee_id.as_str(), "E001");
        assert_eq!(validated.submitted.designation, None);
        assert_eq!(
            validated.submitted.date_of_joining,
            NaiveDate::from_ymd_opt(2019, 4, 1)
        );
        assert!(validated.submitted.consent_given);
    }

    #[test]
    fn missing_consent_and_id_are_reported_together() {
        let raw = VerificationRequest {
            consent_given: Some(false),
            ..VerificationRequest::default()
        };

        let err = raw.validate().expect_err("request rejected");
        let fields: Vec<_> = err.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["employee_id", "consent_given"]);
    }

    #[test]
    fn malformed_dates_and_inverted_ranges_are_rejected() {
        let mut raw = request();
        raw.date_of_leaving = Some("yesterday".to_string());
        let err = raw.validate().expect_err("bad date rejected");
        assert_eq!(err.errors()[0].field, "date_of_leaving");

        let mut raw = request();
        raw.date_of_leaving = Some("2018-01-01".to_string());
        let err = raw.validate().expect_err("inverted range rejected");
        assert!(err.errors()[0].message.contains("earlier"));
    }

    #[test]
    fn text_fields_are_limited_to_max_length() {
        let mut raw = request();
        raw.name = Some("a".repeat(MAX_TEXT_LENGTH));
        let validated = raw.validate().expect("limit is inclusive");
        assert_eq!(
            validated.submitted.name.map(|name| name.chars().count()),
            Some(MAX_TEXT_LENGTH)
        );

        let mut raw = request();
        raw.name = Some("a".repeat(MAX_TEXT_LENGTH + 1));
        let err = raw.validate().expect_err("overlong name rejected");
        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.errors()[0].field, "name");
        assert!(err.errors()[0].message.contains("200"));
    }
}
