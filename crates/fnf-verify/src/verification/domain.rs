use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Case-insensitive employee identifier, stored trimmed and upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for EmployeeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EmployeeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}

/// Identity of the third party submitting verification requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerifierId(pub String);

/// Identifier minted by the verification repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationId(pub String);

/// Authoritative employee record owned by the employee directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub employee_id: EmployeeId,
    pub name: String,
    pub entity_name: String,
    pub designation: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(deserialize_with = "deserialize_date")]
    pub date_of_joining: NaiveDate,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date_of_leaving: Option<NaiveDate>,
    #[serde(default)]
    pub exit_reason: String,
}

/// Employment details claimed by a verifier. Absent fields are not compared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_date"
    )]
    pub date_of_joining: Option<NaiveDate>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_date"
    )]
    pub date_of_leaving: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_reason: Option<String>,
    #[serde(default)]
    pub consent_given: bool,
}

/// Parse a calendar date from `YYYY-MM-DD` or a timestamp, discarding the time of day.
///
/// Timestamps with an offset keep the calendar date as written rather than converting to UTC,
/// so `2023-01-15T00:00:00+05:30` is the 15th.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_local().date());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt.date());
        }
    }

    Err(format!("failed to parse '{raw}' as a calendar date"))
}

pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| parse_calendar_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_id_is_trimmed_and_upper_cased() {
        assert_eq!(EmployeeId::new("  e001 ").as_str(), "E001");
        assert_eq!(EmployeeId::new("e001"), EmployeeId::new("E001"));
    }

    #[test]
    fn calendar_dates_ignore_time_of_day() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 15).expect("valid date");
        assert_eq!(parse_calendar_date("2023-01-15"), Ok(expected));
        assert_eq!(parse_calendar_date("2023-01-15T18:30:00Z"), Ok(expected));
        assert_eq!(parse_calendar_date("2023-01-15T00:00:00+05:30"), Ok(expected));
        assert_eq!(parse_calendar_date("2023-01-15T09:00:00.000"), Ok(expected));
        assert!(parse_calendar_date("15/01/2023").is_err());
    }

    #[test]
    fn submitted_data_treats_blank_dates_as_absent() {
        let data: SubmittedData = serde_json::from_str(
            r#"{"name":"Jane Doe","date_of_leaving":"","consent_given":true}"#,
        )
        .expect("payload parses");
        assert_eq!(data.date_of_leaving, None);
        assert_eq!(data.name.as_deref(), Some("Jane Doe"));
        assert!(data.consent_given);
    }
}
