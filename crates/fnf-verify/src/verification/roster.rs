//! CSV roster import used by admins to seed the employee directory.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{parse_calendar_date, EmployeeId, EmployeeRecord};
use super::repository::{EmployeeDirectory, RepositoryError};

#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read employee roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid employee roster CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("roster row {row}: {message}")]
    InvalidRow { row: usize, message: String },
    #[error("could not store roster row: {0}")]
    Repository(#[from] RepositoryError),
}

pub struct EmployeeRosterImporter;

impl EmployeeRosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<EmployeeRecord>, RosterImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<EmployeeRecord>, RosterImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for (index, row) in csv_reader.deserialize::<RosterRow>().enumerate() {
            let row = row?;
            records.push(row.into_record(index + 1)?);
        }

        Ok(records)
    }

    /// Upsert every roster row into the directory, returning how many were stored.
    pub fn seed<D: EmployeeDirectory + ?Sized>(
        directory: &D,
        records: Vec<EmployeeRecord>,
    ) -> Result<usize, RosterImportError> {
        let count = records.len();
        for record in records {
            directory.upsert(record)?;
        }
        Ok(count)
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Employee ID")]
    employee_id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Entity Name", default)]
    entity_name: String,
    #[serde(rename = "Designation", default)]
    designation: String,
    #[serde(
        rename = "Department",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    department: Option<String>,
    #[serde(rename = "Date of Joining")]
    date_of_joining: String,
    #[serde(
        rename = "Date of Leaving",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    date_of_leaving: Option<String>,
    #[serde(rename = "Exit Reason", default)]
    exit_reason: String,
}

impl RosterRow {
    fn into_record(self, row: usize) -> Result<EmployeeRecord, RosterImportError> {
        let employee_id = EmployeeId::new(&self.employee_id);
        if employee_id.is_empty() {
            return Err(RosterImportError::InvalidRow {
                row,
                message: "missing employee id".to_string(),
            });
        }

        let invalid = |message: String| RosterImportError::InvalidRow { row, message };
        let date_of_joining = parse_calendar_date(&self.date_of_joining).map_err(invalid)?;
        let date_of_leaving = self
            .date_of_leaving
            .as_deref()
            .map(parse_calendar_date)
            .transpose()
            .map_err(invalid)?;

        Ok(EmployeeRecord {
            employee_id,
            name: self.name,
            entity_name: self.entity_name,
            designation: self.designation,
            department: self.department,
            date_of_joining,
            date_of_leaving,
            exit_reason: self.exit_reason,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|value| !value.trim().is_empty()))
}
