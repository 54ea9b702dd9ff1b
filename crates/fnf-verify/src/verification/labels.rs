use serde::Serialize;

use super::comparison::{
    tally, ComparedField, ComparisonResult, FieldValue, MatchType, OverallStatus,
};

/// Caller-facing label for a field name. Unknown names are returned unchanged.
pub fn field_label(field: &str) -> &str {
    match field {
        "employee_id" | "employeeId" => "Employee ID",
        "name" => "Full Name",
        "entity_name" | "entityName" => "Entity Name",
        "date_of_joining" | "dateOfJoining" => "Date of Joining",
        "date_of_leaving" | "dateOfLeaving" => "Date of Leaving",
        "designation" => "Designation",
        "exit_reason" | "exitReason" => "Exit Reason",
        "department" => "Department",
        other => other,
    }
}

/// Presentation color for a single field outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchColor {
    Green,
    Red,
}

impl MatchColor {
    pub const fn for_match(is_match: bool) -> Self {
        if is_match {
            Self::Green
        } else {
            Self::Red
        }
    }
}

/// Comparison result annotated for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledComparison {
    pub field: ComparedField,
    pub label: &'static str,
    pub verifier_value: FieldValue,
    pub company_value: Option<FieldValue>,
    pub is_match: bool,
    pub match_type: MatchType,
    pub color: MatchColor,
}

impl From<&ComparisonResult> for LabeledComparison {
    fn from(result: &ComparisonResult) -> Self {
        Self {
            field: result.field,
            label: field_label(result.field.key()),
            verifier_value: result.verifier_value.clone(),
            company_value: result.company_value.clone(),
            is_match: result.is_match,
            match_type: result.match_type,
            color: MatchColor::for_match(result.is_match),
        }
    }
}

pub fn label_results(results: &[ComparisonResult]) -> Vec<LabeledComparison> {
    results.iter().map(LabeledComparison::from).collect()
}

/// One-line summary keyed off the same thresholds as the overall status.
pub fn summary(results: &[ComparisonResult]) -> String {
    let tally = tally(results);
    let (matches, total) = (tally.matches, tally.total);
    match tally.status() {
        OverallStatus::PerfectMatch => "Perfect Match - All fields match our records".to_string(),
        OverallStatus::PartialMatch => {
            format!("Partial Match - {matches} of {total} fields match")
        }
        OverallStatus::SignificantMismatch => {
            format!("Significant Mismatch - Only {matches} of {total} fields match")
        }
        OverallStatus::NoData => "No Data - No fields were submitted for comparison".to_string(),
    }
}
