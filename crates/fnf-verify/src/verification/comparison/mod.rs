mod policy;
mod status;

pub use policy::MatchPolicy;
pub use status::{MatchTally, OverallStatus, PARTIAL_MATCH_THRESHOLD};

use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use super::domain::{EmployeeRecord, SubmittedData};
use super::settlement::ExitCategory;
use policy::exact_key;

/// Fields a verifier may claim, in the order results are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparedField {
    Name,
    EntityName,
    DateOfJoining,
    DateOfLeaving,
    Designation,
    ExitReason,
}

impl ComparedField {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Name,
            Self::EntityName,
            Self::DateOfJoining,
            Self::DateOfLeaving,
            Self::Designation,
            Self::ExitReason,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::EntityName => "entity_name",
            Self::DateOfJoining => "date_of_joining",
            Self::DateOfLeaving => "date_of_leaving",
            Self::Designation => "designation",
            Self::ExitReason => "exit_reason",
        }
    }
}

/// How a field's outcome was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Normalized,
    Fuzzy,
    Mismatch,
}

impl MatchType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Normalized => "normalized",
            Self::Fuzzy => "fuzzy",
            Self::Mismatch => "mismatch",
        }
    }
}

/// A compared value: free text, or a calendar date rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub field: ComparedField,
    pub verifier_value: FieldValue,
    pub company_value: Option<FieldValue>,
    pub is_match: bool,
    pub match_type: MatchType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchOutcome {
    pub comparison_results: Vec<ComparisonResult>,
    pub overall_status: OverallStatus,
    pub match_score: u8,
}

impl MatchOutcome {
    pub fn tally(&self) -> MatchTally {
        tally(&self.comparison_results)
    }
}

pub fn tally(results: &[ComparisonResult]) -> MatchTally {
    let matches = results.iter().filter(|result| result.is_match).count();
    MatchTally::new(matches, results.len())
}

/// Stateless comparator of verifier claims against the authoritative record.
#[derive(Debug, Clone, Default)]
pub struct ComparisonEngine {
    policy: MatchPolicy,
}

impl ComparisonEngine {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn compare(&self, submitted: &SubmittedData, record: &EmployeeRecord) -> MatchOutcome {
        let comparison_results: Vec<ComparisonResult> = ComparedField::ordered()
            .into_iter()
            .filter_map(|field| self.compare_field(field, submitted, record))
            .collect();

        let tally = tally(&comparison_results);

        MatchOutcome {
            comparison_results,
            overall_status: tally.status(),
            match_score: tally.score(),
        }
    }

    fn compare_field(
        &self,
        field: ComparedField,
        submitted: &SubmittedData,
        record: &EmployeeRecord,
    ) -> Option<ComparisonResult> {
        match field {
            ComparedField::Name => Some(self.compare_text(
                field,
                submitted.name.as_deref()?,
                &record.name,
            )),
            ComparedField::EntityName => Some(self.compare_text(
                field,
                submitted.entity_name.as_deref()?,
                &record.entity_name,
            )),
            ComparedField::DateOfJoining => Some(compare_dates(
                field,
                submitted.date_of_joining?,
                Some(record.date_of_joining),
            )),
            ComparedField::DateOfLeaving => Some(compare_dates(
                field,
                submitted.date_of_leaving?,
                record.date_of_leaving,
            )),
            ComparedField::Designation => Some(self.compare_text(
                field,
                submitted.designation.as_deref()?,
                &record.designation,
            )),
            ComparedField::ExitReason => {
                let claimed = submitted.exit_reason.as_deref()?;
                let mut result = self.compare_text(field, claimed, &record.exit_reason);
                if !result.is_match && self.policy.match_exit_reason_aliases {
                    let category = ExitCategory::classify(claimed);
                    if category != ExitCategory::Other
                        && category == ExitCategory::classify(&record.exit_reason)
                    {
                        result.is_match = true;
                        result.match_type = MatchType::Fuzzy;
                    }
                }
                Some(result)
            }
        }
    }

    fn compare_text(
        &self,
        field: ComparedField,
        claimed: &str,
        on_record: &str,
    ) -> ComparisonResult {
        let verifier_value = FieldValue::Text(claimed.to_string());
        if on_record.trim().is_empty() {
            return ComparisonResult {
                field,
                verifier_value,
                company_value: None,
                is_match: false,
                match_type: MatchType::Mismatch,
            };
        }

        let match_type = if exact_key(claimed) == exact_key(on_record) {
            MatchType::Exact
        } else if self.policy.tolerant_eq(claimed, on_record) {
            MatchType::Normalized
        } else {
            MatchType::Mismatch
        };

        ComparisonResult {
            field,
            verifier_value,
            company_value: Some(FieldValue::Text(on_record.to_string())),
            is_match: match_type != MatchType::Mismatch,
            match_type,
        }
    }
}

fn compare_dates(
    field: ComparedField,
    claimed: NaiveDate,
    on_record: Option<NaiveDate>,
) -> ComparisonResult {
    let is_match = on_record == Some(claimed);
    ComparisonResult {
        field,
        verifier_value: FieldValue::Date(claimed),
        company_value: on_record.map(FieldValue::Date),
        is_match,
        match_type: if is_match {
            MatchType::Exact
        } else {
            MatchType::Mismatch
        },
    }
}
