//! Full-and-final settlement status derived from exit metadata.
//!
//! Derivation is total: every exit reason (including blank or unrecognized strings) and every
//! leaving date maps to a status. The evaluation date is passed in so callers control "today".

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_GRACE_DAYS: u32 = 45;
pub const DEFAULT_CAUSE_REVIEW_DAYS: u32 = 90;

/// Settlement state reported alongside a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FnfStatus {
    /// No leaving date on record; the employee has not exited.
    NotApplicable,
    /// Exit recorded but the settlement window is still open.
    Pending,
    /// Settlement window has elapsed.
    Completed,
    /// Settlement withheld pending review or clearance.
    OnHold,
}

impl FnfStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotApplicable => "Not Applicable",
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::OnHold => "On Hold",
        }
    }
}

/// Exit reason buckets. The vocabulary on record is open, so anything unrecognized is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitCategory {
    Resignation,
    Retirement,
    Layoff,
    Termination,
    Absconding,
    Other,
}

/// Tokens that turn a reason into a denial, e.g. "did not resign".
const NEGATIONS: [&str; 7] = ["not", "never", "no", "didn", "didnt", "wasn", "wasnt"];

impl ExitCategory {
    /// Classify by whole words: a word must start with a known stem, and phrases must appear
    /// as consecutive words. Negated reasons are `Other`.
    pub fn classify(exit_reason: &str) -> Self {
        let lowered = exit_reason.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .collect();

        if tokens.is_empty() || tokens.iter().any(|token| NEGATIONS.contains(token)) {
            return Self::Other;
        }

        let stem = |stems: &[&str]| {
            tokens
                .iter()
                .any(|token| stems.iter().any(|stem| token.starts_with(stem)))
        };
        let phrase = |words: &[&str]| tokens.windows(words.len()).any(|window| window == words);

        if stem(&["abscond"]) {
            Self::Absconding
        } else if stem(&["terminat", "dismiss", "misconduct"]) || phrase(&["for", "cause"]) {
            Self::Termination
        } else if stem(&["layoff", "redundan", "retrench"])
            || phrase(&["laid", "off"])
            || phrase(&["lay", "off"])
        {
            Self::Layoff
        } else if stem(&["retire", "superannuat"]) {
            Self::Retirement
        } else if stem(&["resign"]) || tokens == ["voluntary"] {
            Self::Resignation
        } else {
            Self::Other
        }
    }
}

/// Windows applied after the leaving date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPolicy {
    pub grace_days: u32,
    pub cause_review_days: u32,
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self {
            grace_days: DEFAULT_GRACE_DAYS,
            cause_review_days: DEFAULT_CAUSE_REVIEW_DAYS,
        }
    }
}

impl SettlementPolicy {
    pub fn derive(
        &self,
        exit_reason: &str,
        date_of_leaving: Option<NaiveDate>,
        as_of: NaiveDate,
    ) -> FnfStatus {
        let Some(left_on) = date_of_leaving else {
            return FnfStatus::NotApplicable;
        };

        match ExitCategory::classify(exit_reason) {
            ExitCategory::Absconding => FnfStatus::OnHold,
            ExitCategory::Termination => {
                if window_open(left_on, self.cause_review_days, as_of) {
                    FnfStatus::OnHold
                } else {
                    FnfStatus::Completed
                }
            }
            ExitCategory::Resignation
            | ExitCategory::Retirement
            | ExitCategory::Layoff
            | ExitCategory::Other => {
                if window_open(left_on, self.grace_days, as_of) {
                    FnfStatus::Pending
                } else {
                    FnfStatus::Completed
                }
            }
        }
    }
}

/// Derive the settlement status using the default policy windows.
pub fn derive_fnf_status(
    exit_reason: &str,
    date_of_leaving: Option<NaiveDate>,
    as_of: NaiveDate,
) -> FnfStatus {
    SettlementPolicy::default().derive(exit_reason, date_of_leaving, as_of)
}

fn window_open(left_on: NaiveDate, days: u32, as_of: NaiveDate) -> bool {
    match left_on.checked_add_signed(Duration::days(i64::from(days))) {
        Some(closes_on) => as_of < closes_on,
        // A window past the end of the calendar never closes.
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_common_exit_reasons() {
        assert_eq!(ExitCategory::classify("Resignation"), ExitCategory::Resignation);
        assert_eq!(ExitCategory::classify(" resigned "), ExitCategory::Resignation);
        assert_eq!(ExitCategory::classify("RETIREMENT"), ExitCategory::Retirement);
        assert_eq!(ExitCategory::classify("laid-off"), ExitCategory::Layoff);
        assert_eq!(ExitCategory::classify("Redundancy"), ExitCategory::Layoff);
        assert_eq!(
            ExitCategory::classify("termination_for_cause"),
            ExitCategory::Termination
        );
        assert_eq!(ExitCategory::classify("Absconded"), ExitCategory::Absconding);
        assert_eq!(ExitCategory::classify(""), ExitCategory::Other);
        assert_eq!(ExitCategory::classify("sabbatical?"), ExitCategory::Other);
    }

    #[test]
    fn classification_needs_whole_words_and_ignores_denials() {
        assert_eq!(ExitCategory::classify("did not resign"), ExitCategory::Other);
        assert_eq!(ExitCategory::classify("didn't resign"), ExitCategory::Other);
        assert_eq!(ExitCategory::classify("never terminated"), ExitCategory::Other);
        assert_eq!(ExitCategory::classify("preretirement leave"), ExitCategory::Other);
        assert_eq!(ExitCategory::classify("cause review"), ExitCategory::Other);
        assert_eq!(
            ExitCategory::classify("Dismissed for cause"),
            ExitCategory::Termination
        );
    }

    #[test]
    fn window_boundary_closes_on_the_last_day() {
        let left_on = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        let policy = SettlementPolicy {
            grace_days: 10,
            cause_review_days: 20,
        };
        let day = |offset: i64| left_on + Duration::days(offset);

        assert_eq!(policy.derive("resignation", Some(left_on), day(9)), FnfStatus::Pending);
        assert_eq!(
            policy.derive("resignation", Some(left_on), day(10)),
            FnfStatus::Completed
        );
        assert_eq!(policy.derive("terminated", Some(left_on), day(19)), FnfStatus::OnHold);
        assert_eq!(
            policy.derive("terminated", Some(left_on), day(20)),
            FnfStatus::Completed
        );
    }

    #[test]
    fn far_future_leaving_date_does_not_overflow() {
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        assert_eq!(
            derive_fnf_status("resignation", Some(NaiveDate::MAX), as_of),
            FnfStatus::Pending
        );
    }
}
