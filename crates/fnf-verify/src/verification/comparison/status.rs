use serde::{Deserialize, Serialize};

/// Score at or above which a partial match is reported.
pub const PARTIAL_MATCH_THRESHOLD: u8 = 70;

/// Classification of a match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverallStatus {
    #[serde(rename = "perfect match")]
    PerfectMatch,
    #[serde(rename = "partial match")]
    PartialMatch,
    #[serde(rename = "significant mismatch")]
    SignificantMismatch,
    #[serde(rename = "no data to compare")]
    NoData,
}

impl OverallStatus {
    /// Thresholds shared by the overall status and the summary text.
    pub const fn from_score(score: u8) -> Self {
        if score >= 100 {
            Self::PerfectMatch
        } else if score >= PARTIAL_MATCH_THRESHOLD {
            Self::PartialMatch
        } else {
            Self::SignificantMismatch
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PerfectMatch => "perfect match",
            Self::PartialMatch => "partial match",
            Self::SignificantMismatch => "significant mismatch",
            Self::NoData => "no data to compare",
        }
    }
}

/// Count of matching fields out of the fields actually compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchTally {
    pub matches: usize,
    pub total: usize,
}

impl MatchTally {
    pub fn new(matches: usize, total: usize) -> Self {
        Self {
            matches: matches.min(total),
            total,
        }
    }

    /// `round(100 * matches / total)`, rounding halves up. An empty tally scores 0.
    pub fn score(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let scaled = (200 * self.matches + self.total) / (2 * self.total);
        scaled.min(100) as u8
    }

    pub fn status(&self) -> OverallStatus {
        if self.total == 0 {
            OverallStatus::NoData
        } else {
            OverallStatus::from_score(self.score())
        }
    }
}
