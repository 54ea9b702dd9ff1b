use chrono::{DateTime, Utc};
use serde::Serialize;

use super::comparison::{ComparisonResult, OverallStatus};
use super::domain::{EmployeeId, EmployeeRecord, SubmittedData, VerificationId, VerifierId};

pub const DEFAULT_PAGE_LIMIT: usize = 10;
pub const MAX_PAGE_LIMIT: usize = 100;

/// Verification outcome handed to the repository; the repository mints the id and timestamps.
#[derive(Debug, Clone)]
pub struct NewVerification {
    pub verifier_id: VerifierId,
    pub employee_id: EmployeeId,
    pub submitted_data: SubmittedData,
    pub comparison_results: Vec<ComparisonResult>,
    pub overall_status: OverallStatus,
    pub match_score: u8,
    pub consent_given: bool,
    pub verification_completed_at: DateTime<Utc>,
}

/// Persisted verification. Never mutated after insertion.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationRecord {
    pub verification_id: VerificationId,
    pub verifier_id: VerifierId,
    pub employee_id: EmployeeId,
    pub submitted_data: SubmittedData,
    pub comparison_results: Vec<ComparisonResult>,
    pub overall_status: OverallStatus,
    pub match_score: u8,
    pub consent_given: bool,
    pub created_at: DateTime<Utc>,
    pub verification_completed_at: DateTime<Utc>,
}

impl VerificationRecord {
    pub fn from_new(
        verification_id: VerificationId,
        created_at: DateTime<Utc>,
        new: NewVerification,
    ) -> Self {
        Self {
            verification_id,
            verifier_id: new.verifier_id,
            employee_id: new.employee_id,
            submitted_data: new.submitted_data,
            comparison_results: new.comparison_results,
            overall_status: new.overall_status,
            match_score: new.match_score,
            consent_given: new.consent_given,
            created_at,
            verification_completed_at: new.verification_completed_at,
        }
    }

    pub fn history_entry(&self) -> VerificationHistoryEntry {
        VerificationHistoryEntry {
            verification_id: self.verification_id.clone(),
            employee_id: self.employee_id.clone(),
            overall_status: self.overall_status,
            match_score: self.match_score,
            created_at: self.created_at,
            verification_completed_at: self.verification_completed_at,
        }
    }
}

/// Compact row returned when listing a verifier's history.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationHistoryEntry {
    pub verification_id: VerificationId,
    pub employee_id: EmployeeId,
    pub overall_status: OverallStatus,
    pub match_score: u8,
    pub created_at: DateTime<Utc>,
    pub verification_completed_at: DateTime<Utc>,
}

/// 1-based page request. Out-of-range values are clamped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn new(page: Option<usize>, limit: Option<usize>) -> Self {
        Self {
            page: page.filter(|page| *page > 0).unwrap_or(1),
            limit: limit
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_PAGE_LIMIT)
                .min(MAX_PAGE_LIMIT),
        }
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Slice an already-ordered collection into this page.
    pub fn paginate<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len();
        let records = items
            .into_iter()
            .skip(self.offset())
            .take(self.limit)
            .collect();
        Page {
            records,
            pagination: Pagination::new(*self, total),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

impl Pagination {
    pub fn new(request: PageRequest, total: usize) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            pages: total.div_ceil(request.limit.max(1)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub pagination: Pagination,
}

/// Authoritative employee records, keyed by normalized id.
pub trait EmployeeDirectory: Send + Sync {
    fn find(&self, id: &EmployeeId) -> Result<Option<EmployeeRecord>, RepositoryError>;
    fn insert(&self, record: EmployeeRecord) -> Result<EmployeeRecord, RepositoryError>;
    fn upsert(&self, record: EmployeeRecord) -> Result<(), RepositoryError>;
    /// Ordered by employee id.
    fn list(&self) -> Result<Vec<EmployeeRecord>, RepositoryError>;
}

/// Storage for completed verifications.
pub trait VerificationRepository: Send + Sync {
    fn insert(&self, verification: NewVerification) -> Result<VerificationRecord, RepositoryError>;
    fn fetch(&self, id: &VerificationId) -> Result<Option<VerificationRecord>, RepositoryError>;
    /// Newest first.
    fn list_by_verifier(
        &self,
        verifier: &VerifierId,
        page: PageRequest,
    ) -> Result<Page<VerificationRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
