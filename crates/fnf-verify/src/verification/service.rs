use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::comparison::{ComparisonEngine, ComparisonResult, OverallStatus};
use super::config::VerificationConfig;
use super::domain::{EmployeeId, EmployeeRecord, SubmittedData, VerificationId, VerifierId};
use super::labels::{label_results, summary, LabeledComparison};
use super::repository::{
    EmployeeDirectory, NewVerification, Page, PageRequest, RepositoryError,
    VerificationHistoryEntry, VerificationRepository,
};
use super::request::{validate_employee, ValidationError, VerificationRequest};
use super::settlement::{FnfStatus, SettlementPolicy};

/// Service composing the employee directory, verification storage, and comparison engine.
pub struct VerificationService<E, R> {
    directory: Arc<E>,
    repository: Arc<R>,
    engine: ComparisonEngine,
    settlement: SettlementPolicy,
}

impl<E, R> VerificationService<E, R>
where
    E: EmployeeDirectory + 'static,
    R: VerificationRepository + 'static,
{
    pub fn new(directory: Arc<E>, repository: Arc<R>, config: VerificationConfig) -> Self {
        Self {
            directory,
            repository,
            engine: ComparisonEngine::new(config.match_policy),
            settlement: config.settlement,
        }
    }

    /// Compare a verifier's claims against the employee record and persist the outcome.
    pub fn verify(
        &self,
        verifier: &VerifierId,
        request: VerificationRequest,
        now: DateTime<Utc>,
    ) -> Result<VerificationReport, VerificationServiceError> {
        let validated = request.validate()?;
        let Some(employee) = self.directory.find(&validated.employee_id)? else {
            warn!(
                employee_id = %validated.employee_id,
                "verification requested for unknown employee"
            );
            return Err(VerificationServiceError::EmployeeNotFound(
                validated.employee_id,
            ));
        };

        let outcome = self.engine.compare(&validated.submitted, &employee);
        let fnf_status = self.fnf_status(&employee, now.date_naive());

        let record = self.repository.insert(NewVerification {
            verifier_id: verifier.clone(),
            employee_id: employee.employee_id.clone(),
            consent_given: validated.submitted.consent_given,
            submitted_data: validated.submitted,
            comparison_results: outcome.comparison_results,
            overall_status: outcome.overall_status,
            match_score: outcome.match_score,
            verification_completed_at: now,
        })?;

        info!(
            verification_id = %record.verification_id.0,
            employee_id = %record.employee_id,
            match_score = record.match_score,
            overall_status = record.overall_status.label(),
            "verification completed"
        );

        Ok(VerificationReport {
            verification_id: record.verification_id.clone(),
            employee_data: EmployeeView::new(&employee, fnf_status),
            comparison_results: label_results(&record.comparison_results),
            overall_status: record.overall_status,
            match_score: record.match_score,
            fnf_status,
            summary: summary(&record.comparison_results),
            verified_at: record.verification_completed_at,
        })
    }

    /// Fetch one of the verifier's own verifications. Records owned by others are reported as
    /// missing.
    pub fn details(
        &self,
        verifier: &VerifierId,
        verification_id: &VerificationId,
        now: DateTime<Utc>,
    ) -> Result<VerificationDetails, VerificationServiceError> {
        let record = self
            .repository
            .fetch(verification_id)?
            .filter(|record| &record.verifier_id == verifier)
            .ok_or(VerificationServiceError::VerificationNotFound)?;

        let employee = self
            .directory
            .find(&record.employee_id)?
            .ok_or(VerificationServiceError::EmployeeRecordMissing)?;
        let fnf_status = self.fnf_status(&employee, now.date_naive());

        Ok(VerificationDetails {
            verification_id: record.verification_id,
            employee_id: record.employee_id,
            submitted_data: record.submitted_data,
            comparison_results: record.comparison_results,
            overall_status: record.overall_status,
            match_score: record.match_score,
            employee_data: EmployeeView::new(&employee, fnf_status),
            verified_at: record.verification_completed_at,
        })
    }

    pub fn history(
        &self,
        verifier: &VerifierId,
        page: PageRequest,
    ) -> Result<Page<VerificationHistoryEntry>, VerificationServiceError> {
        let page = self.repository.list_by_verifier(verifier, page)?;
        Ok(Page {
            records: page
                .records
                .iter()
                .map(|record| record.history_entry())
                .collect(),
            pagination: page.pagination,
        })
    }

    pub fn register_employee(
        &self,
        record: EmployeeRecord,
    ) -> Result<EmployeeRecord, VerificationServiceError> {
        validate_employee(&record)?;
        let stored = self.directory.insert(record)?;
        info!(employee_id = %stored.employee_id, "employee record registered");
        Ok(stored)
    }

    pub fn employee(
        &self,
        employee_id: &EmployeeId,
        now: DateTime<Utc>,
    ) -> Result<EmployeeView, VerificationServiceError> {
        let employee = self
            .directory
            .find(employee_id)?
            .ok_or_else(|| VerificationServiceError::EmployeeNotFound(employee_id.clone()))?;
        let fnf_status = self.fnf_status(&employee, now.date_naive());
        Ok(EmployeeView::new(&employee, fnf_status))
    }

    /// Every employee on record with the settlement status as of `now`.
    pub fn employees(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<EmployeeView>, VerificationServiceError> {
        let as_of = now.date_naive();
        Ok(self
            .directory
            .list()?
            .iter()
            .map(|employee| EmployeeView::new(employee, self.fnf_status(employee, as_of)))
            .collect())
    }

    fn fnf_status(&self, employee: &EmployeeRecord, as_of: NaiveDate) -> FnfStatus {
        self.settlement
            .derive(&employee.exit_reason, employee.date_of_leaving, as_of)
    }
}

/// Public employee fields plus the derived settlement status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeView {
    pub employee_id: EmployeeId,
    pub name: String,
    pub entity_name: String,
    pub date_of_joining: NaiveDate,
    pub date_of_leaving: Option<NaiveDate>,
    pub designation: String,
    pub exit_reason: String,
    pub fnf_status: FnfStatus,
    pub department: Option<String>,
}

impl EmployeeView {
    pub fn new(record: &EmployeeRecord, fnf_status: FnfStatus) -> Self {
        Self {
            employee_id: record.employee_id.clone(),
            name: record.name.clone(),
            entity_name: record.entity_name.clone(),
            date_of_joining: record.date_of_joining,
            date_of_leaving: record.date_of_leaving,
            designation: record.designation.clone(),
            exit_reason: record.exit_reason.clone(),
            fnf_status,
            department: record.department.clone(),
        }
    }
}

/// Response payload for a completed verification.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub verification_id: VerificationId,
    pub employee_data: EmployeeView,
    pub comparison_results: Vec<LabeledComparison>,
    pub overall_status: OverallStatus,
    pub match_score: u8,
    pub fnf_status: FnfStatus,
    pub summary: String,
    pub verified_at: DateTime<Utc>,
}

/// Stored verification plus the employee's current public fields.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationDetails {
    pub verification_id: VerificationId,
    pub employee_id: EmployeeId,
    pub submitted_data: SubmittedData,
    pub comparison_results: Vec<ComparisonResult>,
    pub overall_status: OverallStatus,
    pub match_score: u8,
    pub employee_data: EmployeeView,
    pub verified_at: DateTime<Utc>,
}

/// Error raised by the verification service.
#[derive(Debug, thiserror::Error)]
pub enum VerificationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Employee with ID \"{0}\" not found in our records")]
    EmployeeNotFound(EmployeeId),
    #[error("Verification record not found or you do not have permission to access it")]
    VerificationNotFound,
    #[error("Employee record not found")]
    EmployeeRecordMissing,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
