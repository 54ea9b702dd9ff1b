use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::config::AppEnvironment;
use crate::verification::comparison::OverallStatus;
use crate::verification::domain::{
    EmployeeId, EmployeeRecord, SubmittedData, VerificationId, VerifierId,
};
use crate::verification::repository::{
    EmployeeDirectory, NewVerification, Page, PageRequest, RepositoryError, VerificationRecord,
    VerificationRepository,
};
use crate::verification::{
    verification_router, VerificationConfig, VerificationRequest, VerificationService,
};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn jane() -> EmployeeRecord {
    EmployeeRecord {
        employee_id: EmployeeId::new("E001"),
        name: "Jane Doe".to_string(),
        entity_name: "Acme Technologies Pvt. Ltd.".to_string(),
        designation: "Engineer".to_string(),
        department: Some("Platform".to_string()),
        date_of_joining: date(2019, 4, 1),
        date_of_leaving: Some(date(2023, 1, 15)),
        exit_reason: "resignation".to_string(),
    }
}

pub(super) fn still_employed() -> EmployeeRecord {
    EmployeeRecord {
        employee_id: EmployeeId::new("E002"),
        name: "Arun Rao".to_string(),
        entity_name: "Acme Technologies Pvt. Ltd.".to_string(),
        designation: "Analyst".to_string(),
        department: None,
        date_of_joining: date(2021, 7, 12),
        date_of_leaving: None,
        exit_reason: String::new(),
    }
}

pub(super) fn submitted(name: &str, designation: &str, exit_reason: &str) -> SubmittedData {
    SubmittedData {
        name: Some(name.to_string()),
        designation: Some(designation.to_string()),
        exit_reason: Some(exit_reason.to_string()),
        consent_given: true,
        ..SubmittedData::default()
    }
}

pub(super) fn full_claim() -> SubmittedData {
    SubmittedData {
        name: Some(" JANE DOE ".to_string()),
        entity_name: Some("acme technologies pvt. ltd.".to_string()),
        date_of_joining: Some(date(2019, 4, 1)),
        date_of_leaving: Some(date(2023, 1, 15)),
        designation: Some("engineer".to_string()),
        exit_reason: Some("Resignation".to_string()),
        consent_given: true,
    }
}

pub(super) fn request_for(employee_id: &str) -> VerificationRequest {
    VerificationRequest {
        employee_id: Some(employee_id.to_string()),
        name: Some("jane doe".to_string()),
        designation: Some("Engineer".to_string()),
        exit_reason: Some("Resignation".to_string()),
        consent_given: Some(true),
        ..VerificationRequest::default()
    }
}

pub(super) fn verifier() -> VerifierId {
    VerifierId("verifier-acme-bgv".to_string())
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    records: Arc<Mutex<BTreeMap<EmployeeId, EmployeeRecord>>>,
}

impl MemoryDirectory {
    pub(super) fn with(records: Vec<EmployeeRecord>) -> Self {
        let directory = Self::default();
        for record in records {
            directory.upsert(record).expect("seed directory");
        }
        directory
    }
}

impl EmployeeDirectory for MemoryDirectory {
    fn find(&self, id: &EmployeeId) -> Result<Option<EmployeeRecord>, RepositoryError> {
        Ok(self.records.lock().expect("directory mutex").get(id).cloned())
    }

    fn insert(&self, record: EmployeeRecord) -> Result<EmployeeRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("directory mutex");
        if guard.contains_key(&record.employee_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.employee_id.clone(), record.clone());
        Ok(record)
    }

    fn upsert(&self, record: EmployeeRecord) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("directory mutex")
            .insert(record.employee_id.clone(), record);
        Ok(())
    }

    fn list(&self) -> Result<Vec<EmployeeRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("directory mutex")
            .values()
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryVerifications {
    records: Arc<Mutex<Vec<VerificationRecord>>>,
    sequence: Arc<AtomicU64>,
}

impl MemoryVerifications {
    pub(super) fn stored(&self) -> Vec<VerificationRecord> {
        self.records.lock().expect("verification mutex").clone()
    }
}

impl VerificationRepository for MemoryVerifications {
    fn insert(&self, verification: NewVerification) -> Result<VerificationRecord, RepositoryError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let created_at = verification.verification_completed_at;
        let record = VerificationRecord::from_new(
            VerificationId(format!("ver-{id:04}")),
            created_at,
            verification,
        );
        self.records
            .lock()
            .expect("verification mutex")
            .push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &VerificationId) -> Result<Option<VerificationRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("verification mutex")
            .iter()
            .find(|record| &record.verification_id == id)
            .cloned())
    }

    fn list_by_verifier(
        &self,
        verifier: &VerifierId,
        page: PageRequest,
    ) -> Result<Page<VerificationRecord>, RepositoryError> {
        let owned: Vec<_> = self
            .records
            .lock()
            .expect("verification mutex")
            .iter()
            .rev()
            .filter(|record| &record.verifier_id == verifier)
            .cloned()
            .collect();
        Ok(page.paginate(owned))
    }
}

/// Store a verification whose employee the directory does not hold.
pub(super) fn orphaned_verification(verifications: &MemoryVerifications) -> VerificationId {
    verifications
        .insert(NewVerification {
            verifier_id: verifier(),
            employee_id: EmployeeId::new("E999"),
            submitted_data: SubmittedData {
                name: Some("Former Employee".to_string()),
                consent_given: true,
                ..SubmittedData::default()
            },
            comparison_results: Vec::new(),
            overall_status: OverallStatus::NoData,
            match_score: 0,
            consent_given: true,
            verification_completed_at: now(),
        })
        .expect("verification stored")
        .verification_id
}

pub(super) struct UnavailableVerifications;

impl VerificationRepository for UnavailableVerifications {
    fn insert(&self, _verification: NewVerification) -> Result<VerificationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }

    fn fetch(&self, _id: &VerificationId) -> Result<Option<VerificationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }

    fn list_by_verifier(
        &self,
        _verifier: &VerifierId,
        _page: PageRequest,
    ) -> Result<Page<VerificationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }
}

pub(super) type MemoryService = VerificationService<MemoryDirectory, MemoryVerifications>;

pub(super) fn build_service() -> (MemoryService, MemoryDirectory, MemoryVerifications) {
    let directory = MemoryDirectory::with(vec![jane(), still_employed()]);
    let verifications = MemoryVerifications::default();
    let service = VerificationService::new(
        Arc::new(directory.clone()),
        Arc::new(verifications.clone()),
        VerificationConfig::default(),
    );
    (service, directory, verifications)
}

pub(super) fn router_with_service<R>(
    service: VerificationService<MemoryDirectory, R>,
    environment: AppEnvironment,
) -> axum::Router
where
    R: VerificationRepository + 'static,
{
    verification_router(Arc::new(service), environment)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
