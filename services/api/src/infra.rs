use chrono::{NaiveDate, Utc};
use fnf_verify::verification::domain::parse_calendar_date;
use fnf_verify::verification::{
    EmployeeDirectory, EmployeeId, EmployeeRecord, NewVerification, Page, PageRequest,
    RepositoryError, VerificationId, VerificationRecord, VerificationRepository, VerifierId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEmployeeDirectory {
    records: Arc<Mutex<BTreeMap<EmployeeId, EmployeeRecord>>>,
}

impl InMemoryEmployeeDirectory {
    fn guard(
        &self,
    ) -> Result<MutexGuard<'_, BTreeMap<EmployeeId, EmployeeRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("employee directory lock poisoned".into()))
    }
}

impl EmployeeDirectory for InMemoryEmployeeDirectory {
    fn find(&self, id: &EmployeeId) -> Result<Option<EmployeeRecord>, RepositoryError> {
        Ok(self.guard()?.get(id).cloned())
    }

    fn insert(&self, record: EmployeeRecord) -> Result<EmployeeRecord, RepositoryError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&record.employee_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.employee_id.clone(), record.clone());
        Ok(record)
    }

    fn upsert(&self, record: EmployeeRecord) -> Result<(), RepositoryError> {
        self.guard()?.insert(record.employee_id.clone(), record);
        Ok(())
    }

    fn list(&self) -> Result<Vec<EmployeeRecord>, RepositoryError> {
        Ok(self.guard()?.values().cloned().collect())
    }
}

/// Append-only verification log; ids are minted from a process-local sequence.
#[derive(Default, Clone)]
pub(crate) struct InMemoryVerificationRepository {
    records: Arc<Mutex<Vec<VerificationRecord>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryVerificationRepository {
    fn guard(&self) -> Result<MutexGuard<'_, Vec<VerificationRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("verification log lock poisoned".into()))
    }
}

impl VerificationRepository for InMemoryVerificationRepository {
    fn insert(&self, verification: NewVerification) -> Result<VerificationRecord, RepositoryError> {
        let mut guard = self.guard()?;
        let next = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let record = VerificationRecord::from_new(
            VerificationId(format!("VER-{next:06}")),
            Utc::now(),
            verification,
        );
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &VerificationId) -> Result<Option<VerificationRecord>, RepositoryError> {
        Ok(self
            .guard()?
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
            .guard()?
            .iter()
            .rev()
            .filter(|record| &record.verifier_id == verifier)
            .cloned()
            .collect();
        Ok(page.paginate(owned))
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    parse_calendar_date(raw).map_err(|err| format!("{err} (expected YYYY-MM-DD)"))
}
