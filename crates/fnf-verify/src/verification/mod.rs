//! Employee full-and-final verification: compare verifier claims with the authoritative record,
//! derive settlement status, and shape the response.
//!
//! The comparison engine and settlement derivation are pure; storage sits behind the
//! repository traits so the service and router can be exercised with in-memory adapters.

pub mod comparison;
mod config;
pub mod domain;
pub mod labels;
pub mod repository;
pub mod request;
pub mod roster;
pub mod router;
pub mod service;
pub mod settlement;

#[cfg(test)]
mod tests;

pub use comparison::{
    ComparedField, ComparisonEngine, ComparisonResult, FieldValue, MatchOutcome, MatchPolicy,
    MatchType, OverallStatus,
};
pub use config::VerificationConfig;
pub use domain::{EmployeeId, EmployeeRecord, SubmittedData, VerificationId, VerifierId};
pub use labels::{field_label, summary, LabeledComparison, MatchColor};
pub use repository::{
    EmployeeDirectory, NewVerification, Page, PageRequest, Pagination, RepositoryError,
    VerificationHistoryEntry, VerificationRecord, VerificationRepository,
};
pub use request::{FieldError, ValidationError, VerificationRequest};
pub use roster::{EmployeeRosterImporter, RosterImportError};
pub use router::{verification_router, ADMIN_HEADER, VERIFIER_HEADER};
pub use service::{
    EmployeeView, VerificationDetails, VerificationReport, VerificationService,
    VerificationServiceError,
};
pub use settlement::{derive_fnf_status, ExitCategory, FnfStatus, SettlementPolicy};
