//! Admissions settlement: merit ranking, seat allocation, and enrollment
//! provisioning for a university admission cycle.
//!
//! The settlement run is the one multi-entity procedure in the service:
//! given a course's pending application pool it produces a merit order,
//! admits candidates up to the seat budget, and provisions every downstream
//! record (enrollment numbers, hostel rooms, notifications) for each
//! admitted candidate. Everything else the platform stores is plain
//! single-record CRUD and lives behind the repository seam.

pub mod domain;
pub mod identifiers;
pub mod ledger;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AdmissionApplication, AllocationStatus, ApplicantContact, ApplicationId, ApplicationStatus,
    CourseId, CourseSnapshot, Enrollment, EnrollmentStatus, GenderEligibility, Hostel,
    HostelAllocation, HostelId, Notification, NotificationKind, ProgramType, UserId,
};
pub use identifiers::{AdmissionIdentifiers, IdentifierAllocator};
pub use ledger::{Capacity, CapacityError};
pub use ranking::{rank_applications, NoEligibleCandidates, RankedCandidate};
pub use repository::{
    AdmissionsRepository, MeritListEntry, MeritListFilter, NotificationError, NotificationSink,
    RepositoryError,
};
pub use router::admissions_router;
pub use service::{
    AdmissionsError, AdmissionsService, ApplicationForm, IntakeViolation, SettlementReport,
    SettlementRequest,
};
