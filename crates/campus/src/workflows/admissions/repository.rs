use serde::{Deserialize, Serialize};

use super::domain::{
    AdmissionApplication, ApplicantContact, ApplicationId, ApplicationStatus, CourseId,
    CourseSnapshot, Enrollment, Hostel, HostelAllocation, HostelId, Notification, UserId,
};
use super::ledger::CapacityError;

/// Storage abstraction over the university document store, so the settlement
/// service can be exercised in isolation.
///
/// Counter-bearing operations (`reserve_seats`, `allocate_room`) must apply
/// the bounded-capacity discipline of [`super::ledger::Capacity`]: a failed
/// reservation leaves the stored counter untouched.
pub trait AdmissionsRepository: Send + Sync {
    fn course(&self, id: &CourseId) -> Result<Option<CourseSnapshot>, RepositoryError>;

    /// Applications with status `pending` for one course and admission year.
    fn pending_applications(
        &self,
        course_id: &CourseId,
        admission_year: i32,
    ) -> Result<Vec<AdmissionApplication>, RepositoryError>;

    fn insert_application(
        &self,
        application: AdmissionApplication,
    ) -> Result<AdmissionApplication, RepositoryError>;

    /// The applicant's open (pending/selected/enrolled) application for a
    /// course, if one exists. At most one such record may exist per pair.
    fn open_application_for(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<AdmissionApplication>, RepositoryError>;

    /// Stamp a settlement decision onto an application.
    fn record_outcome(
        &self,
        id: &ApplicationId,
        rank: u32,
        status: ApplicationStatus,
    ) -> Result<(), RepositoryError>;

    /// Flip a directory account's role to `student`.
    fn promote_to_student(&self, user_id: &UserId) -> Result<(), RepositoryError>;

    /// Count of enrollments created in an admission year, across all courses.
    fn enrollment_count(&self, year: i32) -> Result<u64, RepositoryError>;

    /// Count of enrollments created for one course in an admission year.
    fn enrollment_count_for_course(
        &self,
        course_id: &CourseId,
        year: i32,
    ) -> Result<u64, RepositoryError>;

    /// Append to the enrollment ledger. `Conflict` if the enrollment or roll
    /// number is already taken.
    fn append_enrollment(&self, enrollment: Enrollment) -> Result<(), RepositoryError>;

    /// First active hostel with a free room, if any.
    fn first_hostel_with_vacancy(&self) -> Result<Option<Hostel>, RepositoryError>;

    /// Record a room assignment and decrement the hostel's room counter.
    fn allocate_room(
        &self,
        hostel_id: &HostelId,
        allocation: HostelAllocation,
    ) -> Result<(), RepositoryError>;

    /// Bulk seat reservation against a course, applied once per settlement run.
    fn reserve_seats(&self, course_id: &CourseId, count: u32) -> Result<(), RepositoryError>;

    /// Applications already settled (selected or rejected, rank assigned),
    /// narrowed by the filter. Ordering is the caller's concern.
    fn settled_applications(
        &self,
        filter: &MeritListFilter,
    ) -> Result<Vec<AdmissionApplication>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing the append-only notification outbox.
pub trait NotificationSink: Send + Sync {
    fn push(&self, notification: Notification) -> Result<(), NotificationError>;
}

/// Outbox dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification outbox unavailable: {0}")]
    Unavailable(String),
}

/// Narrowing criteria for reading back settled merit lists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeritListFilter {
    #[serde(default)]
    pub course_id: Option<CourseId>,
    #[serde(default)]
    pub admission_year: Option<i32>,
}

/// One row of a course merit list as exposed to callers.
#[derive(Debug, Clone, Serialize)]
pub struct MeritListEntry {
    pub rank: u32,
    pub application_id: ApplicationId,
    pub student: ApplicantContact,
    pub percentage: f64,
    pub status: &'static str,
}
