use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ledger::Capacity;

/// Identifier wrapper for submitted admission applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for catalog courses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseId(pub String);

/// Identifier wrapper for directory users (applicants, students, faculty, admins).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for hostels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostelId(pub String);

/// Degree program a course (and application) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgramType {
    #[serde(rename = "UG")]
    Undergraduate,
    #[serde(rename = "PG")]
    Postgraduate,
}

impl ProgramType {
    pub const fn label(self) -> &'static str {
        match self {
            ProgramType::Undergraduate => "UG",
            ProgramType::Postgraduate => "PG",
        }
    }
}

/// Directory entry for the person behind an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantContact {
    pub user_id: UserId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// Admissions target with a seat budget and an eligibility threshold.
///
/// `code` doubles as the roll-number prefix for enrollments minted against
/// this course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSnapshot {
    pub id: CourseId,
    pub name: String,
    pub code: String,
    pub program_type: ProgramType,
    pub eligibility_percentage: f64,
    pub seats: Capacity,
    pub is_active: bool,
}

/// Lifecycle of one applicant's bid for one course in one admission cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Selected,
    Rejected,
    Enrolled,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Selected => "selected",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Enrolled => "enrolled",
        }
    }

    /// Pending, selected, and enrolled applications block a second
    /// submission for the same (applicant, course) pair.
    pub const fn is_open(self) -> bool {
        !matches!(self, ApplicationStatus::Rejected)
    }
}

/// One applicant's bid for one course in one admission cycle.
///
/// Mutated only by settlement (rank and status) once submitted; never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionApplication {
    pub id: ApplicationId,
    pub applicant: ApplicantContact,
    pub course_id: CourseId,
    pub program_type: ProgramType,
    pub percentage: f64,
    pub hostel_required: bool,
    pub status: ApplicationStatus,
    pub merit_rank: Option<u32>,
    pub admission_year: i32,
    pub submitted_at: DateTime<Utc>,
}

/// Lifecycle of a durable enrollment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Active,
    Suspended,
    Completed,
    Dropped,
}

impl EnrollmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Suspended => "suspended",
            EnrollmentStatus::Completed => "completed",
            EnrollmentStatus::Dropped => "dropped",
        }
    }
}

/// Durable record of an admitted student.
///
/// `enrollment_no` is unique across the system; `roll_no` is unique within a
/// course and year and carries the course code so it also reads globally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub student_id: UserId,
    pub course_id: CourseId,
    pub enrollment_no: String,
    pub roll_no: String,
    pub enrollment_year: i32,
    pub current_semester: u8,
    pub status: EnrollmentStatus,
}

/// Which residents a hostel admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenderEligibility {
    Male,
    Female,
    CoEd,
}

/// Capacity-bounded lodging unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hostel {
    pub id: HostelId,
    pub name: String,
    pub code: String,
    pub gender: GenderEligibility,
    pub rooms: Capacity,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    Allocated,
    Vacated,
}

impl AllocationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AllocationStatus::Allocated => "allocated",
            AllocationStatus::Vacated => "vacated",
        }
    }
}

/// One student's room assignment. At most one `allocated` record per student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostelAllocation {
    pub student_id: UserId,
    pub hostel_id: HostelId,
    pub room_number: String,
    pub status: AllocationStatus,
}

/// Severity tag carried by outbox notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Warning,
    Success,
    Error,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
        }
    }
}

/// Append-only message addressed to a user. Only the read flag ever changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
}
