use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Datelike, Local, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use super::domain::{
    AdmissionApplication, AllocationStatus, ApplicantContact, ApplicationId, ApplicationStatus,
    CourseId, Enrollment, EnrollmentStatus, HostelAllocation, Notification, NotificationKind,
    ProgramType,
};
use super::identifiers::IdentifierAllocator;
use super::ledger::CapacityError;
use super::ranking::rank_applications;
use super::repository::{
    AdmissionsRepository, MeritListEntry, MeritListFilter, NotificationError, NotificationSink,
    RepositoryError,
};

/// Service composing the ranking engine, identifier allocator, and resource
/// ledger behind the repository and outbox seams.
///
/// Settlement is best-effort: a failure while settling candidate k leaves
/// candidates 1..k-1 committed. There is no rollback; re-running is safe
/// because settled applications are no longer `pending` and never re-enter
/// the pool.
pub struct AdmissionsService<R, N> {
    repository: Arc<R>,
    notifications: Arc<N>,
    course_locks: Mutex<HashMap<CourseId, Arc<Mutex<()>>>>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("apl-{id:06}"))
}

/// Inbound submission payload, before intake checks assign it an id.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationForm {
    pub applicant: ApplicantContact,
    pub course_id: CourseId,
    pub program_type: ProgramType,
    pub percentage: f64,
    #[serde(default)]
    pub hostel_required: bool,
    #[serde(default)]
    pub admission_year: Option<i32>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Trigger for one settlement run, scoped to one course and admission year.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementRequest {
    pub course_id: CourseId,
    #[serde(default)]
    pub admission_year: Option<i32>,
}

/// Summary of a completed settlement run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SettlementReport {
    pub message: String,
    pub course: String,
    pub total_applications: usize,
    pub selected: usize,
    pub rejected: usize,
    pub merit_list: Vec<MeritListEntry>,
}

/// Submission rejections raised by intake checks.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("no seats available for this course")]
    NoSeatsAvailable,
    #[error("minimum {required}% required for this course (declared {declared}%)")]
    BelowEligibility { required: f64, declared: f64 },
    #[error("already applied for this course")]
    AlreadyApplied,
}

/// Error raised by the admissions service.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionsError {
    #[error("course not found")]
    CourseNotFound,
    #[error("no eligible applications found")]
    NoEligibleCandidates,
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error("seat ledger diverged from settlement decisions: {0}")]
    SeatInvariant(CapacityError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}

impl<R, N> AdmissionsService<R, N>
where
    R: AdmissionsRepository + 'static,
    N: NotificationSink + 'static,
{
    pub fn new(repository: Arc<R>, notifications: Arc<N>) -> Self {
        Self {
            repository,
            notifications,
            course_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Submit a new application after eligibility and duplicate checks.
    pub fn submit(
        &self,
        form: ApplicationForm,
    ) -> Result<AdmissionApplication, AdmissionsError> {
        let course = self
            .repository
            .course(&form.course_id)?
            .ok_or(AdmissionsError::CourseNotFound)?;

        if course.seats.is_exhausted() {
            return Err(IntakeViolation::NoSeatsAvailable.into());
        }

        if form.percentage < course.eligibility_percentage {
            return Err(IntakeViolation::BelowEligibility {
                required: course.eligibility_percentage,
                declared: form.percentage,
            }
            .into());
        }

        if self
            .repository
            .open_application_for(&form.applicant.user_id, &form.course_id)?
            .is_some()
        {
            return Err(IntakeViolation::AlreadyApplied.into());
        }

        let application = AdmissionApplication {
            id: next_application_id(),
            applicant: form.applicant,
            course_id: form.course_id,
            program_type: form.program_type,
            percentage: form.percentage,
            hostel_required: form.hostel_required,
            status: ApplicationStatus::Pending,
            merit_rank: None,
            admission_year: form.admission_year.unwrap_or_else(current_year),
            submitted_at: form.submitted_at.unwrap_or_else(Utc::now),
        };

        let stored = self.repository.insert_application(application)?;
        Ok(stored)
    }

    /// Run merit settlement for one course and admission year.
    ///
    /// Candidates are processed strictly one at a time in rank order: the
    /// identifier sequences and room counters advance in memory per
    /// admission and must not be observed concurrently within a run. Runs
    /// for the same course are serialized by a per-course lock; runs for
    /// different courses share no state.
    pub fn generate_merit_list(
        &self,
        request: SettlementRequest,
    ) -> Result<SettlementReport, AdmissionsError> {
        let year = request.admission_year.unwrap_or_else(current_year);

        let run_lock = self.course_lock(&request.course_id);
        let _guard = run_lock.lock().expect("course settlement lock poisoned");

        let course = self
            .repository
            .course(&request.course_id)?
            .ok_or(AdmissionsError::CourseNotFound)?;

        let pool = self.repository.pending_applications(&course.id, year)?;
        let ranked = rank_applications(pool, course.eligibility_percentage)
            .map_err(|_| AdmissionsError::NoEligibleCandidates)?;

        let selected_count = ranked.len().min(course.seats.available() as usize);

        let mut allocator = IdentifierAllocator::seed(
            year,
            course.code.clone(),
            self.repository.enrollment_count(year)?,
            self.repository.enrollment_count_for_course(&course.id, year)?,
        );

        let mut merit_list = Vec::with_capacity(ranked.len());

        for candidate in &ranked {
            let selected = (candidate.rank as usize) <= selected_count;
            let status = if selected {
                ApplicationStatus::Selected
            } else {
                ApplicationStatus::Rejected
            };

            self.repository
                .record_outcome(&candidate.application.id, candidate.rank, status)?;

            if selected {
                self.settle_selected_candidate(
                    &candidate.application,
                    &course.name,
                    year,
                    &mut allocator,
                )?;
            } else {
                self.notifications.push(Notification {
                    user_id: candidate.application.applicant.user_id.clone(),
                    title: "Application Status".to_string(),
                    message: format!(
                        "Unfortunately, you were not selected for {} this time.",
                        course.name
                    ),
                    kind: NotificationKind::Info,
                    is_read: false,
                })?;
            }

            merit_list.push(MeritListEntry {
                rank: candidate.rank,
                application_id: candidate.application.id.clone(),
                student: candidate.application.applicant.clone(),
                percentage: candidate.application.percentage,
                status: status.label(),
            });
        }

        self.repository
            .reserve_seats(&course.id, selected_count as u32)
            .map_err(|err| match err {
                RepositoryError::Capacity(inner) => AdmissionsError::SeatInvariant(inner),
                other => AdmissionsError::Repository(other),
            })?;

        info!(
            course = %course.code,
            admission_year = year,
            total = ranked.len(),
            selected = selected_count,
            rejected = ranked.len() - selected_count,
            "merit settlement complete"
        );

        Ok(SettlementReport {
            message: "Merit list generated successfully".to_string(),
            course: course.name,
            total_applications: ranked.len(),
            selected: selected_count,
            rejected: ranked.len() - selected_count,
            merit_list,
        })
    }

    /// Read back previously settled merit entries, rank ascending.
    pub fn merit_list(
        &self,
        filter: MeritListFilter,
    ) -> Result<Vec<MeritListEntry>, AdmissionsError> {
        let settled = self.repository.settled_applications(&filter)?;

        let mut entries: Vec<MeritListEntry> = settled
            .into_iter()
            .filter_map(|application| {
                let rank = application.merit_rank?;
                Some(MeritListEntry {
                    rank,
                    application_id: application.id,
                    student: application.applicant,
                    percentage: application.percentage,
                    status: application.status.label(),
                })
            })
            .collect();
        entries.sort_by_key(|entry| entry.rank);

        Ok(entries)
    }

    fn settle_selected_candidate(
        &self,
        application: &AdmissionApplication,
        course_name: &str,
        year: i32,
        allocator: &mut IdentifierAllocator,
    ) -> Result<(), AdmissionsError> {
        self.repository
            .promote_to_student(&application.applicant.user_id)?;

        let identifiers = allocator.next();
        self.repository.append_enrollment(Enrollment {
            student_id: application.applicant.user_id.clone(),
            course_id: application.course_id.clone(),
            enrollment_no: identifiers.enrollment_no.clone(),
            roll_no: identifiers.roll_no,
            enrollment_year: year,
            current_semester: 1,
            status: EnrollmentStatus::Active,
        })?;

        if application.hostel_required {
            match self.repository.first_hostel_with_vacancy()? {
                Some(hostel) => {
                    let room_number = format!("{}-{}", hostel.code, hostel.rooms.in_use() + 1);
                    self.repository.allocate_room(
                        &hostel.id,
                        HostelAllocation {
                            student_id: application.applicant.user_id.clone(),
                            hostel_id: hostel.id.clone(),
                            room_number,
                            status: AllocationStatus::Allocated,
                        },
                    )?;
                }
                // No room anywhere: the admission stands without housing.
                None => {
                    warn!(
                        applicant = %application.applicant.user_id.0,
                        "hostel requested but no hostel has vacancy"
                    );
                }
            }
        }

        self.notifications.push(Notification {
            user_id: application.applicant.user_id.clone(),
            title: "Congratulations! You are selected".to_string(),
            message: format!(
                "You have been selected for {}. Your enrollment number is {}.",
                course_name, identifiers.enrollment_no
            ),
            kind: NotificationKind::Success,
            is_read: false,
        })?;

        Ok(())
    }

    fn course_lock(&self, course_id: &CourseId) -> Arc<Mutex<()>> {
        let mut locks = self
            .course_locks
            .lock()
            .expect("course lock registry poisoned");
        locks.entry(course_id.clone()).or_default().clone()
    }
}

fn current_year() -> i32 {
    Local::now().year()
}
