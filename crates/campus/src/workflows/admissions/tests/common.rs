use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::workflows::admissions::domain::{
    AdmissionApplication, ApplicantContact, ApplicationId, ApplicationStatus, CourseId,
    CourseSnapshot, Enrollment, GenderEligibility, Hostel, HostelAllocation, HostelId,
    Notification, ProgramType, UserId,
};
use crate::workflows::admissions::ledger::Capacity;
use crate::workflows::admissions::repository::{
    AdmissionsRepository, MeritListFilter, NotificationError, NotificationSink, RepositoryError,
};
use crate::workflows::admissions::service::AdmissionsService;

pub(super) const YEAR: i32 = 2026;

pub(super) fn course(seats: u32) -> CourseSnapshot {
    CourseSnapshot {
        id: CourseId("crs-cse".to_string()),
        name: "B.Tech Computer Science".to_string(),
        code: "CSE".to_string(),
        program_type: ProgramType::Undergraduate,
        eligibility_percentage: 60.0,
        seats: Capacity::new(seats),
        is_active: true,
    }
}

pub(super) fn applicant(tag: &str) -> ApplicantContact {
    ApplicantContact {
        user_id: UserId(format!("usr-{tag}")),
        full_name: format!("Applicant {tag}"),
        email: format!("{tag}@example.edu"),
        phone: "555-0100".to_string(),
    }
}

pub(super) fn submitted(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
        + Duration::minutes(minutes)
}

pub(super) fn pending_application(
    tag: &str,
    percentage: f64,
    minutes: i64,
    hostel_required: bool,
) -> AdmissionApplication {
    AdmissionApplication {
        id: ApplicationId(format!("apl-{tag}")),
        applicant: applicant(tag),
        course_id: CourseId("crs-cse".to_string()),
        program_type: ProgramType::Undergraduate,
        percentage,
        hostel_required,
        status: ApplicationStatus::Pending,
        merit_rank: None,
        admission_year: YEAR,
        submitted_at: submitted(minutes),
    }
}

pub(super) fn hostel(tag: &str, rooms: u32) -> Hostel {
    Hostel {
        id: HostelId(format!("hst-{tag}")),
        name: format!("Hostel {tag}"),
        code: tag.to_ascii_uppercase(),
        gender: GenderEligibility::CoEd,
        rooms: Capacity::new(rooms),
        is_active: true,
    }
}

pub(super) fn form(tag: &str, percentage: f64) -> crate::workflows::admissions::ApplicationForm {
    crate::workflows::admissions::ApplicationForm {
        applicant: applicant(tag),
        course_id: CourseId("crs-cse".to_string()),
        program_type: ProgramType::Undergraduate,
        percentage,
        hostel_required: false,
        admission_year: Some(YEAR),
        submitted_at: Some(submitted(0)),
    }
}

pub(super) fn build_service() -> (
    AdmissionsService<MemoryRepository, MemoryOutbox>,
    Arc<MemoryRepository>,
    Arc<MemoryOutbox>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let outbox = Arc::new(MemoryOutbox::default());
    let service = AdmissionsService::new(repository.clone(), outbox.clone());
    (service, repository, outbox)
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    courses: Mutex<HashMap<CourseId, CourseSnapshot>>,
    applications: Mutex<HashMap<ApplicationId, AdmissionApplication>>,
    roles: Mutex<HashMap<UserId, String>>,
    enrollments: Mutex<Vec<Enrollment>>,
    hostels: Mutex<Vec<Hostel>>,
    allocations: Mutex<Vec<HostelAllocation>>,
    fail_enrollments_after: Mutex<Option<usize>>,
}

impl MemoryRepository {
    pub(super) fn insert_course(&self, course: CourseSnapshot) {
        self.courses
            .lock()
            .expect("course mutex poisoned")
            .insert(course.id.clone(), course);
    }

    pub(super) fn insert_hostel(&self, hostel: Hostel) {
        self.hostels
            .lock()
            .expect("hostel mutex poisoned")
            .push(hostel);
    }

    pub(super) fn insert_pending(&self, application: AdmissionApplication) {
        self.applications
            .lock()
            .expect("application mutex poisoned")
            .insert(application.id.clone(), application);
    }

    /// Make `append_enrollment` fail once the ledger holds `limit` records.
    pub(super) fn fail_enrollments_after(&self, limit: usize) {
        *self
            .fail_enrollments_after
            .lock()
            .expect("failure flag mutex poisoned") = Some(limit);
    }

    pub(super) fn course_snapshot(&self, id: &CourseId) -> Option<CourseSnapshot> {
        self.courses
            .lock()
            .expect("course mutex poisoned")
            .get(id)
            .cloned()
    }

    pub(super) fn application(&self, id: &ApplicationId) -> Option<AdmissionApplication> {
        self.applications
            .lock()
            .expect("application mutex poisoned")
            .get(id)
            .cloned()
    }

    pub(super) fn enrollments(&self) -> Vec<Enrollment> {
        self.enrollments
            .lock()
            .expect("enrollment mutex poisoned")
            .clone()
    }

    pub(super) fn allocations(&self) -> Vec<HostelAllocation> {
        self.allocations
            .lock()
            .expect("allocation mutex poisoned")
            .clone()
    }

    pub(super) fn role_of(&self, user_id: &UserId) -> Option<String> {
        self.roles
            .lock()
            .expect("role mutex poisoned")
            .get(user_id)
            .cloned()
    }
}

impl AdmissionsRepository for MemoryRepository {
    fn course(&self, id: &CourseId) -> Result<Option<CourseSnapshot>, RepositoryError> {
        Ok(self
            .courses
            .lock()
            .expect("course mutex poisoned")
            .get(id)
            .cloned())
    }

    fn pending_applications(
        &self,
        course_id: &CourseId,
        admission_year: i32,
    ) -> Result<Vec<AdmissionApplication>, RepositoryError> {
        Ok(self
            .applications
            .lock()
            .expect("application mutex poisoned")
            .values()
            .filter(|application| {
                application.course_id == *course_id
                    && application.admission_year == admission_year
                    && application.status == ApplicationStatus::Pending
            })
            .cloned()
            .collect())
    }

    fn insert_application(
        &self,
        application: AdmissionApplication,
    ) -> Result<AdmissionApplication, RepositoryError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn open_application_for(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<AdmissionApplication>, RepositoryError> {
        Ok(self
            .applications
            .lock()
            .expect("application mutex poisoned")
            .values()
            .find(|application| {
                application.applicant.user_id == *user_id
                    && application.course_id == *course_id
                    && application.status.is_open()
            })
            .cloned())
    }

    fn record_outcome(
        &self,
        id: &ApplicationId,
        rank: u32,
        status: ApplicationStatus,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        let application = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        application.merit_rank = Some(rank);
        application.status = status;
        Ok(())
    }

    fn promote_to_student(&self, user_id: &UserId) -> Result<(), RepositoryError> {
        self.roles
            .lock()
            .expect("role mutex poisoned")
            .insert(user_id.clone(), "student".to_string());
        Ok(())
    }

    fn enrollment_count(&self, year: i32) -> Result<u64, RepositoryError> {
        Ok(self
            .enrollments
            .lock()
            .expect("enrollment mutex poisoned")
            .iter()
            .filter(|enrollment| enrollment.enrollment_year == year)
            .count() as u64)
    }

    fn enrollment_count_for_course(
        &self,
        course_id: &CourseId,
        year: i32,
    ) -> Result<u64, RepositoryError> {
        Ok(self
            .enrollments
            .lock()
            .expect("enrollment mutex poisoned")
            .iter()
            .filter(|enrollment| {
                enrollment.course_id == *course_id && enrollment.enrollment_year == year
            })
            .count() as u64)
    }

    fn append_enrollment(&self, enrollment: Enrollment) -> Result<(), RepositoryError> {
        let mut guard = self.enrollments.lock().expect("enrollment mutex poisoned");

        if let Some(limit) = *self
            .fail_enrollments_after
            .lock()
            .expect("failure flag mutex poisoned")
        {
            if guard.len() >= limit {
                return Err(RepositoryError::Unavailable("ledger offline".to_string()));
            }
        }

        let duplicate = guard.iter().any(|existing| {
            existing.enrollment_no == enrollment.enrollment_no
                || existing.roll_no == enrollment.roll_no
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }

        guard.push(enrollment);
        Ok(())
    }

    fn first_hostel_with_vacancy(&self) -> Result<Option<Hostel>, RepositoryError> {
        Ok(self
            .hostels
            .lock()
            .expect("hostel mutex poisoned")
            .iter()
            .find(|hostel| hostel.is_active && !hostel.rooms.is_exhausted())
            .cloned())
    }

    fn allocate_room(
        &self,
        hostel_id: &HostelId,
        allocation: HostelAllocation,
    ) -> Result<(), RepositoryError> {
        let mut hostels = self.hostels.lock().expect("hostel mutex poisoned");
        let hostel = hostels
            .iter_mut()
            .find(|hostel| hostel.id == *hostel_id)
            .ok_or(RepositoryError::NotFound)?;
        hostel.rooms.reserve(1)?;

        self.allocations
            .lock()
            .expect("allocation mutex poisoned")
            .push(allocation);
        Ok(())
    }

    fn reserve_seats(&self, course_id: &CourseId, count: u32) -> Result<(), RepositoryError> {
        let mut guard = self.courses.lock().expect("course mutex poisoned");
        let course = guard.get_mut(course_id).ok_or(RepositoryError::NotFound)?;
        course.seats.reserve(count)?;
        Ok(())
    }

    fn settled_applications(
        &self,
        filter: &MeritListFilter,
    ) -> Result<Vec<AdmissionApplication>, RepositoryError> {
        Ok(self
            .applications
            .lock()
            .expect("application mutex poisoned")
            .values()
            .filter(|application| {
                matches!(
                    application.status,
                    ApplicationStatus::Selected | ApplicationStatus::Rejected
                ) && application.merit_rank.is_some()
            })
            .filter(|application| {
                filter
                    .course_id
                    .as_ref()
                    .map(|course_id| application.course_id == *course_id)
                    .unwrap_or(true)
            })
            .filter(|application| {
                filter
                    .admission_year
                    .map(|year| application.admission_year == year)
                    .unwrap_or(true)
            })
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryOutbox {
    events: Mutex<Vec<Notification>>,
}

impl MemoryOutbox {
    pub(super) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("outbox mutex poisoned").clone()
    }
}

impl NotificationSink for MemoryOutbox {
    fn push(&self, notification: Notification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("outbox mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl AdmissionsRepository for UnavailableRepository {
    fn course(&self, _id: &CourseId) -> Result<Option<CourseSnapshot>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn pending_applications(
        &self,
        _course_id: &CourseId,
        _admission_year: i32,
    ) -> Result<Vec<AdmissionApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_application(
        &self,
        _application: AdmissionApplication,
    ) -> Result<AdmissionApplication, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn open_application_for(
        &self,
        _user_id: &UserId,
        _course_id: &CourseId,
    ) -> Result<Option<AdmissionApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn record_outcome(
        &self,
        _id: &ApplicationId,
        _rank: u32,
        _status: ApplicationStatus,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn promote_to_student(&self, _user_id: &UserId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn enrollment_count(&self, _year: i32) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn enrollment_count_for_course(
        &self,
        _course_id: &CourseId,
        _year: i32,
    ) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn append_enrollment(&self, _enrollment: Enrollment) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn first_hostel_with_vacancy(&self) -> Result<Option<Hostel>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn allocate_room(
        &self,
        _hostel_id: &HostelId,
        _allocation: HostelAllocation,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn reserve_seats(&self, _course_id: &CourseId, _count: u32) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn settled_applications(
        &self,
        _filter: &MeritListFilter,
    ) -> Result<Vec<AdmissionApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
