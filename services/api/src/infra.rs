use campus::workflows::admissions::{
    AdmissionApplication, AdmissionsRepository, ApplicationId, ApplicationStatus, Capacity,
    CourseId, CourseSnapshot, Enrollment, GenderEligibility, Hostel, HostelAllocation, HostelId,
    MeritListFilter, Notification, NotificationError, NotificationSink, ProgramType,
    RepositoryError, UserId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Document-store stand-in backing the service until a real database is
/// wired up: one mutex-held map or list per collection.
#[derive(Default)]
pub(crate) struct InMemoryAdmissionsRepository {
    courses: Mutex<HashMap<CourseId, CourseSnapshot>>,
    applications: Mutex<HashMap<ApplicationId, AdmissionApplication>>,
    roles: Mutex<HashMap<UserId, String>>,
    enrollments: Mutex<Vec<Enrollment>>,
    hostels: Mutex<Vec<Hostel>>,
    allocations: Mutex<Vec<HostelAllocation>>,
}

impl InMemoryAdmissionsRepository {
    pub(crate) fn insert_course(&self, course: CourseSnapshot) {
        self.courses
            .lock()
            .expect("course mutex poisoned")
            .insert(course.id.clone(), course);
    }

    pub(crate) fn insert_hostel(&self, hostel: Hostel) {
        self.hostels
            .lock()
            .expect("hostel mutex poisoned")
            .push(hostel);
    }

    pub(crate) fn enrollments(&self) -> Vec<Enrollment> {
        self.enrollments
            .lock()
            .expect("enrollment mutex poisoned")
            .clone()
    }

    pub(crate) fn allocations(&self) -> Vec<HostelAllocation> {
        self.allocations
            .lock()
            .expect("allocation mutex poisoned")
            .clone()
    }

    pub(crate) fn role_of(&self, user_id: &UserId) -> Option<String> {
        self.roles
            .lock()
            .expect("role mutex poisoned")
            .get(user_id)
            .cloned()
    }
}

impl AdmissionsRepository for InMemoryAdmissionsRepository {
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
        let mut guard = self
            .applications
            .lock()
            .expect("application mutex poisoned");
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
        let mut guard = self
            .applications
            .lock()
            .expect("application mutex poisoned");
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
pub(crate) struct InMemoryNotificationOutbox {
    events: Mutex<Vec<Notification>>,
}

impl InMemoryNotificationOutbox {
    pub(crate) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("outbox mutex poisoned").clone()
    }
}

impl NotificationSink for InMemoryNotificationOutbox {
    fn push(&self, notification: Notification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("outbox mutex poisoned")
            .push(notification);
        Ok(())
    }
}

/// Seed the catalog the service exposes until admin CRUD lands.
pub(crate) fn seed_catalog(repository: &InMemoryAdmissionsRepository, seats: u32) {
    repository.insert_course(CourseSnapshot {
        id: CourseId("crs-cse".to_string()),
        name: "B.Tech Computer Science".to_string(),
        code: "CSE".to_string(),
        program_type: ProgramType::Undergraduate,
        eligibility_percentage: 60.0,
        seats: Capacity::new(seats),
        is_active: true,
    });
    repository.insert_course(CourseSnapshot {
        id: CourseId("crs-mba".to_string()),
        name: "Master of Business Administration".to_string(),
        code: "MBA".to_string(),
        program_type: ProgramType::Postgraduate,
        eligibility_percentage: 50.0,
        seats: Capacity::new(seats),
        is_active: true,
    });

    repository.insert_hostel(Hostel {
        id: HostelId("hst-north".to_string()),
        name: "North Residency".to_string(),
        code: "NR".to_string(),
        gender: GenderEligibility::CoEd,
        rooms: Capacity::new(2),
        is_active: true,
    });
    repository.insert_hostel(Hostel {
        id: HostelId("hst-south".to_string()),
        name: "South Residency".to_string(),
        code: "SR".to_string(),
        gender: GenderEligibility::Female,
        rooms: Capacity::new(2),
        is_active: true,
    });
}
