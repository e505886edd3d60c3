use crate::infra::{seed_catalog, InMemoryAdmissionsRepository, InMemoryNotificationOutbox};
use campus::error::AppError;
use campus::workflows::admissions::{
    AdmissionsError, AdmissionsService, ApplicantContact, ApplicationForm, CourseId, ProgramType,
    SettlementRequest, UserId,
};
use campus::workflows::roster::RosterImporter;
use chrono::{Datelike, Local};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional roster CSV export to file instead of the built-in batch
    #[arg(long)]
    pub(crate) roster_csv: Option<PathBuf>,
    /// Admission year for the cycle (defaults to the current year)
    #[arg(long)]
    pub(crate) admission_year: Option<i32>,
    /// Seat budget for each seeded course
    #[arg(long, default_value_t = 2)]
    pub(crate) seats: u32,
}

#[derive(Args, Debug)]
pub(crate) struct RosterInspectArgs {
    /// Roster CSV export to parse
    #[arg(long)]
    pub(crate) path: PathBuf,
    /// Course the submissions would target
    #[arg(long, default_value = "crs-cse")]
    pub(crate) course_id: String,
    /// Admission year for the cycle (defaults to the current year)
    #[arg(long)]
    pub(crate) admission_year: Option<i32>,
}

pub(crate) fn run_roster_inspect(args: RosterInspectArgs) -> Result<(), AppError> {
    let RosterInspectArgs {
        path,
        course_id,
        admission_year,
    } = args;

    let year = admission_year.unwrap_or_else(current_year);
    let forms = RosterImporter::from_path(path, CourseId(course_id.clone()), year)?;

    println!("Roster export for {course_id}, admission year {year}");
    println!("{} submission(s) parsed", forms.len());
    for form in &forms {
        println!(
            "- {} <{}> | {} | {:.2}% | hostel {}",
            form.applicant.full_name,
            form.applicant.email,
            form.program_type.label(),
            form.percentage,
            if form.hostel_required { "yes" } else { "no" }
        );
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        roster_csv,
        admission_year,
        seats,
    } = args;

    let year = admission_year.unwrap_or_else(current_year);
    let course_id = CourseId("crs-cse".to_string());

    println!("Admissions settlement demo (admission year {year})");

    let repository = Arc::new(InMemoryAdmissionsRepository::default());
    seed_catalog(&repository, seats);
    let outbox = Arc::new(InMemoryNotificationOutbox::default());
    let service = AdmissionsService::new(repository.clone(), outbox.clone());

    let forms = match roster_csv {
        Some(path) => {
            println!("Data source: roster CSV import");
            RosterImporter::from_path(path, course_id.clone(), year)?
        }
        None => {
            println!("Data source: built-in sample batch");
            sample_batch(&course_id, year)
        }
    };

    println!("\nIntake");
    for form in forms {
        let name = form.applicant.full_name.clone();
        match service.submit(form) {
            Ok(application) => println!(
                "- {} ({:.2}%) -> {}",
                name,
                application.percentage,
                application.status.label()
            ),
            Err(err) => println!("- {} -> rejected at intake: {}", name, err),
        }
    }

    let report = match service.generate_merit_list(SettlementRequest {
        course_id,
        admission_year: Some(year),
    }) {
        Ok(report) => report,
        Err(AdmissionsError::NoEligibleCandidates) => {
            println!("\nNo eligible applications found; nothing to settle");
            return Ok(());
        }
        Err(err) => {
            println!("\nSettlement failed: {err}");
            return Ok(());
        }
    };

    println!("\nMerit list for {}", report.course);
    println!(
        "{} application(s) considered | {} selected | {} rejected",
        report.total_applications, report.selected, report.rejected
    );
    for entry in &report.merit_list {
        println!(
            "- #{} {} | {:.2}% | {}",
            entry.rank, entry.student.full_name, entry.percentage, entry.status
        );
    }

    println!("\nEnrollments");
    for enrollment in repository.enrollments() {
        let role = repository
            .role_of(&enrollment.student_id)
            .unwrap_or_else(|| "applicant".to_string());
        println!(
            "- {} | roll {} | semester {} | {} | directory role {}",
            enrollment.enrollment_no,
            enrollment.roll_no,
            enrollment.current_semester,
            enrollment.status.label(),
            role
        );
    }

    let allocations = repository.allocations();
    if allocations.is_empty() {
        println!("\nHostel allocations: none");
    } else {
        println!("\nHostel allocations");
        for allocation in allocations {
            println!(
                "- {} -> room {} ({})",
                allocation.student_id.0,
                allocation.room_number,
                allocation.status.label()
            );
        }
    }

    println!("\nNotification outbox");
    for notification in outbox.events() {
        println!(
            "- [{}] {} -> {}: {}",
            notification.kind.label(),
            notification.user_id.0,
            notification.title,
            notification.message
        );
    }

    Ok(())
}

fn sample_batch(course_id: &CourseId, year: i32) -> Vec<ApplicationForm> {
    let applicant = |tag: &str, name: &str| ApplicantContact {
        user_id: UserId(format!("usr-{tag}")),
        full_name: name.to_string(),
        email: format!("{tag}@example.edu"),
        phone: "555-0100".to_string(),
    };

    let form = |contact: ApplicantContact, percentage: f64, hostel_required: bool| {
        ApplicationForm {
            applicant: contact,
            course_id: course_id.clone(),
            program_type: ProgramType::Undergraduate,
            percentage,
            hostel_required,
            admission_year: Some(year),
            submitted_at: None,
        }
    };

    vec![
        form(applicant("asha", "Asha Verma"), 92.5, true),
        form(applicant("rohan", "Rohan Iyer"), 81.0, false),
        form(applicant("meera", "Meera Shah"), 67.25, true),
        form(applicant("kabir", "Kabir Rao"), 44.0, false),
    ]
}

fn current_year() -> i32 {
    Local::now().year()
}
