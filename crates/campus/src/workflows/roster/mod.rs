//! Bulk applicant intake from registrar roster exports.
//!
//! Admissions offices hand over applicant batches as CSV
//! (`Full Name, Email, Phone, Program, Percentage, Hostel, Submitted At`).
//! The importer turns one export into submission forms for a single course
//! and admission cycle; actually filing them goes through the ordinary
//! intake checks on [`AdmissionsService::submit`].
//!
//! [`AdmissionsService::submit`]: crate::workflows::admissions::AdmissionsService::submit

mod parser;

use crate::workflows::admissions::{
    ApplicantContact, ApplicationForm, CourseId, ProgramType, UserId,
};
use std::io::Read;
use std::path::Path;

use parser::RosterRow;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { row: usize, message: String },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::Row { row, message } => {
                write!(f, "invalid roster row {}: {}", row, message)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::Row { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        course_id: CourseId,
        admission_year: i32,
    ) -> Result<Vec<ApplicationForm>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, course_id, admission_year)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        course_id: CourseId,
        admission_year: i32,
    ) -> Result<Vec<ApplicationForm>, RosterImportError> {
        let rows = parser::parse_rows(reader)?;
        let mut forms = Vec::with_capacity(rows.len());

        for (index, row) in rows.into_iter().enumerate() {
            forms.push(row_to_form(&row, index + 1, &course_id, admission_year)?);
        }

        Ok(forms)
    }
}

fn row_to_form(
    row: &RosterRow,
    row_number: usize,
    course_id: &CourseId,
    admission_year: i32,
) -> Result<ApplicationForm, RosterImportError> {
    if row.email.trim().is_empty() {
        return Err(RosterImportError::Row {
            row: row_number,
            message: "email is required".to_string(),
        });
    }

    let program_type = match row.program.trim().to_ascii_uppercase().as_str() {
        "UG" => ProgramType::Undergraduate,
        "PG" => ProgramType::Postgraduate,
        other => {
            return Err(RosterImportError::Row {
                row: row_number,
                message: format!("unknown program '{}' (expected UG or PG)", other),
            })
        }
    };

    let percentage: f64 = row.percentage.trim().parse().map_err(|_| {
        RosterImportError::Row {
            row: row_number,
            message: format!("percentage '{}' is not a number", row.percentage),
        }
    })?;
    if !(0.0..=100.0).contains(&percentage) {
        return Err(RosterImportError::Row {
            row: row_number,
            message: format!("percentage {} is outside 0..=100", percentage),
        });
    }

    Ok(ApplicationForm {
        applicant: ApplicantContact {
            // The export carries no directory ids; the email is the stable key.
            user_id: UserId(row.email.trim().to_ascii_lowercase()),
            full_name: row.full_name.clone(),
            email: row.email.trim().to_ascii_lowercase(),
            phone: row.phone.clone(),
        },
        course_id: course_id.clone(),
        program_type,
        percentage,
        hostel_required: row.hostel_required(),
        admission_year: Some(admission_year),
        submitted_at: row.submission_time(),
    })
}
