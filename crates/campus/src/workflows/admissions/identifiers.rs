/// Identifier pair minted for one admitted candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionIdentifiers {
    pub enrollment_no: String,
    pub roll_no: String,
}

/// Run-scoped sequence pair for enrollment and roll numbers.
///
/// Seeded exactly once per settlement run from the existing enrollment
/// counts, then advanced in memory per admission. Two candidates settled in
/// the same run can therefore never observe the same count, which is what a
/// fresh store query per candidate could not guarantee.
///
/// Enrollment numbers are `{year}{seq:05}` and unique system-wide; roll
/// numbers are `{year}{courseCode}{seq:03}` and unique within a course and
/// year. Padding widths are fixed; overflow beyond them is out of scope.
#[derive(Debug)]
pub struct IdentifierAllocator {
    year: i32,
    course_code: String,
    enrollment_seq: u64,
    roll_seq: u64,
}

impl IdentifierAllocator {
    pub fn seed(
        year: i32,
        course_code: impl Into<String>,
        enrollments_in_year: u64,
        enrollments_in_course: u64,
    ) -> Self {
        Self {
            year,
            course_code: course_code.into(),
            enrollment_seq: enrollments_in_year,
            roll_seq: enrollments_in_course,
        }
    }

    /// Mint identifiers for the next admitted candidate in rank order.
    pub fn next(&mut self) -> AdmissionIdentifiers {
        self.enrollment_seq += 1;
        self.roll_seq += 1;

        AdmissionIdentifiers {
            enrollment_no: format!("{}{:05}", self.year, self.enrollment_seq),
            roll_no: format!("{}{}{:03}", self.year, self.course_code, self.roll_seq),
        }
    }
}
