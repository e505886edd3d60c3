pub mod admissions;
pub mod roster;
