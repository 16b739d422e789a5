//! Validated value objects for the student-records domain.
//!
//! Constructors and setters check their input before assigning anything, so a
//! value that exists has passed every rule for its type.

mod admin;
mod course;
mod department;
mod enrollment;
mod person;
mod semester;
mod student;
mod teacher;

pub use admin::Admin;
pub use course::{Course, CourseView, MAX_CREDITS, MIN_CREDITS};
pub use department::Department;
pub use enrollment::{Enrollment, EnrollmentView, Grade};
pub use person::{Person, MIN_AGE};
pub use semester::{Semester, MAX_YEAR, MIN_YEAR};
pub use student::{Student, MAX_GPA};
pub use teacher::{Teacher, TeacherView};

use crate::error::{RegistrarError, Result};

pub(crate) fn require_non_blank(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RegistrarError::validation(field, "is required"));
    }
    Ok(())
}

pub(crate) fn require_id(field: &'static str, id: i64) -> Result<()> {
    if id < 0 {
        return Err(RegistrarError::validation(
            field,
            format!("must not be negative (got {id})"),
        ));
    }
    Ok(())
}
