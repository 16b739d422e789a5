pub mod admins;
pub mod core;
pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod reports;
pub mod semesters;
pub mod students;
pub mod teachers;
