//! Enrollment registrar: owns the one-enrollment-per-(student, course) rule
//! and turns raw joined storage rows into validated views.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::calc::{self, CourseCatalog, GpaSummary};
use crate::domain::{Course, Enrollment, EnrollmentView, Person, Semester, Student, Teacher};
use crate::error::{RegistrarError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentFilter {
    pub student_id: Option<i64>,
    pub course_id: Option<i64>,
    /// Case-insensitive substring of the student name.
    pub student_name: Option<String>,
    /// Case-insensitive substring of the course name.
    pub course_name: Option<String>,
    pub season: Option<String>,
    pub year: Option<i64>,
}

impl EnrollmentFilter {
    pub fn pair(student_id: i64, course_id: i64) -> Self {
        Self {
            student_id: Some(student_id),
            course_id: Some(course_id),
            ..Self::default()
        }
    }

    pub fn student(student_id: i64) -> Self {
        Self {
            student_id: Some(student_id),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PersonRow {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub age: i64,
}

impl PersonRow {
    pub(crate) fn into_person(self) -> Result<Person> {
        Person::new(
            self.id,
            self.name.unwrap_or_default(),
            self.email.unwrap_or_default(),
            self.gender.unwrap_or_default(),
            self.age,
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeacherRow {
    pub person: PersonRow,
    pub department_id: i64,
    pub salary: f64,
}

/// An enrollment as storage returns it: joined, unvalidated columns.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentRow {
    pub student_id: i64,
    pub course_id: i64,
    pub teacher_id: Option<i64>,
    pub semester_id: i64,
    pub grade: f64,
    pub student: PersonRow,
    pub major: Option<String>,
    pub gpa: f64,
    pub course_name: Option<String>,
    pub course_description: Option<String>,
    pub credits: i64,
    pub course_teacher_id: i64,
    pub course_department_id: i64,
    pub teacher: Option<TeacherRow>,
    pub season: Option<String>,
    pub year: i64,
    pub is_open: bool,
}

impl EnrollmentRow {
    pub fn enrollment(&self) -> Result<Enrollment> {
        Enrollment::new(
            self.student_id,
            self.course_id,
            self.teacher_id,
            self.semester_id,
            self.grade,
        )
    }

    pub fn into_view(self) -> Result<EnrollmentView> {
        if is_blank(self.student.name.as_deref()) {
            return Err(RegistrarError::validation("studentName", "is null or blank"));
        }
        if is_blank(self.student.email.as_deref()) {
            return Err(RegistrarError::validation("studentEmail", "is null or blank"));
        }

        let enrollment = self.enrollment()?;
        let student = Student::new(
            self.student.into_person()?,
            self.major.unwrap_or_default(),
            self.gpa,
        )?;
        let course = Course::new(
            self.course_id,
            self.course_name.unwrap_or_default(),
            self.course_description.unwrap_or_default(),
            self.credits,
            self.course_teacher_id,
            self.course_department_id,
        )?;
        let teacher = match (self.teacher_id, self.teacher) {
            (None, _) => None,
            (Some(_), Some(t)) => Some(Teacher::new(
                t.person.into_person()?,
                t.department_id,
                t.salary,
            )?),
            (Some(_), None) => {
                return Err(RegistrarError::validation("teacher", "referenced teacher is missing"));
            }
        };
        let semester = Semester::new(
            self.semester_id,
            self.season.unwrap_or_default(),
            self.year,
            self.is_open,
        )?;

        Ok(EnrollmentView {
            enrollment,
            student,
            course,
            teacher,
            semester,
        })
    }
}

fn is_blank(v: Option<&str>) -> bool {
    v.map(|s| s.trim().is_empty()).unwrap_or(true)
}

fn valid_enrollments(rows: Vec<EnrollmentRow>) -> Vec<Enrollment> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        match row.enrollment() {
            Ok(e) => out.push(e),
            Err(e) => warn!(
                student_id = row.student_id,
                course_id = row.course_id,
                error = %e,
                "skipping malformed enrollment record"
            ),
        }
    }
    out
}

/// Enrollment persistence. Implemented by storage.
pub trait EnrollmentStore {
    /// Whether a record is stored for the pair, valid or not.
    fn enrollment_exists(&self, student_id: i64, course_id: i64) -> Result<bool>;
    fn find_enrollment(&self, student_id: i64, course_id: i64) -> Result<Option<Enrollment>>;
    fn save_enrollment(&self, enrollment: &Enrollment) -> Result<()>;
    /// Returns `false` when no record exists for the pair.
    fn update_enrollment(&self, enrollment: &Enrollment) -> Result<bool>;
    /// Returns `false` when no record existed for the pair.
    fn delete_enrollment(&self, student_id: i64, course_id: i64) -> Result<bool>;
    fn list_enrollments(&self, filter: &EnrollmentFilter) -> Result<Vec<EnrollmentRow>>;
}

pub struct Registrar<S> {
    store: S,
}

impl<S: EnrollmentStore> Registrar<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn add(&self, enrollment: &Enrollment) -> Result<()> {
        let (student_id, course_id) = enrollment.key();
        if self.store.enrollment_exists(student_id, course_id)? {
            return Err(RegistrarError::DuplicateEnrollment {
                student_id,
                course_id,
            });
        }
        self.store.save_enrollment(enrollment)?;
        debug!(student_id, course_id, "enrollment added");
        Ok(())
    }

    /// Replaces grade, teacher and semester for an existing pair.
    pub fn update(&self, enrollment: &Enrollment) -> Result<()> {
        let (student_id, course_id) = enrollment.key();
        if !self.store.update_enrollment(enrollment)? {
            return Err(RegistrarError::not_found(
                "enrollment",
                format!("{student_id}/{course_id}"),
            ));
        }
        debug!(student_id, course_id, "enrollment updated");
        Ok(())
    }

    pub fn delete(&self, student_id: i64, course_id: i64) -> Result<()> {
        let removed = self.store.delete_enrollment(student_id, course_id)?;
        debug!(student_id, course_id, removed, "enrollment delete");
        Ok(())
    }

    pub fn get_by_ids(&self, student_id: i64, course_id: i64) -> Result<Option<EnrollmentView>> {
        Ok(self
            .list(&EnrollmentFilter::pair(student_id, course_id))?
            .into_iter()
            .next())
    }

    /// Joined enrollments matching `filter`. Rows that fail validation are
    /// logged and left out of the result.
    pub fn list(&self, filter: &EnrollmentFilter) -> Result<Vec<EnrollmentView>> {
        let rows = self.store.list_enrollments(filter)?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let (student_id, course_id) = (row.student_id, row.course_id);
            match row.into_view() {
                Ok(v) => out.push(v),
                Err(e) => {
                    warn!(
                        student_id,
                        course_id,
                        error = %e,
                        "skipping malformed enrollment record"
                    );
                }
            }
        }
        Ok(out)
    }

    pub fn student_gpa_summary<C>(&self, catalog: &C, student_id: i64) -> Result<GpaSummary>
    where
        C: CourseCatalog + ?Sized,
    {
        let rows = self
            .store
            .list_enrollments(&EnrollmentFilter::student(student_id))?;
        calc::gpa_summary(&valid_enrollments(rows), catalog)
    }

    pub fn student_gpa<C>(&self, catalog: &C, student_id: i64) -> Result<f64>
    where
        C: CourseCatalog + ?Sized,
    {
        Ok(self.student_gpa_summary(catalog, student_id)?.gpa)
    }

    /// GPA for every student that has at least one enrollment.
    pub fn gpas_by_student<C>(&self, catalog: &C) -> Result<BTreeMap<i64, f64>>
    where
        C: CourseCatalog + ?Sized,
    {
        let rows = self.store.list_enrollments(&EnrollmentFilter::default())?;
        let mut grouped: BTreeMap<i64, Vec<Enrollment>> = BTreeMap::new();
        for e in valid_enrollments(rows) {
            grouped.entry(e.student_id()).or_default().push(e);
        }
        let mut out = BTreeMap::new();
        for (student_id, enrollments) in grouped {
            out.insert(student_id, calc::calculate_gpa(&enrollments, catalog)?);
        }
        Ok(out)
    }
}
