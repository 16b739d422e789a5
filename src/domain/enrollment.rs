use serde::{Serialize, Serializer};

use super::{require_id, Course, Semester, Student, Teacher};
use crate::error::{RegistrarError, Result};

/// A course result. On the wire and in storage the ungraded state is `-1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Grade {
    Ungraded,
    Scored(f64),
}

impl Grade {
    pub const UNGRADED_SENTINEL: f64 = -1.0;
    pub const MAX: f64 = 100.0;

    pub fn from_raw(raw: f64) -> Result<Self> {
        if raw == Self::UNGRADED_SENTINEL {
            return Ok(Self::Ungraded);
        }
        if !(0.0..=Self::MAX).contains(&raw) {
            return Err(RegistrarError::validation(
                "grade",
                format!("must be between 0 and 100, or -1 for ungraded (got {raw})"),
            ));
        }
        Ok(Self::Scored(raw))
    }

    pub fn raw(self) -> f64 {
        match self {
            Self::Ungraded => Self::UNGRADED_SENTINEL,
            Self::Scored(v) => v,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Self::Ungraded => None,
            Self::Scored(v) => Some(v),
        }
    }

    pub fn is_graded(self) -> bool {
        matches!(self, Self::Scored(_))
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.raw())
    }
}

/// One student in one course within one semester. Identity is the
/// `(student_id, course_id)` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    student_id: i64,
    course_id: i64,
    teacher_id: Option<i64>,
    semester_id: i64,
    grade: Grade,
}

impl Enrollment {
    pub fn new(
        student_id: i64,
        course_id: i64,
        teacher_id: Option<i64>,
        semester_id: i64,
        grade: f64,
    ) -> Result<Self> {
        let enrollment = Self {
            student_id,
            course_id,
            teacher_id,
            semester_id,
            grade: Grade::from_raw(grade)?,
        };
        enrollment.validate()?;
        Ok(enrollment)
    }

    pub fn validate(&self) -> Result<()> {
        require_id("studentId", self.student_id)?;
        require_id("courseId", self.course_id)?;
        if let Some(t) = self.teacher_id {
            require_id("teacherId", t)?;
        }
        require_id("semesterId", self.semester_id)?;
        Grade::from_raw(self.grade.raw()).map(|_| ())
    }

    pub fn key(&self) -> (i64, i64) {
        (self.student_id, self.course_id)
    }

    pub fn student_id(&self) -> i64 {
        self.student_id
    }

    pub fn course_id(&self) -> i64 {
        self.course_id
    }

    pub fn teacher_id(&self) -> Option<i64> {
        self.teacher_id
    }

    pub fn semester_id(&self) -> i64 {
        self.semester_id
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn set_grade(&mut self, raw: f64) -> Result<()> {
        self.grade = Grade::from_raw(raw)?;
        Ok(())
    }

    pub fn set_teacher_id(&mut self, teacher_id: Option<i64>) -> Result<()> {
        if let Some(t) = teacher_id {
            require_id("teacherId", t)?;
        }
        self.teacher_id = teacher_id;
        Ok(())
    }

    pub fn set_semester_id(&mut self, semester_id: i64) -> Result<()> {
        require_id("semesterId", semester_id)?;
        self.semester_id = semester_id;
        Ok(())
    }
}

/// An enrollment joined with the records it references.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentView {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub student: Student,
    pub course: Course,
    pub teacher: Option<Teacher>,
    pub semester: Semester,
}
