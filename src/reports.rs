//! Tabular read models behind the `reports.*` methods.

use serde::Serialize;

use crate::calc::{self, round_half_up};
use crate::domain::{CourseView, EnrollmentView, TeacherView};
use crate::error::{RegistrarError, Result};
use crate::registrar::{EnrollmentFilter, Registrar};
use crate::store::SqliteStore;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentReportRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub age: i64,
    pub major: String,
    pub gpa: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentsReport {
    pub students: Vec<StudentReportRow>,
    pub total_students: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeachersReport {
    pub teachers: Vec<TeacherView>,
    pub total_teachers: usize,
    pub total_salary: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursesReport {
    pub courses: Vec<CourseView>,
    pub total_courses: usize,
    pub total_credits: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursesByTeacherReport {
    pub teacher: TeacherView,
    pub courses: Vec<CourseView>,
    pub total_courses: usize,
    pub total_credits: i64,
}

/// One enrollment flattened for display. `grade` is `None` while ungraded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentReportRow {
    pub student_id: i64,
    pub student_name: String,
    pub student_email: String,
    pub major: String,
    pub course_id: i64,
    pub course_name: String,
    pub credits: i64,
    pub teacher_name: Option<String>,
    pub semester: String,
    pub grade: Option<f64>,
}

impl From<&EnrollmentView> for EnrollmentReportRow {
    fn from(v: &EnrollmentView) -> Self {
        Self {
            student_id: v.student.id(),
            student_name: v.student.name().to_string(),
            student_email: v.student.person().email().to_string(),
            major: v.student.major().to_string(),
            course_id: v.course.id(),
            course_name: v.course.name().to_string(),
            credits: v.course.credits(),
            teacher_name: v.teacher.as_ref().map(|t| t.name().to_string()),
            semester: v.semester.to_string(),
            grade: v.enrollment.grade().value(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentsReport {
    pub rows: Vec<EnrollmentReportRow>,
    pub total_enrollments: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterResultsReport {
    pub student_name: String,
    pub semester: String,
    pub rows: Vec<EnrollmentReportRow>,
    pub graded_count: usize,
    /// Plain mean of graded marks, 0-100.
    pub average_grade: f64,
    /// Credit-weighted GPA for the term, 0-4.
    pub gpa: f64,
}

/// Every student with the GPA recomputed from their graded enrollments.
pub fn students(store: SqliteStore<'_>) -> Result<StudentsReport> {
    let gpas = Registrar::new(store).gpas_by_student(&store)?;
    let students: Vec<StudentReportRow> = store
        .list_students()?
        .into_iter()
        .map(|s| StudentReportRow {
            id: s.id(),
            name: s.name().to_string(),
            email: s.person().email().to_string(),
            gender: s.person().gender().to_string(),
            age: s.person().age(),
            major: s.major().to_string(),
            gpa: round_half_up(gpas.get(&s.id()).copied().unwrap_or(0.0), 2),
        })
        .collect();
    Ok(StudentsReport {
        total_students: students.len(),
        students,
    })
}

pub fn teachers(store: SqliteStore<'_>) -> Result<TeachersReport> {
    let teachers = store.list_teachers()?;
    let total_salary: f64 = teachers.iter().map(|t| t.teacher.salary()).sum();
    Ok(TeachersReport {
        total_teachers: teachers.len(),
        total_salary,
        teachers,
    })
}

pub fn courses(store: SqliteStore<'_>) -> Result<CoursesReport> {
    let courses = store.list_courses()?;
    let total_credits: i64 = courses.iter().map(|c| c.course.credits()).sum();
    Ok(CoursesReport {
        total_courses: courses.len(),
        total_credits,
        courses,
    })
}

/// Courses of the first teacher whose name contains `teacher_name`.
pub fn courses_by_teacher(
    store: SqliteStore<'_>,
    teacher_name: &str,
) -> Result<CoursesByTeacherReport> {
    let teacher = store
        .search_teachers(teacher_name)?
        .into_iter()
        .next()
        .ok_or_else(|| RegistrarError::not_found("teacher", teacher_name.trim()))?;
    let courses = store.courses_by_teacher(teacher.teacher.id())?;
    let total_credits: i64 = courses.iter().map(|c| c.course.credits()).sum();
    Ok(CoursesByTeacherReport {
        teacher,
        total_courses: courses.len(),
        total_credits,
        courses,
    })
}

fn enrollment_rows(views: &[EnrollmentView]) -> EnrollmentsReport {
    let rows: Vec<EnrollmentReportRow> = views.iter().map(EnrollmentReportRow::from).collect();
    EnrollmentsReport {
        total_enrollments: rows.len(),
        rows,
    }
}

pub fn student_enrollments(
    store: SqliteStore<'_>,
    student_name: &str,
) -> Result<EnrollmentsReport> {
    let filter = EnrollmentFilter {
        student_name: Some(student_name.to_string()),
        ..EnrollmentFilter::default()
    };
    Ok(enrollment_rows(&Registrar::new(store).list(&filter)?))
}

fn term_filter(season: &str, year: i64) -> EnrollmentFilter {
    EnrollmentFilter {
        season: Some(season.to_string()),
        year: Some(year),
        ..EnrollmentFilter::default()
    }
}

pub fn students_by_course_semester(
    store: SqliteStore<'_>,
    course_name: &str,
    season: &str,
    year: i64,
) -> Result<EnrollmentsReport> {
    let filter = EnrollmentFilter {
        course_name: Some(course_name.to_string()),
        ..term_filter(season, year)
    };
    let mut views = Registrar::new(store).list(&filter)?;
    views.retain(|v| v.semester.is_term(season, year));
    Ok(enrollment_rows(&views))
}

/// One student's results for one term: rows, mean grade and weighted GPA.
pub fn semester_results(
    store: SqliteStore<'_>,
    student_name: &str,
    season: &str,
    year: i64,
) -> Result<SemesterResultsReport> {
    let filter = EnrollmentFilter {
        student_name: Some(student_name.to_string()),
        ..term_filter(season, year)
    };
    let mut views = Registrar::new(store).list(&filter)?;
    views.retain(|v| v.semester.is_term(season, year));

    let summary = calc::gpa_summary(views.iter().map(|v| &v.enrollment), &store)?;
    let average = calc::semester_average(views.iter().map(|v| v.enrollment.grade()));

    Ok(SemesterResultsReport {
        student_name: student_name.trim().to_string(),
        semester: format!("{} {}", season.trim(), year),
        graded_count: summary.graded_count,
        average_grade: round_half_up(average, 2),
        gpa: round_half_up(summary.gpa, 2),
        rows: views.iter().map(EnrollmentReportRow::from).collect(),
    })
}
