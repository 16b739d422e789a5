use crate::ipc::helpers::{db_conn, required_i64, required_str, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::reports;
use crate::store::SqliteStore;
use serde_json::json;

fn store<'a>(state: &'a AppState) -> Result<SqliteStore<'a>, HandlerErr> {
    Ok(SqliteStore::new(db_conn(state)?))
}

fn handle_reports_students(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    Ok(json!(reports::students(store(state)?)?))
}

fn handle_reports_teachers(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    Ok(json!(reports::teachers(store(state)?)?))
}

fn handle_reports_courses(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    Ok(json!(reports::courses(store(state)?)?))
}

fn handle_reports_courses_by_teacher(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let teacher_name = required_str(req, "teacherName")?;
    Ok(json!(reports::courses_by_teacher(store(state)?, &teacher_name)?))
}

fn handle_reports_student_enrollments(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let student_name = required_str(req, "studentName")?;
    Ok(json!(reports::student_enrollments(store(state)?, &student_name)?))
}

fn handle_reports_students_by_course_semester(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let course_name = required_str(req, "courseName")?;
    let season = required_str(req, "season")?;
    let year = required_i64(req, "year")?;
    Ok(json!(reports::students_by_course_semester(
        store(state)?,
        &course_name,
        &season,
        year
    )?))
}

fn handle_reports_semester_results(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let student_name = required_str(req, "studentName")?;
    let season = required_str(req, "season")?;
    let year = required_i64(req, "year")?;
    Ok(json!(reports::semester_results(
        store(state)?,
        &student_name,
        &season,
        year
    )?))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "reports.students" => handle_reports_students(state),
        "reports.teachers" => handle_reports_teachers(state),
        "reports.courses" => handle_reports_courses(state),
        "reports.coursesByTeacher" => handle_reports_courses_by_teacher(state, req),
        "reports.studentEnrollments" => handle_reports_student_enrollments(state, req),
        "reports.studentsByCourseSemester" => {
            handle_reports_students_by_course_semester(state, req)
        }
        "reports.semesterResults" => handle_reports_semester_results(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
