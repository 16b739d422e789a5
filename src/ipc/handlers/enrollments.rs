use crate::domain::{Enrollment, Grade};
use crate::error::RegistrarError;
use crate::ipc::helpers::{db_conn, optional_f64, optional_i64, required_i64, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::registrar::{EnrollmentFilter, EnrollmentStore, Registrar};
use crate::store::SqliteStore;
use serde_json::json;

fn parse_filter(req: &Request) -> Result<EnrollmentFilter, HandlerErr> {
    match req.params.get("filter") {
        None | Some(serde_json::Value::Null) => Ok(EnrollmentFilter::default()),
        Some(v) => serde_json::from_value(v.clone()).map_err(|e| HandlerErr {
            code: "bad_params",
            message: format!("invalid filter: {e}"),
            details: Some(json!({ "filter": v })),
        }),
    }
}

fn pair_params(req: &Request) -> Result<(i64, i64), HandlerErr> {
    Ok((required_i64(req, "studentId")?, required_i64(req, "courseId")?))
}

fn handle_enrollments_list(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let filter = parse_filter(req)?;
    let Some(conn) = state.db.as_ref() else {
        return Ok(json!({ "enrollments": [] }));
    };
    let enrollments = Registrar::new(SqliteStore::new(conn)).list(&filter)?;
    Ok(json!({ "enrollments": enrollments }))
}

fn handle_enrollments_get(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let registrar = Registrar::new(SqliteStore::new(db_conn(state)?));
    let (student_id, course_id) = pair_params(req)?;
    let enrollment = registrar
        .get_by_ids(student_id, course_id)?
        .ok_or_else(|| {
            RegistrarError::not_found("enrollment", format!("{student_id}/{course_id}"))
        })?;
    Ok(json!({ "enrollment": enrollment }))
}

fn handle_enrollments_create(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let registrar = Registrar::new(SqliteStore::new(db_conn(state)?));
    let (student_id, course_id) = pair_params(req)?;
    let enrollment = Enrollment::new(
        student_id,
        course_id,
        optional_i64(req, "teacherId")?,
        required_i64(req, "semesterId")?,
        optional_f64(req, "grade")?.unwrap_or(Grade::UNGRADED_SENTINEL),
    )?;
    registrar.add(&enrollment)?;
    Ok(json!({ "enrollment": enrollment }))
}

fn handle_enrollments_update(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let (student_id, course_id) = pair_params(req)?;
    let mut enrollment = store
        .find_enrollment(student_id, course_id)?
        .ok_or_else(|| {
            RegistrarError::not_found("enrollment", format!("{student_id}/{course_id}"))
        })?;

    if let Some(grade) = optional_f64(req, "grade")? {
        enrollment.set_grade(grade)?;
    }
    // An explicit null clears the teacher.
    if req.params.get("teacherId").is_some() {
        enrollment.set_teacher_id(optional_i64(req, "teacherId")?)?;
    }
    if let Some(semester_id) = optional_i64(req, "semesterId")? {
        enrollment.set_semester_id(semester_id)?;
    }

    Registrar::new(store).update(&enrollment)?;
    Ok(json!({ "enrollment": enrollment }))
}

fn handle_enrollments_delete(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let registrar = Registrar::new(SqliteStore::new(db_conn(state)?));
    let (student_id, course_id) = pair_params(req)?;
    registrar.delete(student_id, course_id)?;
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "enrollments.list" => handle_enrollments_list(state, req),
        "enrollments.get" => handle_enrollments_get(state, req),
        "enrollments.create" => handle_enrollments_create(state, req),
        "enrollments.update" => handle_enrollments_update(state, req),
        "enrollments.delete" => handle_enrollments_delete(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
