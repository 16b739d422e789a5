use crate::domain::Course;
use crate::ipc::helpers::{
    db_conn, optional_i64, optional_str, required_i64, required_str, respond, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::store::SqliteStore;
use serde_json::json;

fn handle_courses_list(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let Some(conn) = state.db.as_ref() else {
        return Ok(json!({ "courses": [] }));
    };
    let courses = SqliteStore::new(conn).list_courses()?;
    Ok(json!({ "courses": courses }))
}

fn handle_courses_get(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let course = store.get_course(required_i64(req, "courseId")?)?;
    Ok(json!({ "course": course }))
}

fn handle_courses_by_teacher(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let teacher_id = required_i64(req, "teacherId")?;
    store.get_teacher(teacher_id)?;
    let courses = store.courses_by_teacher(teacher_id)?;
    Ok(json!({ "courses": courses }))
}

fn handle_courses_create(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let course = Course::new(
        0,
        required_str(req, "name")?,
        required_str(req, "description")?,
        required_i64(req, "credits")?,
        required_i64(req, "teacherId")?,
        required_i64(req, "departmentId")?,
    )?;
    let course_id = store.create_course(&course)?;
    Ok(json!({ "courseId": course_id }))
}

fn handle_courses_update(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let course_id = required_i64(req, "courseId")?;
    let current = store.get_course(course_id)?.course;
    let mut course = Course::new(
        course_id,
        optional_str(req, "name").unwrap_or_else(|| current.name().to_string()),
        optional_str(req, "description").unwrap_or_else(|| current.description().to_string()),
        current.credits(),
        current.teacher_id(),
        optional_i64(req, "departmentId")?.unwrap_or(current.department_id()),
    )?;
    if let Some(credits) = optional_i64(req, "credits")? {
        course.set_credits(credits)?;
    }
    if let Some(teacher_id) = optional_i64(req, "teacherId")? {
        course.set_teacher_id(teacher_id)?;
    }
    store.update_course(&course)?;
    Ok(json!({ "ok": true }))
}

fn handle_courses_delete(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    store.delete_course(required_i64(req, "courseId")?)?;
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "courses.list" => handle_courses_list(state),
        "courses.get" => handle_courses_get(state, req),
        "courses.byTeacher" => handle_courses_by_teacher(state, req),
        "courses.create" => handle_courses_create(state, req),
        "courses.update" => handle_courses_update(state, req),
        "courses.delete" => handle_courses_delete(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
