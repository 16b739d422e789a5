use crate::domain::Teacher;
use crate::ipc::helpers::{
    apply_person_params, db_conn, optional_f64, optional_i64, person_params, required_f64,
    required_i64, required_str, respond, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::store::SqliteStore;
use serde_json::json;

fn handle_teachers_list(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let Some(conn) = state.db.as_ref() else {
        return Ok(json!({ "teachers": [] }));
    };
    let teachers = SqliteStore::new(conn).list_teachers()?;
    Ok(json!({ "teachers": teachers }))
}

fn handle_teachers_search(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let teachers = store.search_teachers(&required_str(req, "name")?)?;
    Ok(json!({ "teachers": teachers }))
}

fn handle_teachers_create(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let teacher = Teacher::new(
        person_params(req)?,
        required_i64(req, "departmentId")?,
        required_f64(req, "salary")?,
    )?;
    let teacher_id = store.create_teacher(&teacher)?;
    Ok(json!({ "teacherId": teacher_id }))
}

fn handle_teachers_update(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let mut teacher = store.get_teacher(required_i64(req, "teacherId")?)?.teacher;
    apply_person_params(req, teacher.person_mut())?;
    if let Some(department_id) = optional_i64(req, "departmentId")? {
        teacher.set_department_id(department_id)?;
    }
    if let Some(salary) = optional_f64(req, "salary")? {
        teacher.set_salary(salary)?;
    }
    store.update_teacher(&teacher)?;
    Ok(json!({ "ok": true }))
}

fn handle_teachers_delete(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    store.delete_teacher(required_i64(req, "teacherId")?)?;
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "teachers.list" => handle_teachers_list(state),
        "teachers.search" => handle_teachers_search(state, req),
        "teachers.create" => handle_teachers_create(state, req),
        "teachers.update" => handle_teachers_update(state, req),
        "teachers.delete" => handle_teachers_delete(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
