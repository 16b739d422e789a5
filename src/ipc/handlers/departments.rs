use crate::domain::Department;
use crate::ipc::helpers::{db_conn, required_i64, required_str, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::SqliteStore;
use serde_json::json;

fn handle_departments_list(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let Some(conn) = state.db.as_ref() else {
        return Ok(json!({ "departments": [] }));
    };
    let departments = SqliteStore::new(conn).list_departments()?;
    Ok(json!({ "departments": departments }))
}

fn handle_departments_create(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let department = Department::new(0, required_str(req, "name")?)?;
    let department_id = store.create_department(&department)?;
    Ok(json!({ "departmentId": department_id, "name": department.name() }))
}

fn handle_departments_delete(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    store.delete_department(required_i64(req, "departmentId")?)?;
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "departments.list" => handle_departments_list(state),
        "departments.create" => handle_departments_create(state, req),
        "departments.delete" => handle_departments_delete(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
