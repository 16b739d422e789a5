use crate::domain::Semester;
use crate::ipc::helpers::{
    db_conn, optional_bool, optional_i64, optional_str, required_i64, required_str, respond,
    HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::store::SqliteStore;
use serde_json::json;

fn handle_semesters_list(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let Some(conn) = state.db.as_ref() else {
        return Ok(json!({ "semesters": [] }));
    };
    let semesters = SqliteStore::new(conn).list_semesters()?;
    Ok(json!({ "semesters": semesters }))
}

fn handle_semesters_get(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let semester = store.get_semester(required_i64(req, "semesterId")?)?;
    Ok(json!({ "semester": semester }))
}

fn handle_semesters_search(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let semesters = store.search_semesters(&required_str(req, "season")?)?;
    Ok(json!({ "semesters": semesters }))
}

fn handle_semesters_create(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let semester = Semester::new(
        0,
        required_str(req, "season")?,
        required_i64(req, "year")?,
        optional_bool(req, "isOpen")?.unwrap_or(false),
    )?;
    let semester_id = store.create_semester(&semester)?;
    Ok(json!({ "semesterId": semester_id }))
}

fn handle_semesters_update(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let mut semester = store.get_semester(required_i64(req, "semesterId")?)?;
    if let Some(season) = optional_str(req, "season") {
        semester.set_season(season)?;
    }
    if let Some(year) = optional_i64(req, "year")? {
        semester.set_year(year)?;
    }
    if let Some(is_open) = optional_bool(req, "isOpen")? {
        semester.set_open(is_open);
    }
    store.update_semester(&semester)?;
    Ok(json!({ "ok": true }))
}

fn handle_semesters_delete(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    store.delete_semester(required_i64(req, "semesterId")?)?;
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "semesters.list" => handle_semesters_list(state),
        "semesters.get" => handle_semesters_get(state, req),
        "semesters.search" => handle_semesters_search(state, req),
        "semesters.create" => handle_semesters_create(state, req),
        "semesters.update" => handle_semesters_update(state, req),
        "semesters.delete" => handle_semesters_delete(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
