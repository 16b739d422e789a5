use crate::domain::Admin;
use crate::ipc::helpers::{db_conn, person_params, required_str, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::SqliteStore;
use serde_json::json;

fn handle_admins_list(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let Some(conn) = state.db.as_ref() else {
        return Ok(json!({ "admins": [] }));
    };
    let admins = SqliteStore::new(conn).list_admins()?;
    Ok(json!({ "admins": admins }))
}

// `password` must already be a SHA-256 hex digest; plain text is rejected.
fn handle_admins_create(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let admin = Admin::new(
        person_params(req)?,
        required_str(req, "username")?,
        required_str(req, "password")?,
    )?;
    let admin_id = store.create_admin(&admin)?;
    Ok(json!({ "adminId": admin_id, "username": admin.username() }))
}

fn handle_admins_delete(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    store.delete_admin(&required_str(req, "username")?)?;
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "admins.list" => handle_admins_list(state),
        "admins.create" => handle_admins_create(state, req),
        "admins.delete" => handle_admins_delete(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
