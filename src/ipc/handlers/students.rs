use crate::domain::Student;
use crate::ipc::helpers::{
    apply_person_params, db_conn, optional_str, person_params, required_i64, required_str,
    respond, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::registrar::Registrar;
use crate::store::SqliteStore;
use serde_json::json;
use tracing::info;

// The stored gpa column is a cache; listings always show the live figure.
fn with_current_gpa(
    store: SqliteStore<'_>,
    students: Vec<Student>,
) -> Result<Vec<Student>, HandlerErr> {
    let gpas = Registrar::new(store).gpas_by_student(&store)?;
    students
        .into_iter()
        .map(|mut s| {
            s.set_gpa(gpas.get(&s.id()).copied().unwrap_or(0.0))?;
            Ok(s)
        })
        .collect()
}

fn handle_students_list(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let Some(conn) = state.db.as_ref() else {
        return Ok(json!({ "students": [] }));
    };
    let store = SqliteStore::new(conn);
    let students = with_current_gpa(store, store.list_students()?)?;
    Ok(json!({ "students": students }))
}

fn handle_students_search(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let name = required_str(req, "name")?;
    let students = with_current_gpa(store, store.search_students(&name)?)?;
    Ok(json!({ "students": students }))
}

fn handle_students_create(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let student = Student::new(
        person_params(req)?,
        required_str(req, "major")?,
        0.0,
    )?;
    let student_id = store.create_student(&student)?;
    Ok(json!({ "studentId": student_id }))
}

fn handle_students_update(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let mut student = store.get_student(required_i64(req, "studentId")?)?;
    apply_person_params(req, student.person_mut())?;
    if let Some(major) = optional_str(req, "major") {
        student.set_major(major)?;
    }
    store.update_student(&student)?;
    Ok(json!({ "ok": true }))
}

fn handle_students_delete(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    store.delete_student(required_i64(req, "studentId")?)?;
    Ok(json!({ "ok": true }))
}

fn handle_students_gpa(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let student_id = required_i64(req, "studentId")?;
    store.get_student(student_id)?;
    let summary = Registrar::new(store).student_gpa_summary(&store, student_id)?;
    Ok(json!({
        "studentId": student_id,
        "gpa": summary.gpa,
        "totalCredits": summary.total_credits,
        "gradedCount": summary.graded_count,
        "ungradedCount": summary.ungraded_count,
    }))
}

fn handle_students_recalculate_gpa(
    state: &AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let store = SqliteStore::new(db_conn(state)?);
    let student_id = required_i64(req, "studentId")?;
    let mut student = store.get_student(student_id)?;
    student.set_gpa(Registrar::new(store).student_gpa(&store, student_id)?)?;
    store.update_student_gpa(student_id, student.gpa())?;
    info!(student_id, gpa = student.gpa(), "gpa recalculated");
    Ok(json!({ "studentId": student_id, "gpa": student.gpa() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "students.list" => handle_students_list(state),
        "students.search" => handle_students_search(state, req),
        "students.create" => handle_students_create(state, req),
        "students.update" => handle_students_update(state, req),
        "students.delete" => handle_students_delete(state, req),
        "students.gpa" => handle_students_gpa(state, req),
        "students.recalculateGpa" => handle_students_recalculate_gpa(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
