use rusqlite::Connection;
use serde_json::json;

use crate::domain::Person;
use crate::error::RegistrarError;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};

#[derive(Debug)]
pub(crate) struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn bad_params(message: impl Into<String>) -> Self {
        Self {
            code: "bad_params",
            message: message.into(),
            details: None,
        }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<RegistrarError> for HandlerErr {
    fn from(e: RegistrarError) -> Self {
        let details = match &e {
            RegistrarError::Validation { field, .. } => Some(json!({ "field": field })),
            RegistrarError::DuplicateEnrollment {
                student_id,
                course_id,
            } => Some(json!({ "studentId": student_id, "courseId": course_id })),
            RegistrarError::NotFound { entity, id } => Some(json!({ "entity": entity, "id": id })),
            RegistrarError::Conflict { .. } | RegistrarError::Storage(_) => None,
        };
        Self {
            code: e.code(),
            message: e.to_string(),
            details,
        }
    }
}

pub(crate) fn respond(
    req: &Request,
    result: Result<serde_json::Value, HandlerErr>,
) -> serde_json::Value {
    match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}

pub(crate) fn db_conn(state: &AppState) -> Result<&Connection, HandlerErr> {
    state.db.as_ref().ok_or_else(|| HandlerErr {
        code: "no_workspace",
        message: "select a workspace first".to_string(),
        details: None,
    })
}

pub(crate) fn optional_str(req: &Request, key: &str) -> Option<String> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
}

pub(crate) fn required_str(req: &Request, key: &str) -> Result<String, HandlerErr> {
    optional_str(req, key).ok_or_else(|| HandlerErr::bad_params(format!("missing {key}")))
}

pub(crate) fn optional_i64(req: &Request, key: &str) -> Result<Option<i64>, HandlerErr> {
    match req.params.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => v
            .as_i64()
            .map(Some)
            .ok_or_else(|| HandlerErr::bad_params(format!("{key} must be an integer"))),
    }
}

pub(crate) fn required_i64(req: &Request, key: &str) -> Result<i64, HandlerErr> {
    optional_i64(req, key)?.ok_or_else(|| HandlerErr::bad_params(format!("missing {key}")))
}

pub(crate) fn optional_f64(req: &Request, key: &str) -> Result<Option<f64>, HandlerErr> {
    match req.params.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| HandlerErr::bad_params(format!("{key} must be a number"))),
    }
}

pub(crate) fn required_f64(req: &Request, key: &str) -> Result<f64, HandlerErr> {
    optional_f64(req, key)?.ok_or_else(|| HandlerErr::bad_params(format!("missing {key}")))
}

pub(crate) fn optional_bool(req: &Request, key: &str) -> Result<Option<bool>, HandlerErr> {
    match req.params.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => v
            .as_bool()
            .map(Some)
            .ok_or_else(|| HandlerErr::bad_params(format!("{key} must be a boolean"))),
    }
}

/// Reads `name`, `email`, `gender` and `age` for a new record.
pub(crate) fn person_params(req: &Request) -> Result<Person, HandlerErr> {
    Ok(Person::new(
        0,
        required_str(req, "name")?,
        required_str(req, "email")?,
        required_str(req, "gender")?,
        required_i64(req, "age")?,
    )?)
}

/// Applies whichever person fields are present to an existing record.
pub(crate) fn apply_person_params(req: &Request, person: &mut Person) -> Result<(), HandlerErr> {
    if let Some(v) = optional_str(req, "name") {
        person.set_name(v)?;
    }
    if let Some(v) = optional_str(req, "email") {
        person.set_email(v)?;
    }
    if let Some(v) = optional_str(req, "gender") {
        person.set_gender(v)?;
    }
    if let Some(v) = optional_i64(req, "age")? {
        person.set_age(v)?;
    }
    Ok(())
}
