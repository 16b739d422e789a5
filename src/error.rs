use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistrarError {
    #[error("{field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("student {student_id} is already enrolled in course {course_id}")]
    DuplicateEnrollment { student_id: i64, course_id: i64 },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl RegistrarError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Stable error code reported over IPC.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_failed",
            Self::DuplicateEnrollment { .. } => "duplicate_enrollment",
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::Storage(_) => "db_query_failed",
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistrarError>;
