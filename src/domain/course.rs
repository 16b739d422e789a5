use serde::Serialize;

use super::{require_id, require_non_blank};
use crate::error::{RegistrarError, Result};

pub const MIN_CREDITS: i64 = 1;
pub const MAX_CREDITS: i64 = 10;

/// Write model for a course. Joined display names live on [`CourseView`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    id: i64,
    name: String,
    description: String,
    credits: i64,
    teacher_id: i64,
    department_id: i64,
}

impl Course {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        description: impl Into<String>,
        credits: i64,
        teacher_id: i64,
        department_id: i64,
    ) -> Result<Self> {
        let course = Self {
            id,
            name: name.into(),
            description: description.into(),
            credits,
            teacher_id,
            department_id,
        };
        course.validate()?;
        Ok(course)
    }

    pub fn validate(&self) -> Result<()> {
        require_id("id", self.id)?;
        require_non_blank("name", &self.name)?;
        require_non_blank("description", &self.description)?;
        check_credits(self.credits)?;
        require_id("teacherId", self.teacher_id)?;
        require_id("departmentId", self.department_id)
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn credits(&self) -> i64 {
        self.credits
    }

    pub fn teacher_id(&self) -> i64 {
        self.teacher_id
    }

    pub fn department_id(&self) -> i64 {
        self.department_id
    }

    pub fn set_credits(&mut self, credits: i64) -> Result<()> {
        check_credits(credits)?;
        self.credits = credits;
        Ok(())
    }

    pub fn set_teacher_id(&mut self, teacher_id: i64) -> Result<()> {
        require_id("teacherId", teacher_id)?;
        self.teacher_id = teacher_id;
        Ok(())
    }
}

fn check_credits(credits: i64) -> Result<()> {
    if !(MIN_CREDITS..=MAX_CREDITS).contains(&credits) {
        return Err(RegistrarError::validation(
            "credits",
            format!("must be between {MIN_CREDITS} and {MAX_CREDITS} (got {credits})"),
        ));
    }
    Ok(())
}

/// Course joined with the teacher and department display names.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseView {
    #[serde(flatten)]
    pub course: Course,
    pub teacher_name: Option<String>,
    pub department_name: Option<String>,
}
