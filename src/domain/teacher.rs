use serde::Serialize;

use super::{require_id, Person};
use crate::error::{RegistrarError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    #[serde(flatten)]
    person: Person,
    department_id: i64,
    salary: f64,
}

impl Teacher {
    pub fn new(person: Person, department_id: i64, salary: f64) -> Result<Self> {
        let teacher = Self {
            person,
            department_id,
            salary,
        };
        teacher.validate()?;
        Ok(teacher)
    }

    pub fn validate(&self) -> Result<()> {
        self.person.validate()?;
        require_id("departmentId", self.department_id)?;
        check_salary(self.salary)
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn person_mut(&mut self) -> &mut Person {
        &mut self.person
    }

    pub fn id(&self) -> i64 {
        self.person.id()
    }

    pub fn name(&self) -> &str {
        self.person.name()
    }

    pub fn department_id(&self) -> i64 {
        self.department_id
    }

    pub fn salary(&self) -> f64 {
        self.salary
    }

    pub fn set_department_id(&mut self, department_id: i64) -> Result<()> {
        require_id("departmentId", department_id)?;
        self.department_id = department_id;
        Ok(())
    }

    pub fn set_salary(&mut self, salary: f64) -> Result<()> {
        check_salary(salary)?;
        self.salary = salary;
        Ok(())
    }
}

fn check_salary(salary: f64) -> Result<()> {
    if salary.is_nan() || salary < 0.0 {
        return Err(RegistrarError::validation(
            "salary",
            format!("must not be negative (got {salary})"),
        ));
    }
    Ok(())
}

/// Teacher joined with the display name of its department.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherView {
    #[serde(flatten)]
    pub teacher: Teacher,
    pub department_name: Option<String>,
}
