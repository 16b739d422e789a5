use serde::Serialize;

use super::{require_non_blank, Person};
use crate::error::{RegistrarError, Result};

pub const MAX_GPA: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(flatten)]
    person: Person,
    major: String,
    /// Cached display value. The GPA engine recomputes it on every load.
    gpa: f64,
}

impl Student {
    pub fn new(person: Person, major: impl Into<String>, gpa: f64) -> Result<Self> {
        let student = Self {
            person,
            major: major.into(),
            gpa,
        };
        student.validate()?;
        Ok(student)
    }

    pub fn validate(&self) -> Result<()> {
        self.person.validate()?;
        require_non_blank("major", &self.major)?;
        check_gpa(self.gpa)
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

    pub fn major(&self) -> &str {
        &self.major
    }

    pub fn gpa(&self) -> f64 {
        self.gpa
    }

    pub fn set_major(&mut self, major: impl Into<String>) -> Result<()> {
        let major = major.into();
        require_non_blank("major", &major)?;
        self.major = major;
        Ok(())
    }

    pub fn set_gpa(&mut self, gpa: f64) -> Result<()> {
        check_gpa(gpa)?;
        self.gpa = gpa;
        Ok(())
    }
}

fn check_gpa(gpa: f64) -> Result<()> {
    if !(0.0..=MAX_GPA).contains(&gpa) {
        return Err(RegistrarError::validation(
            "gpa",
            format!("must be between 0.0 and {MAX_GPA:.1} (got {gpa})"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> Person {
        Person::new(3, "Omar Saleh", "omar@example.edu", "Male", 22).expect("person")
    }

    #[test]
    fn gpa_range_is_inclusive() {
        assert!(Student::new(person(), "Physics", 0.0).is_ok());
        assert!(Student::new(person(), "Physics", 4.0).is_ok());
        assert!(Student::new(person(), "Physics", 4.01).is_err());
        assert!(Student::new(person(), "Physics", -0.5).is_err());
        assert!(Student::new(person(), "Physics", f64::NAN).is_err());
    }

    #[test]
    fn major_is_required() {
        assert!(Student::new(person(), " ", 1.0).is_err());
        let mut s = Student::new(person(), "Physics", 1.0).expect("student");
        assert!(s.set_major("").is_err());
        assert_eq!(s.major(), "Physics");
    }

    #[test]
    fn serializes_person_fields_flat() {
        let s = Student::new(person(), "Physics", 3.25).expect("student");
        let v = serde_json::to_value(&s).expect("json");
        assert_eq!(v["id"], 3);
        assert_eq!(v["name"], "Omar Saleh");
        assert_eq!(v["major"], "Physics");
        assert_eq!(v["gpa"], 3.25);
    }
}
