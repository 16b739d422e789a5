use serde::Serialize;

use super::{require_id, require_non_blank};
use crate::error::{RegistrarError, Result};

pub const MIN_AGE: i64 = 18;

/// Identity and contact fields shared by students, teachers and admins.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    id: i64,
    name: String,
    email: String,
    gender: String,
    age: i64,
}

impl Person {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
        gender: impl Into<String>,
        age: i64,
    ) -> Result<Self> {
        let person = Self {
            id,
            name: name.into(),
            email: email.into(),
            gender: gender.into(),
            age,
        };
        person.validate()?;
        Ok(person)
    }

    pub fn validate(&self) -> Result<()> {
        require_id("id", self.id)?;
        require_non_blank("name", &self.name)?;
        check_email(&self.email)?;
        require_non_blank("gender", &self.gender)?;
        check_age(self.age)
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn age(&self) -> i64 {
        self.age
    }

    pub fn set_id(&mut self, id: i64) -> Result<()> {
        require_id("id", id)?;
        self.id = id;
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        require_non_blank("name", &name)?;
        self.name = name;
        Ok(())
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<()> {
        let email = email.into();
        check_email(&email)?;
        self.email = email;
        Ok(())
    }

    pub fn set_gender(&mut self, gender: impl Into<String>) -> Result<()> {
        let gender = gender.into();
        require_non_blank("gender", &gender)?;
        self.gender = gender;
        Ok(())
    }

    pub fn set_age(&mut self, age: i64) -> Result<()> {
        check_age(age)?;
        self.age = age;
        Ok(())
    }
}

fn check_email(email: &str) -> Result<()> {
    if !email.contains('@') {
        return Err(RegistrarError::validation("email", "must contain '@'"));
    }
    Ok(())
}

fn check_age(age: i64) -> Result<()> {
    if age < MIN_AGE {
        return Err(RegistrarError::validation(
            "age",
            format!("must be at least {MIN_AGE} (got {age})"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Person {
        Person::new(1, "Lina Haddad", "lina@example.edu", "Female", 20).expect("valid person")
    }

    #[test]
    fn rejects_missing_fields() {
        assert!(Person::new(1, "  ", "a@b", "Male", 20).is_err());
        assert!(Person::new(1, "Sam", "no-at-sign", "Male", 20).is_err());
        assert!(Person::new(1, "Sam", "", "Male", 20).is_err());
        assert!(Person::new(1, "Sam", "s@x", "", 20).is_err());
        assert!(Person::new(-1, "Sam", "s@x", "Male", 20).is_err());
    }

    #[test]
    fn age_boundary() {
        assert!(Person::new(0, "Sam", "s@x", "Male", 17).is_err());
        assert!(Person::new(0, "Sam", "s@x", "Male", 18).is_ok());
    }

    #[test]
    fn failed_setter_leaves_value_unchanged() {
        let mut p = sample();
        let err = p.set_email("broken").unwrap_err();
        assert_eq!(err.code(), "validation_failed");
        assert_eq!(p.email(), "lina@example.edu");

        assert!(p.set_age(12).is_err());
        assert_eq!(p.age(), 20);

        p.set_name("Lina H.").expect("rename");
        assert_eq!(p.name(), "Lina H.");
    }
}
