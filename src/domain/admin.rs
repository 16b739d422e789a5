use serde::Serialize;

use super::{require_non_blank, Person};
use crate::error::{RegistrarError, Result};

const DIGEST_LEN: usize = 64;

fn require_sha256_hex(value: &str) -> Result<()> {
    require_non_blank("password", value)?;
    let is_digest = value.len() == DIGEST_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
    if !is_digest {
        return Err(RegistrarError::validation(
            "password",
            "must be a SHA-256 digest in lowercase hex",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(flatten)]
    person: Person,
    username: String,
    /// SHA-256 hex digest supplied by the caller; never echoed back.
    #[serde(skip_serializing)]
    password: String,
}

impl Admin {
    pub fn new(
        person: Person,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let admin = Self {
            person,
            username: username.into(),
            password: password.into(),
        };
        admin.validate()?;
        Ok(admin)
    }

    pub fn validate(&self) -> Result<()> {
        self.person.validate()?;
        require_non_blank("username", &self.username)?;
        require_sha256_hex(&self.password)
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn set_password(&mut self, password: impl Into<String>) -> Result<()> {
        let password = password.into();
        require_sha256_hex(&password)?;
        self.password = password;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";

    #[test]
    fn username_and_password_are_required() {
        let p = Person::new(0, "Registrar", "office@example.edu", "Male", 35).expect("person");
        assert!(Admin::new(p.clone(), "", DIGEST).is_err());
        assert!(Admin::new(p.clone(), "office", "   ").is_err());

        let admin = Admin::new(p, "office", DIGEST).expect("admin");
        let v = serde_json::to_value(&admin).expect("json");
        assert_eq!(v["username"], "office");
        assert!(v.get("password").is_none());
    }

    #[test]
    fn password_must_be_a_lowercase_sha256_digest() {
        let p = Person::new(0, "Registrar", "office@example.edu", "Male", 35).expect("person");
        let err = Admin::new(p.clone(), "office", "secret").unwrap_err();
        assert_eq!(err.code(), "validation_failed");
        assert!(Admin::new(p.clone(), "office", &DIGEST[..63]).is_err());
        assert!(Admin::new(p.clone(), "office", DIGEST.to_uppercase()).is_err());
        let not_hex = format!("{}g", &DIGEST[..63]);
        assert!(Admin::new(p.clone(), "office", not_hex).is_err());

        let mut admin = Admin::new(p, "office", DIGEST).expect("admin");
        assert!(admin.set_password("hunter2").is_err());
        assert_eq!(admin.password(), DIGEST);
    }
}
