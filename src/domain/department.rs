use serde::Serialize;

use super::{require_id, require_non_blank};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    id: i64,
    name: String,
}

impl Department {
    pub fn new(id: i64, name: impl Into<String>) -> Result<Self> {
        let department = Self {
            id,
            name: name.into(),
        };
        department.validate()?;
        Ok(department)
    }

    pub fn validate(&self) -> Result<()> {
        require_id("id", self.id)?;
        require_non_blank("name", &self.name)
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        require_non_blank("name", &name)?;
        self.name = name;
        Ok(())
    }
}
