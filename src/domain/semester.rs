use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::{require_id, require_non_blank};
use crate::error::{RegistrarError, Result};

pub const MIN_YEAR: i64 = 2000;
pub const MAX_YEAR: i64 = 2100;

/// An academic term. Two semesters are the same logical term when their
/// seasons match case-insensitively and their years match; the id is ignored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    id: i64,
    season: String,
    year: i64,
    is_open: bool,
}

impl Semester {
    pub fn new(id: i64, season: impl Into<String>, year: i64, is_open: bool) -> Result<Self> {
        let semester = Self {
            id,
            season: season.into(),
            year,
            is_open,
        };
        semester.validate()?;
        Ok(semester)
    }

    pub fn validate(&self) -> Result<()> {
        require_id("id", self.id)?;
        require_non_blank("season", &self.season)?;
        check_year(self.year)
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn season(&self) -> &str {
        &self.season
    }

    pub fn year(&self) -> i64 {
        self.year
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn set_season(&mut self, season: impl Into<String>) -> Result<()> {
        let season = season.into();
        require_non_blank("season", &season)?;
        self.season = season;
        Ok(())
    }

    pub fn set_year(&mut self, year: i64) -> Result<()> {
        check_year(year)?;
        self.year = year;
        Ok(())
    }

    pub fn set_open(&mut self, is_open: bool) {
        self.is_open = is_open;
    }

    /// True when this semester is the term named by `season` and `year`.
    pub fn is_term(&self, season: &str, year: i64) -> bool {
        self.year == year && self.season.to_lowercase() == season.to_lowercase()
    }
}

fn check_year(year: i64) -> Result<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(RegistrarError::validation(
            "year",
            format!("must be between {MIN_YEAR} and {MAX_YEAR} (got {year})"),
        ));
    }
    Ok(())
}

impl PartialEq for Semester {
    fn eq(&self, other: &Self) -> bool {
        self.is_term(&other.season, other.year)
    }
}

impl Eq for Semester {}

impl Hash for Semester {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.season.to_lowercase().hash(state);
        self.year.hash(state);
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season, self.year)
    }
}
