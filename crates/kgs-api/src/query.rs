//! Paths for the metadata API, validated before anything is fetched.

use crate::{ApiError, Result};

const MIN_YEAR: u32 = 2000;

/// Archive listing for a user, optionally narrowed to a year or month.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArchivesQuery {
    pub user: String,
    pub year: Option<u32>,
    pub month: Option<u32>,
}

impl ArchivesQuery {
    pub fn user(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            ..Default::default()
        }
    }

    pub fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn path(&self) -> Result<String> {
        if self.user.is_empty() {
            return Err(ApiError::MissingArgument { field: "user" }.into());
        }
        if !is_valid_user(&self.user) {
            return Err(invalid("user", &self.user));
        }
        let mut path = format!("archives/{}", self.user);
        if let Some(year) = self.year {
            path.push_str(&format!("/{}", check_year(year)?));
        }
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(invalid("month", month));
            }
            if self.year.is_none() {
                return Err(ApiError::MissingArgument { field: "year" }.into());
            }
            path.push_str(&format!("/{month}"));
        }
        Ok(path)
    }
}

/// A letter followed by up to nine letters or digits.
pub fn is_valid_user(user: &str) -> bool {
    let mut chars = user.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && user.len() <= 10
        && chars.all(|c| c.is_ascii_alphanumeric())
}

pub fn tournaments_path(year: Option<u32>) -> Result<String> {
    match year {
        Some(year) => Ok(format!("tournaments/{}", check_year(year)?)),
        None => Ok("tournaments".to_string()),
    }
}

pub fn tournament_path(id: u64) -> Result<String> {
    if id == 0 {
        return Err(invalid("id", id));
    }
    Ok(format!("tournament/{id}"))
}

pub fn entrants_path(id: u64) -> Result<String> {
    Ok(format!("{}/entrants", tournament_path(id)?))
}

pub fn round_path(id: u64, round: u32) -> Result<String> {
    let tournament = tournament_path(id)?;
    if round == 0 {
        return Err(invalid("round", round));
    }
    Ok(format!("{tournament}/round/{round}"))
}

fn check_year(year: u32) -> Result<u32> {
    if year < MIN_YEAR {
        Err(invalid("year", year))
    } else {
        Ok(year)
    }
}

fn invalid(field: &'static str, value: impl ToString) -> crate::Error {
    ApiError::InvalidArgument {
        field,
        value: value.to_string(),
    }
    .into()
}
