//! Projections from validated upstream records to public response bodies.

use chrono::Datelike;
use serde::Serialize;
use thiserror::Error;

use crate::schema::{ExternalLoginRecord, ExternalUserRecord};
use crate::utils::dates::parse_timestamp;

/// Body of `GET /random-person`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    pub full_name: String,
    pub country: String,
}

/// Body of `GET /random-login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSummary {
    pub username: String,
    pub registered_date: String,
    pub summary: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    /// The registration date passed the shape check but does not map onto a
    /// `YYYY-MM-DD` calendar date.
    #[error("registration date '{raw}' is not a usable calendar date")]
    InvalidDate { raw: String },
}

pub fn to_person_summary(record: &ExternalUserRecord) -> PersonSummary {
    let name = &record.name;
    PersonSummary {
        full_name: format!("{} {} {}", name.title, name.first, name.last),
        country: record.location.country.clone(),
    }
}

pub fn to_login_summary(record: &ExternalLoginRecord) -> Result<LoginSummary, TransformError> {
    let registered_date = calendar_date(&record.registered.date)?;
    let username = record.login.username.clone();
    let summary = format!("{username} (joined on {registered_date})");
    Ok(LoginSummary {
        username,
        registered_date,
        summary,
    })
}

/// Re-derives the UTC calendar date from the raw string. Years outside
/// 0..=9999 parse but have no four-digit rendering.
fn calendar_date(raw: &str) -> Result<String, TransformError> {
    let invalid = || TransformError::InvalidDate {
        raw: raw.to_string(),
    };
    let date = parse_timestamp(raw).ok_or_else(invalid)?.date_naive();
    if !(0..=9999).contains(&date.year()) {
        return Err(invalid());
    }
    Ok(date.format("%Y-%m-%d").to_string())
}
