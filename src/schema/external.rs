//! Shapes for documents returned by the random user API.
//!
//! Both shapes expect `{ "results": [ ... ] }` with at least one entry. Every
//! entry is checked, but only the first one is returned.

use serde::Serialize;
use serde_json::Value;

use super::checks::{join, Checker};
use super::{Shape, ValidationErrors};
use crate::utils::validators::is_parseable_date;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonName {
    pub title: String,
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub country: String,
}

/// `results[0]` as seen by `/random-person`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalUserRecord {
    pub name: PersonName,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Login {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// Raw upstream string; guaranteed to parse as a timestamp.
    pub date: String,
}

/// `results[0]` as seen by `/random-login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalLoginRecord {
    pub login: Login,
    pub registered: Registration,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalUserShape;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalLoginShape;

impl Shape for ExternalUserShape {
    type Output = ExternalUserRecord;
    const NAME: &'static str = "external_user";

    fn check(&self, input: &Value) -> Result<ExternalUserRecord, ValidationErrors> {
        let mut checker = Checker::new();
        let first = check_results(&mut checker, input, check_user_entry);
        checker.finish(first)
    }
}

impl Shape for ExternalLoginShape {
    type Output = ExternalLoginRecord;
    const NAME: &'static str = "external_login";

    fn check(&self, input: &Value) -> Result<ExternalLoginRecord, ValidationErrors> {
        let mut checker = Checker::new();
        let first = check_results(&mut checker, input, check_login_entry);
        checker.finish(first)
    }
}

/// Walks `results`, checking every entry with `entry` and keeping the first.
fn check_results<T>(
    checker: &mut Checker,
    input: &Value,
    entry: impl Fn(&mut Checker, &str, &Value) -> Option<T>,
) -> Option<T> {
    let root = checker.object("", Some(input))?;
    let results = checker.array("results", root.get("results"))?;
    if results.is_empty() {
        checker.fail("results", "Array must contain at least 1 element(s)");
        return None;
    }

    let mut first = None;
    for (index, value) in results.iter().enumerate() {
        let parsed = entry(checker, &join("results", &index.to_string()), value);
        if index == 0 {
            first = parsed;
        }
    }
    first
}

fn check_user_entry(checker: &mut Checker, path: &str, value: &Value) -> Option<ExternalUserRecord> {
    let entry = checker.object(path, Some(value))?;

    let name_path = join(path, "name");
    let name = checker.object(&name_path, entry.get("name")).and_then(|name| {
        let title = checker.text_field(name, &name_path, "title");
        let first = checker.text_field(name, &name_path, "first");
        let last = checker.text_field(name, &name_path, "last");
        Some(PersonName {
            title: title?,
            first: first?,
            last: last?,
        })
    });

    let location_path = join(path, "location");
    let location = checker
        .object(&location_path, entry.get("location"))
        .and_then(|location| {
            let country = checker.text_field(location, &location_path, "country");
            Some(Location { country: country? })
        });

    Some(ExternalUserRecord {
        name: name?,
        location: location?,
    })
}

fn check_login_entry(checker: &mut Checker, path: &str, value: &Value) -> Option<ExternalLoginRecord> {
    let entry = checker.object(path, Some(value))?;

    let login_path = join(path, "login");
    let login = checker.object(&login_path, entry.get("login")).and_then(|login| {
        let username = checker.text_field(login, &login_path, "username");
        Some(Login {
            username: username?,
        })
    });

    let registered_path = join(path, "registered");
    let registered = checker
        .object(&registered_path, entry.get("registered"))
        .and_then(|registered| {
            let date_path = join(&registered_path, "date");
            let date = checker.string(&date_path, registered.get("date"))?;
            if !is_parseable_date(date) {
                checker.fail(&date_path, "Invalid date format");
                return None;
            }
            Some(Registration {
                date: date.to_string(),
            })
        });

    Some(ExternalLoginRecord {
        login: login?,
        registered: registered?,
    })
}
