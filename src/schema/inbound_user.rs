//! Shape for user records posted to `POST /users`.

use serde::Serialize;
use serde_json::Value;

use super::checks::{type_name, Checker};
use super::{Shape, ValidationErrors};
use crate::utils::validators::{char_len, is_valid_email};

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 12;
pub const AGE_MIN: u8 = 18;
pub const AGE_MAX: u8 = 100;
/// Applied when `age` is absent.
pub const DEFAULT_AGE: u8 = 28;

/// A validated user record. `age` is always present and `email` is always
/// lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboundUserRecord {
    pub name: String,
    pub age: u8,
    pub email: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InboundUserShape;

impl Shape for InboundUserShape {
    type Output = InboundUserRecord;
    const NAME: &'static str = "inbound_user";

    fn check(&self, input: &Value) -> Result<InboundUserRecord, ValidationErrors> {
        let mut checker = Checker::new();
        let record = checker.object("", Some(input)).and_then(|body| {
            let name = check_name(&mut checker, body.get("name"));
            let age = match body.get("age") {
                None => Some(DEFAULT_AGE),
                Some(value) => check_age(&mut checker, value),
            };
            let email = check_email(&mut checker, body.get("email"));
            Some(InboundUserRecord {
                name: name?,
                age: age?,
                email: email?,
            })
        });
        checker.finish(record)
    }
}

fn check_name(checker: &mut Checker, value: Option<&Value>) -> Option<String> {
    let name = checker.string("name", value)?;
    let len = char_len(name);
    if len < NAME_MIN_LEN {
        checker.fail(
            "name",
            format!("String must contain at least {NAME_MIN_LEN} character(s)"),
        );
        return None;
    }
    if len > NAME_MAX_LEN {
        checker.fail(
            "name",
            format!("String must contain at most {NAME_MAX_LEN} character(s)"),
        );
        return None;
    }
    Some(name.to_string())
}

fn check_age(checker: &mut Checker, value: &Value) -> Option<u8> {
    let Some(age) = value.as_f64() else {
        checker.fail("age", format!("Expected number, received {}", type_name(value)));
        return None;
    };
    if !age.is_finite() || age.fract() != 0.0 {
        checker.fail("age", "Expected integer, received float");
        return None;
    }
    if age < f64::from(AGE_MIN) {
        checker.fail(
            "age",
            format!("Number must be greater than or equal to {AGE_MIN}"),
        );
        return None;
    }
    if age > f64::from(AGE_MAX) {
        checker.fail(
            "age",
            format!("Number must be less than or equal to {AGE_MAX}"),
        );
        return None;
    }
    // In range, so the cast is exact.
    Some(age as u8)
}

fn check_email(checker: &mut Checker, value: Option<&Value>) -> Option<String> {
    let email = checker.string("email", value)?;
    if !is_valid_email(email) {
        checker.fail("email", "Invalid email");
        return None;
    }
    Some(email.to_lowercase())
}
