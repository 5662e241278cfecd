//! Primitive field checks shared by all shapes.

use serde_json::{Map, Value};

use super::{FieldIssue, ValidationErrors};

pub(crate) const REQUIRED: &str = "Required";

/// Appends `key` to a dotted path.
pub(crate) fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// JSON type name as reported in issue messages.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Collects issues while a shape walks its input.
///
/// Each check returns `None` on failure after recording why, so a shape can
/// run every check first and only then combine the results with `?`.
#[derive(Debug, Default)]
pub(crate) struct Checker {
    issues: Vec<FieldIssue>,
}

impl Checker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail(&mut self, path: &str, message: impl Into<String>) {
        self.issues.push(FieldIssue::new(path, message));
    }

    fn expect<'v, T>(
        &mut self,
        path: &str,
        value: Option<&'v Value>,
        expected: &str,
        pick: impl FnOnce(&'v Value) -> Option<T>,
    ) -> Option<T> {
        let Some(value) = value else {
            self.fail(path, REQUIRED);
            return None;
        };
        let picked = pick(value);
        if picked.is_none() {
            self.fail(
                path,
                format!("Expected {expected}, received {}", type_name(value)),
            );
        }
        picked
    }

    pub(crate) fn object<'v>(
        &mut self,
        path: &str,
        value: Option<&'v Value>,
    ) -> Option<&'v Map<String, Value>> {
        self.expect(path, value, "object", Value::as_object)
    }

    pub(crate) fn array<'v>(&mut self, path: &str, value: Option<&'v Value>) -> Option<&'v [Value]> {
        self.expect(path, value, "array", |v| v.as_array().map(Vec::as_slice))
    }

    pub(crate) fn string<'v>(&mut self, path: &str, value: Option<&'v Value>) -> Option<&'v str> {
        self.expect(path, value, "string", Value::as_str)
    }

    pub(crate) fn non_empty_string<'v>(
        &mut self,
        path: &str,
        value: Option<&'v Value>,
    ) -> Option<&'v str> {
        let s = self.string(path, value)?;
        if s.is_empty() {
            self.fail(path, "String must contain at least 1 character(s)");
            return None;
        }
        Some(s)
    }

    /// Checks `map[key]` is a non-empty string, reporting at `parent.key`.
    pub(crate) fn text_field(
        &mut self,
        map: &Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<String> {
        self.non_empty_string(&join(parent, key), map.get(key))
            .map(str::to_string)
    }

    /// Produces the final result. A missing value with no recorded issue
    /// would be a bug in the shape, so it is reported against the root.
    pub(crate) fn finish<T>(self, value: Option<T>) -> Result<T, ValidationErrors> {
        match ValidationErrors::from_issues(self.issues) {
            Some(errors) => Err(errors),
            None => value.ok_or_else(|| ValidationErrors::single(FieldIssue::new("", "Invalid input"))),
        }
    }
}
