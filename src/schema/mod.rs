//! Declarative shape checks for untyped JSON.
//!
//! A shape turns an arbitrary `serde_json::Value` into a typed, normalized
//! record or into the full list of constraint violations found. Validation
//! never panics and never stops at the first problem.

mod checks;
pub mod external;
pub mod inbound_user;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::utils::metrics::record_validation;

pub use external::{ExternalLoginRecord, ExternalLoginShape, ExternalUserRecord, ExternalUserShape};
pub use inbound_user::{InboundUserRecord, InboundUserShape};

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    /// Dotted path to the offending field, e.g. `results.0.name.first`.
    /// Empty for the document root.
    pub path: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Every issue found while validating one input. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("validation failed with {} issue(s)", .issues.len())]
pub struct ValidationErrors {
    issues: Vec<FieldIssue>,
}

impl ValidationErrors {
    /// Wraps a single issue.
    pub fn single(issue: FieldIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// True when some issue sits exactly at `path`.
    pub fn has_issue_at(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }

    pub(crate) fn from_issues(issues: Vec<FieldIssue>) -> Option<Self> {
        if issues.is_empty() {
            None
        } else {
            Some(Self { issues })
        }
    }
}

/// A fixed shape descriptor.
pub trait Shape {
    /// Typed, normalized value produced on success.
    type Output;

    /// Label used in logs and metrics.
    const NAME: &'static str;

    fn check(&self, input: &Value) -> Result<Self::Output, ValidationErrors>;
}

/// Validates `input` against `shape`, recording the outcome in metrics.
pub fn validate<S: Shape>(shape: &S, input: &Value) -> Result<S::Output, ValidationErrors> {
    let result = shape.check(input);
    record_validation(S::NAME, result.is_ok());
    result
}
