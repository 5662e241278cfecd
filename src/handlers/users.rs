//! `POST /users`: validate and echo a user record.

use axum::{body::Bytes, http::StatusCode, Json};
use serde_json::Value;

use crate::schema::{validate, FieldIssue, InboundUserRecord, InboundUserShape, ValidationErrors};
use crate::utils::errors::ServiceError;
use crate::log_info;

/// Takes the raw body so that malformed JSON gets the same error contract as
/// a failed shape check.
pub async fn create_user_handler(
    body: Bytes,
) -> Result<(StatusCode, Json<InboundUserRecord>), ServiceError> {
    let record = process_new_user(&body)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Parses and validates one inbound user. No I/O.
pub fn process_new_user(body: &[u8]) -> Result<InboundUserRecord, ServiceError> {
    let input: Value = serde_json::from_slice(body).map_err(|e| {
        ServiceError::ClientInput(ValidationErrors::single(FieldIssue::new(
            "",
            format!("Malformed JSON body: {e}"),
        )))
    })?;

    let record = validate(&InboundUserShape, &input).map_err(ServiceError::ClientInput)?;
    log_info!("CreateUser", "User record accepted", "success");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_normalizes_valid_body() {
        let record =
            process_new_user(br#"{"name":"Alice","age":30,"email":"SanDra@test.com"}"#).unwrap();
        assert_eq!(record.email, "sandra@test.com");
        assert_eq!(record.age, 30);
    }

    #[test]
    fn malformed_json_is_client_input_error() {
        let err = process_new_user(b"{not json").unwrap_err();
        match err {
            ServiceError::ClientInput(details) => {
                assert!(details.has_issue_at(""));
                assert!(details.issues()[0].message.starts_with("Malformed JSON body"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_body_is_client_input_error() {
        assert!(matches!(
            process_new_user(b""),
            Err(ServiceError::ClientInput(_))
        ));
    }

    #[test]
    fn shape_failures_are_client_input_errors() {
        let err = process_new_user(br#"{"name":"Al","email":"bad"}"#).unwrap_err();
        match err {
            ServiceError::ClientInput(details) => {
                assert!(details.has_issue_at("name"));
                assert!(details.has_issue_at("email"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
