//! `GET /random-person`: fetch, check and summarise one upstream user.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::app::AppState;
use crate::schema::{validate, ExternalUserShape};
use crate::transform::{to_person_summary, PersonSummary};
use crate::utils::errors::ServiceError;
use crate::log_info;

pub async fn random_person_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<PersonSummary>, ServiceError> {
    process_random_person(&app_state).await.map(Json)
}

/// Fetch → validate → transform. Every failure is returned, never panicked.
pub async fn process_random_person(app_state: &AppState) -> Result<PersonSummary, ServiceError> {
    log_info!("RandomPerson", "Fetching random person", "started");
    let document = app_state.source.fetch().await?;

    let record = validate(&ExternalUserShape, &document).map_err(ServiceError::UpstreamShape)?;
    let summary = to_person_summary(&record);

    log_info!("RandomPerson", "Random person served", "success");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{sample_upstream_payload, state_with, state_with_document, StubSource};
    use serde_json::json;

    #[tokio::test]
    async fn summarises_first_result() {
        let state = state_with_document(sample_upstream_payload());
        let summary = process_random_person(&state).await.unwrap();
        assert_eq!(summary.full_name, "Ms Sandra Lopez");
        assert_eq!(summary.country, "Spain");
    }

    #[tokio::test]
    async fn fetches_exactly_once() {
        let source = Arc::new(StubSource::document(sample_upstream_payload()));
        let state = state_with(source.clone());
        process_random_person(&state).await.unwrap();
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn empty_results_are_a_shape_error() {
        let state = state_with_document(json!({"results": []}));
        let err = process_random_person(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::UpstreamShape(_)));
    }

    #[tokio::test]
    async fn failed_fetch_is_not_retried() {
        let source = Arc::new(StubSource::status(502));
        let state = state_with(source.clone());
        let err = process_random_person(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::UpstreamFetch(_)));
        assert_eq!(source.calls(), 1);
    }
}
