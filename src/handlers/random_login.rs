//! `GET /random-login`: fetch, check and summarise one upstream login.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::app::AppState;
use crate::schema::{validate, ExternalLoginShape};
use crate::transform::{to_login_summary, LoginSummary};
use crate::utils::errors::ServiceError;
use crate::{log_info, log_warn};

pub async fn random_login_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<LoginSummary>, ServiceError> {
    process_random_login(&app_state).await.map(Json)
}

/// Fetch → validate → transform. The registration date is checked twice:
/// once by the shape, once when it is reduced to a calendar date.
pub async fn process_random_login(app_state: &AppState) -> Result<LoginSummary, ServiceError> {
    log_info!("RandomLogin", "Fetching random login", "started");
    let document = app_state.source.fetch().await?;

    let record = validate(&ExternalLoginShape, &document).map_err(ServiceError::UpstreamShape)?;
    let summary = to_login_summary(&record).map_err(|e| {
        log_warn!(
            "RandomLogin",
            &format!("Bad registration date: {}", record.registered.date),
            "bad_date"
        );
        ServiceError::from(e)
    })?;

    log_info!("RandomLogin", "Random login served", "success");
    Ok(summary)
}
