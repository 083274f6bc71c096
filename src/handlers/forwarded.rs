//! Reports the forwarded-for value the application was allowed to see.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use tracing::instrument;

use crate::error::{AppError, AppResult};
use crate::middleware::X_FORWARDED_FOR;
use crate::models::ForwardedForResponse;
use crate::state::AppState;

/// `GET /` - echo the `X-Forwarded-For` header.
///
/// Only reachable after the gate has forwarded the request, so a present
/// value is one that arrived through a trusted proxy.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the header is not valid UTF-8.
#[instrument(skip_all)]
pub async fn forwarded_for(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<ForwardedForResponse>> {
    let forwarded_for = headers
        .get(X_FORWARDED_FOR)
        .map(|value| {
            value
                .to_str()
                .map(str::to_owned)
                .map_err(|_| AppError::BadRequest("X-Forwarded-For is not valid UTF-8".to_string()))
        })
        .transpose()?
        .filter(|value| !value.is_empty());

    Ok(Json(ForwardedForResponse {
        trusted: state.config.use_proxy && forwarded_for.is_some(),
        forwarded_for,
    }))
}
