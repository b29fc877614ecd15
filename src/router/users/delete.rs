//! Soft-delete a user.

use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::AppState;
use crate::error::Result;

pub async fn handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode> {
    state.users.delete(user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
