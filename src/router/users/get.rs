//! Fetch one user by id.

use axum::Json;
use axum::extract::{Path, State};

use crate::AppState;
use crate::error::Result;
use crate::user::User;

pub async fn handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<User>> {
    let user = state.users.find_by_id(user_id).await?;

    Ok(Json(user))
}
