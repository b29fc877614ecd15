//! Employee listing.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::AppState;
use crate::database::Paginated;
use crate::error::Result;
use crate::user::User;

#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    page: Option<i64>,
}

pub async fn handler(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Paginated<User>>> {
    let page = pagination.page.unwrap_or(1).max(1);
    let users = state.users.find_all(page).await?;

    Ok(Json(users))
}
