use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::AppState;
use crate::clock_in::ClockIn;
use crate::error::Result;
use crate::user::User;

/// Handler to register a clock-in for the acting employee, now.
///
/// A second submission within the same calendar second is rejected with
/// a conflict; it is not merged or retried.
pub async fn handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<(StatusCode, Json<ClockIn>)> {
    let clock_in = state.clock_ins.register(user.id, Utc::now()).await?;

    Ok((StatusCode::CREATED, Json(clock_in)))
}
