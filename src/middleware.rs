//! Middlewares for routes.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::Result;
use crate::user::User;
use crate::{AppState, ServerError};

const BEARER: &str = "Bearer ";

/// Resolve the `Authorization` header to an active [`User`] and attach
/// it to the request.
pub async fn auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ServerError::Unauthorized)?;
    let token = token.strip_prefix(BEARER).unwrap_or(token);

    let claims = state.token.decode(token)?;
    let user_id: i64 = claims.sub.parse().map_err(|_| ServerError::Unauthorized)?;

    let user = match state.users.find_by_id(user_id).await {
        Ok(user) => user,
        // token refers to a deleted or unknown user.
        Err(ServerError::NotFound) => return Err(ServerError::Unauthorized),
        Err(err) => return Err(err),
    };

    req.extensions_mut().insert::<User>(user);
    Ok(next.run(req).await)
}

/// Reject requests whose acting user is not an administrator.
pub async fn require_admin(req: Request, next: Next) -> Result<Response> {
    match req.extensions().get::<User>() {
        Some(user) if user.role.is_admin() => Ok(next.run(req).await),
        Some(_) => Err(ServerError::Forbidden),
        None => Err(ServerError::Unauthorized),
    }
}

/// Reject requests whose acting user is not an employee.
pub async fn require_employee(req: Request, next: Next) -> Result<Response> {
    match req.extensions().get::<User>() {
        Some(user) if user.role.is_employee() => Ok(next.run(req).await),
        Some(_) => Err(ServerError::Forbidden),
        None => Err(ServerError::Unauthorized),
    }
}
