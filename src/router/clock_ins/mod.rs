//! Clock-in HTTP API.

mod create;
mod list;

use axum::routing::{get, post};
use axum::{Router, middleware};

use crate::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    // `POST /clock-ins` is the employee action, `GET /clock-ins/history`
    // the administration listing; they carry different role gates.
    let record = Router::new()
        .route("/", post(create::handler))
        .route_layer(middleware::from_fn(crate::middleware::require_employee));
    let history = Router::new()
        .route("/history", get(list::handler))
        .route_layer(middleware::from_fn(crate::middleware::require_admin));

    record
        .merge(history)
        .route_layer(middleware::from_fn_with_state(state, crate::middleware::auth))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use crate::*;

    #[tokio::test]
    async fn test_clock_in_requires_authorization() {
        let state = router::state(router::lazy_pool());
        let app = app(state);

        let response =
            make_request(app, Method::POST, "/clock-ins", String::default()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_history_requires_authorization() {
        let state = router::state(router::lazy_pool());
        let app = app(state);

        let response = make_request(
            app,
            Method::GET,
            "/clock-ins/history",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
