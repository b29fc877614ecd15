//! Personnel administration HTTP API.

mod create;
mod delete;
mod get;
mod list;
mod update;

use axum::routing::get;
use axum::{Router, middleware};

use crate::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        // `GET /users` lists, `POST /users` creates.
        .route("/", get(list::handler).post(create::handler))
        // by-id operations.
        .route(
            "/{user_id}",
            get(get::handler).patch(update::handler).delete(delete::handler),
        )
        .route_layer(middleware::from_fn(crate::middleware::require_admin))
        .route_layer(middleware::from_fn_with_state(state, crate::middleware::auth))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode, header};

    use crate::*;

    #[tokio::test]
    async fn test_users_require_authorization() {
        let state = router::state(router::lazy_pool());
        let app = app(state);

        let response =
            make_request(app, Method::GET, "/users", String::default()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_users_reject_garbage_token() {
        let state = router::state(router::lazy_pool());
        let app = app(state);

        use axum::extract::Request;
        use tower::util::ServiceExt;

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/users")
                    .header(header::AUTHORIZATION, "Bearer a.b.c")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
