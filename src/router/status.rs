//! Instance status endpoint.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub name: String,
    pub version: String,
    pub url: String,
}

pub async fn status(State(state): State<AppState>) -> Json<Response> {
    Json(Response {
        name: state.config.name.clone(),
        version: state.config.version().to_owned(),
        url: state.config.url.clone(),
    })
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;

    use super::*;
    use crate::*;

    #[tokio::test]
    async fn test_status_handler() {
        let state = router::state(router::lazy_pool());
        let app = app(state);

        let response =
            make_request(app, Method::GET, "/status.json", String::default()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Response = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.name, "ponto-test");
        assert_eq!(body.url, "http://localhost");
    }
}
