use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::router::Valid;
use crate::user::Role;

pub const TOKEN_TYPE: &str = "Bearer";

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(email(message = "Email must be formatted."))]
    email: String,
    #[validate(length(
        min = 8,
        max = 255,
        message = "Password must contain at least 8 characters."
    ))]
    password: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub token_type: String,
    pub token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub role: Role,
}

/// Handler to exchange credentials for tokens.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<Json<Response>> {
    let (user, refresh_token) = state.users.login(&body.email, &body.password).await?;
    let token = state.token.create(user.id)?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(Response {
        token_type: TOKEN_TYPE.to_owned(),
        token,
        refresh_token,
        expires_in: crate::token::EXPIRATION_TIME,
        role: user.role,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use super::*;
    use crate::*;

    #[test]
    fn test_body_validation() {
        let bad_email = Body {
            email: "not-an-email".into(),
            password: "P$soW%920$n&".into(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = Body {
            email: "admin@example.com".into(),
            password: "short".into(),
        };
        assert!(short_password.validate().is_err());

        let ok = Body {
            email: "admin@example.com".into(),
            password: "P$soW%920$n&".into(),
        };
        assert!(ok.validate().is_ok());
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_body() {
        let state = router::state(router::lazy_pool());
        let app = app(state);

        let response = make_request(
            app,
            Method::POST,
            "/login",
            json!({"email": "not-an-email", "password": "short"}).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
