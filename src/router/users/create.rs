use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::router::Valid;
use crate::user::{NewUser, Role, User};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(length(min = 1, max = 255, message = "Name is required."))]
    pub name: String,
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    #[validate(length(
        min = 8,
        max = 255,
        message = "Password must contain at least 8 characters."
    ))]
    pub password: String,
    #[validate(custom(
        function = "crate::router::validate_cpf",
        message = "CPF is not valid."
    ))]
    pub cpf: String,
    #[validate(length(min = 1, max = 100, message = "Job title is required."))]
    pub job_title: String,
    #[validate(custom(
        function = "crate::router::validate_birth_date",
        message = "Birth date must be in the past."
    ))]
    pub birth_date: NaiveDate,
    #[validate(custom(
        function = "crate::router::validate_cep",
        message = "Postal code must contain exactly 8 digits."
    ))]
    pub postal_code: String,
    #[validate(length(min = 1, max = 255, message = "Address is required."))]
    pub address: String,
    #[serde(default)]
    pub role: Role,
}

/// Handler to register an employee (or another administrator).
pub async fn handler(
    State(state): State<AppState>,
    Extension(acting): Extension<User>,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state
        .users
        .create(NewUser {
            name: body.name,
            email: body.email,
            cpf: body.cpf,
            password: body.password,
            job_title: body.job_title,
            birth_date: body.birth_date,
            postal_code: body.postal_code,
            address: body.address,
            role: body.role,
            created_by: Some(acting.id),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> Body {
        Body {
            name: "Maria Souza".into(),
            email: "maria@example.com".into(),
            password: "P$soW%920$n&".into(),
            cpf: "529.982.247-25".into(),
            job_title: "Analyst".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            postal_code: "01001-000".into(),
            address: "Praça da Sé, 100".into(),
            role: Role::Employee,
        }
    }

    #[test]
    fn test_valid_body() {
        assert!(body().validate().is_ok());
    }

    #[test]
    fn test_invalid_cpf_rejected() {
        let mut body = body();
        body.cpf = "11111111111".into();
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_invalid_postal_code_rejected() {
        let mut body = body();
        body.postal_code = "12".into();
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_future_birth_date_rejected() {
        let mut body = body();
        body.birth_date = NaiveDate::from_ymd_opt(2999, 1, 1).unwrap();
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_role_defaults_to_employee() {
        let body: Body = serde_json::from_value(serde_json::json!({
            "name": "Maria Souza",
            "email": "maria@example.com",
            "password": "P$soW%920$n&",
            "cpf": "52998224725",
            "job_title": "Analyst",
            "birth_date": "1990-05-17",
            "postal_code": "01001000",
            "address": "Praça da Sé, 100"
        }))
        .unwrap();

        assert_eq!(body.role, Role::Employee);
    }
}
