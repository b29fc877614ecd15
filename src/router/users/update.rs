use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::router::Valid;
use crate::user::{Role, User, UserChanges};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(length(min = 1, max = 255, message = "Name is required."))]
    pub name: String,
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    /// Absent keeps the stored password.
    #[validate(length(
        min = 8,
        max = 255,
        message = "Password must contain at least 8 characters."
    ))]
    pub password: Option<String>,
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

/// Handler to update a user.
pub async fn handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Valid(body): Valid<Body>,
) -> Result<Json<User>> {
    let user = state
        .users
        .update(
            user_id,
            UserChanges {
                name: body.name,
                email: body.email,
                cpf: body.cpf,
                password: body.password,
                job_title: body.job_title,
                birth_date: body.birth_date,
                postal_code: body.postal_code,
                address: body.address,
                role: body.role,
            },
        )
        .await?;

    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_optional() {
        let body = Body {
            name: "Maria Souza".into(),
            email: "maria@example.com".into(),
            password: None,
            cpf: "52998224725".into(),
            job_title: "Analyst".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            postal_code: "01001000".into(),
            address: "Praça da Sé, 100".into(),
            role: Role::Employee,
        };

        assert!(body.validate().is_ok());
    }

    #[test]
    fn test_short_replacement_password_rejected() {
        let body = Body {
            name: "Maria Souza".into(),
            email: "maria@example.com".into(),
            password: Some("short".into()),
            cpf: "52998224725".into(),
            job_title: "Analyst".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            postal_code: "01001000".into(),
            address: "Praça da Sé, 100".into(),
            role: Role::Employee,
        };

        assert!(body.validate().is_err());
    }
}
