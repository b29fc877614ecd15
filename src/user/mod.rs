mod repository;
mod service;

pub use repository::*;
pub use service::*;

use serde::{Deserialize, Serialize};

/// Access role stored on a user row.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Employee,
}

impl Role {
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    pub fn is_employee(self) -> bool {
        self == Role::Employee
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Employee => write!(f, "employee"),
        }
    }
}

/// User as saved on database.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub created_by: Option<i64>,
    pub name: String,
    pub email: String,
    #[serde(serialize_with = "crate::cpf::serialize_formatted")]
    pub cpf: String,
    #[serde(skip)]
    pub password: String,
    pub job_title: Option<String>,
    pub birth_date: Option<chrono::NaiveDate>,
    pub postal_code: Option<String>,
    pub address: Option<String>,
    pub role: Role,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip)]
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_checks() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Admin.is_employee());
        assert!(Role::Employee.is_employee());
        assert_eq!(Role::default(), Role::Employee);
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
        assert_eq!(
            serde_json::from_str::<Role>(r#""employee""#).unwrap(),
            Role::Employee
        );
    }

    #[test]
    fn test_user_serializes_formatted_cpf_and_hides_password() {
        let user = User {
            cpf: "52998224725".to_owned(),
            password: "secret-hash".to_owned(),
            ..User::default()
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["cpf"], "529.982.247-25");
        assert!(json.get("password").is_none());
    }
}
