use std::sync::Arc;

use chrono::NaiveDate;
use rand::RngCore;
use sqlx::{Pool, Postgres};
use validator::{ValidationError, ValidationErrors};

use crate::cpf;
use crate::crypto::Crypto;
use crate::database::Paginated;
use crate::error::{Result, ServerError};
use crate::user::{Role, User, UserRepository};

/// Fields accepted when registering a user.
#[derive(Clone, Debug, Default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub password: String,
    pub job_title: String,
    pub birth_date: NaiveDate,
    pub postal_code: String,
    pub address: String,
    pub role: Role,
    pub created_by: Option<i64>,
}

/// Fields accepted when updating a user. A missing password keeps the
/// stored hash.
#[derive(Clone, Debug, Default)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub password: Option<String>,
    pub job_title: String,
    pub birth_date: NaiveDate,
    pub postal_code: String,
    pub address: String,
    pub role: Role,
}

/// User manager.
#[derive(Clone)]
pub struct UserService {
    pub repo: UserRepository,
    crypto: Arc<Crypto>,
}

impl UserService {
    /// Create a new [`UserService`].
    pub fn new(pool: Pool<Postgres>, crypto: Arc<Crypto>) -> Self {
        Self {
            repo: UserRepository::new(pool),
            crypto,
        }
    }

    /// Register a user: normalize the CPF, check active-record
    /// uniqueness, hash the password, insert.
    pub async fn create(&self, new: NewUser) -> Result<User> {
        let cpf = cpf::unformat(&new.cpf);

        if self.repo.exists_by_cpf(&cpf, None).await? {
            return Err(field_error("cpf", "This CPF is already in use.").into());
        }
        if self.repo.exists_by_email(&new.email, None).await? {
            return Err(field_error("email", "This email is already in use.").into());
        }

        let user = User {
            created_by: new.created_by,
            name: new.name,
            email: new.email,
            cpf,
            password: self.crypto.hash(&new.password)?,
            job_title: Some(new.job_title),
            birth_date: Some(new.birth_date),
            postal_code: Some(new.postal_code),
            address: Some(new.address),
            role: new.role,
            ..User::default()
        };

        let user = self.repo.insert(&user).await?;
        tracing::info!(user_id = user.id, role = %user.role, "user created");

        Ok(user)
    }

    /// List active employees.
    pub async fn find_all(&self, page: i64) -> Result<Paginated<User>> {
        self.repo.find_all(page).await
    }

    /// Find an active user by id.
    pub async fn find_by_id(&self, user_id: i64) -> Result<User> {
        self.repo.find_by_id(user_id).await
    }

    /// Apply changes to an active user. Uniqueness checks ignore the
    /// updated row itself.
    pub async fn update(&self, user_id: i64, changes: UserChanges) -> Result<User> {
        let mut user = self.repo.find_by_id(user_id).await?;
        let cpf = cpf::unformat(&changes.cpf);

        if self.repo.exists_by_cpf(&cpf, Some(user_id)).await? {
            return Err(field_error("cpf", "This CPF is already in use.").into());
        }
        if self.repo.exists_by_email(&changes.email, Some(user_id)).await? {
            return Err(field_error("email", "This email is already in use.").into());
        }

        user.name = changes.name;
        user.email = changes.email;
        user.cpf = cpf;
        user.job_title = Some(changes.job_title);
        user.birth_date = Some(changes.birth_date);
        user.postal_code = Some(changes.postal_code);
        user.address = Some(changes.address);
        user.role = changes.role;
        if let Some(password) = changes.password {
            user.password = self.crypto.hash(&password)?;
        }

        self.repo.update(&user).await
    }

    /// Soft-delete a user.
    pub async fn delete(&self, user_id: i64) -> Result<()> {
        self.repo.delete(user_id).await?;
        tracing::info!(%user_id, "user deleted");

        Ok(())
    }

    /// Check credentials and issue a refresh token.
    ///
    /// Unknown email and wrong password are indistinguishable to the
    /// caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let user = match self.repo.find_by_email(email).await {
            Ok(user) => user,
            Err(ServerError::NotFound) => return Err(ServerError::Unauthorized),
            Err(err) => return Err(err),
        };

        self.crypto.verify(password, &user.password)?;

        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        let refresh_token = hex::encode(bytes);

        self.repo.insert_token(&refresh_token, user.id, None).await?;

        Ok((user, refresh_token))
    }
}

fn field_error(field: &'static str, message: &'static str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, ValidationError::new(field).with_message(message.into()));
    errors
}
