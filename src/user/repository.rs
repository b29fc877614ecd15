//! Handle database requests.

use sqlx::{Pool, Postgres};

use crate::database::Paginated;
use crate::error::{Result, ServerError};
use crate::user::{Role, User};

pub const PER_PAGE: i64 = 15;

#[derive(Clone)]
pub struct UserRepository {
    pool: Pool<Postgres>,
}

impl UserRepository {
    /// Create a new [`UserRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert [`User`] into database.
    pub async fn insert(&self, user: &User) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"INSERT INTO users
                (created_by, name, email, cpf, password, job_title, birth_date, postal_code, address, role)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *"#,
        )
        .bind(user.created_by)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.cpf)
        .bind(&user.password)
        .bind(&user.job_title)
        .bind(user.birth_date)
        .bind(&user.postal_code)
        .bind(&user.address)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// List active employees ordered by name.
    pub async fn find_all(&self, page: i64) -> Result<Paginated<User>> {
        let total: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM users WHERE role = $1 AND deleted_at IS NULL"#,
        )
        .bind(Role::Employee)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, User>(
            r#"SELECT * FROM users
                WHERE role = $1 AND deleted_at IS NULL
                ORDER BY name
                LIMIT $2 OFFSET $3"#,
        )
        .bind(Role::Employee)
        .bind(PER_PAGE)
        .bind((page - 1) * PER_PAGE)
        .fetch_all(&self.pool)
        .await?;

        Ok(Paginated::new(items, total, page, PER_PAGE))
    }

    /// Find an active user using `id` field.
    pub async fn find_by_id(&self, user_id: i64) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL"#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find an active user using `email` field.
    pub async fn find_by_email(&self, email: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT * FROM users WHERE email = $1 AND deleted_at IS NULL"#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update an active user.
    pub async fn update(&self, user: &User) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"UPDATE users
                SET name = $1, email = $2, cpf = $3, password = $4, job_title = $5,
                    birth_date = $6, postal_code = $7, address = $8, role = $9,
                    updated_at = NOW()
                WHERE id = $10 AND deleted_at IS NULL
                RETURNING *"#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.cpf)
        .bind(&user.password)
        .bind(&user.job_title)
        .bind(user.birth_date)
        .bind(&user.postal_code)
        .bind(&user.address)
        .bind(user.role)
        .bind(user.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Soft-delete a user.
    pub async fn delete(&self, user_id: i64) -> Result<()> {
        let result = sqlx::query(
            r#"UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL"#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ServerError::NotFound);
        }

        Ok(())
    }

    /// Whether an active user already holds this CPF, optionally ignoring
    /// one row (for updates).
    pub async fn exists_by_cpf(&self, cpf: &str, ignore_user_id: Option<i64>) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS (
                SELECT 1 FROM users
                WHERE cpf = $1 AND deleted_at IS NULL
                    AND ($2::BIGINT IS NULL OR id <> $2)
            )"#,
        )
        .bind(cpf)
        .bind(ignore_user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Whether an active user already holds this email, optionally
    /// ignoring one row (for updates).
    pub async fn exists_by_email(&self, email: &str, ignore_user_id: Option<i64>) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS (
                SELECT 1 FROM users
                WHERE email = $1 AND deleted_at IS NULL
                    AND ($2::BIGINT IS NULL OR id <> $2)
            )"#,
        )
        .bind(email)
        .bind(ignore_user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Insert a refresh token linked to user into database.
    pub async fn insert_token(
        &self,
        token: &str,
        user_id: i64,
        ip: Option<String>,
    ) -> Result<()> {
        sqlx::query(r#"INSERT INTO tokens (token, user_id, ip) VALUES ($1, $2, $3)"#)
            .bind(token)
            .bind(user_id)
            .bind(ip)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
