//! Handle database requests.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::clock_in::{ClockIn, ClockInRecord, ListFilter};
use crate::database::Paginated;
use crate::error::{Result, ServerError};

pub const PER_PAGE: i64 = 15;

#[derive(Clone)]
pub struct ClockInRepository {
    pool: Pool<Postgres>,
}

impl ClockInRepository {
    /// Create a new [`ClockInRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a clock-in, truncated to the second.
    ///
    /// The unique index on (user, second) makes this a single atomic
    /// guard: a second registration within the same calendar second
    /// violates it and surfaces as [`ServerError::DuplicateClockIn`].
    pub async fn insert(
        &self,
        user_id: i64,
        registered_at: DateTime<Utc>,
    ) -> Result<ClockIn> {
        let result = sqlx::query_as::<_, ClockIn>(
            r#"INSERT INTO clock_ins (user_id, registered_at)
                VALUES ($1, DATE_TRUNC('second', $2::TIMESTAMPTZ))
                RETURNING *"#,
        )
        .bind(user_id)
        .bind(registered_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(clock_in) => Ok(clock_in),
            Err(err) if is_unique_violation(&err) => {
                tracing::warn!(%user_id, "duplicate clock-in attempt");
                Err(ServerError::DuplicateClockIn { user_id })
            },
            Err(err) => Err(err.into()),
        }
    }

    /// History listing joined with the employee and their manager,
    /// newest first.
    pub async fn find_all(
        &self,
        filter: ListFilter,
        page: i64,
    ) -> Result<Paginated<ClockInRecord>> {
        let starts_at = filter.starts_at();
        let ends_at = filter.ends_at();

        let total: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM clock_ins ci
                WHERE ci.deleted_at IS NULL
                    AND ($1::TIMESTAMPTZ IS NULL OR ci.registered_at >= $1)
                    AND ($2::TIMESTAMPTZ IS NULL OR ci.registered_at <= $2)"#,
        )
        .bind(starts_at)
        .bind(ends_at)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, ClockInRecord>(
            r#"SELECT
                    ci.id,
                    employee.name,
                    employee.job_title,
                    DATE_PART('year', AGE(employee.birth_date))::INT AS age,
                    manager.name AS manager_name,
                    ci.registered_at
                FROM clock_ins ci
                INNER JOIN users employee ON employee.id = ci.user_id
                LEFT JOIN users manager ON manager.id = employee.created_by
                WHERE ci.deleted_at IS NULL
                    AND ($1::TIMESTAMPTZ IS NULL OR ci.registered_at >= $1)
                    AND ($2::TIMESTAMPTZ IS NULL OR ci.registered_at <= $2)
                ORDER BY ci.registered_at DESC
                LIMIT $3 OFFSET $4"#,
        )
        .bind(starts_at)
        .bind(ends_at)
        .bind(PER_PAGE)
        .bind((page - 1) * PER_PAGE)
        .fetch_all(&self.pool)
        .await?;

        Ok(Paginated::new(items, total, page, PER_PAGE))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}
