use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::clock_in::{ClockIn, ClockInRecord, ClockInRepository, ListFilter};
use crate::database::Paginated;
use crate::error::Result;

/// Clock-in manager.
#[derive(Clone)]
pub struct ClockInService {
    pub repo: ClockInRepository,
}

impl ClockInService {
    /// Create a new [`ClockInService`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            repo: ClockInRepository::new(pool),
        }
    }

    /// Register a clock-in for a user at the given instant.
    pub async fn register(
        &self,
        user_id: i64,
        registered_at: DateTime<Utc>,
    ) -> Result<ClockIn> {
        let clock_in = self.repo.insert(user_id, registered_at).await?;
        tracing::info!(
            %user_id,
            registered_at = %clock_in.registered_at,
            "clock-in registered"
        );

        Ok(clock_in)
    }

    /// History listing for administrators.
    pub async fn find_all(
        &self,
        filter: ListFilter,
        page: i64,
    ) -> Result<Paginated<ClockInRecord>> {
        self.repo.find_all(filter, page).await
    }
}
