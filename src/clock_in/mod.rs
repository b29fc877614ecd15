mod repository;
mod service;

pub use repository::*;
pub use service::*;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Clock-in event as saved on database.
///
/// `registered_at` is truncated to the second at insert time; the pair
/// (user, second) is unique among active records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClockIn {
    pub id: i64,
    pub user_id: i64,
    pub registered_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// One row of the administration history listing.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct ClockInRecord {
    pub id: i64,
    pub name: String,
    pub job_title: Option<String>,
    pub age: Option<i32>,
    pub manager_name: Option<String>,
    pub registered_at: DateTime<Utc>,
}

/// Date-range filter for the history listing. Bounds are inclusive;
/// the end date covers its whole day.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ListFilter {
    /// Lower bound as a timestamp, midnight of `start_date`.
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.start_date
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Upper bound as a timestamp, last second of `end_date`.
    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        self.end_date
            .and_then(|date| date.and_hms_opt(23, 59, 59))
            .map(|naive| naive.and_utc())
    }
}
