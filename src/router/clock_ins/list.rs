//! Clock-in history for administrators.

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::AppState;
use crate::clock_in::{ClockInRecord, ListFilter};
use crate::database::Paginated;
use crate::error::Result;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    page: Option<i64>,
}

pub async fn handler(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Paginated<ClockInRecord>>> {
    let filter = ListFilter {
        start_date: query.start_date,
        end_date: query.end_date,
    };
    let page = query.page.unwrap_or(1).max(1);

    let records = state.clock_ins.find_all(filter, page).await?;

    Ok(Json(records))
}
