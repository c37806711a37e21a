use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::bookings::BookingView;
use crate::models::City;
use crate::state::AppState;

const SUMMARY_DAYS: i64 = 10;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub city: Option<City>,
    pub date: Option<NaiveDate>,
    pub q: Option<String>,
    pub limit: Option<i64>,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let limit = query.limit.unwrap_or(200);
    let bookings = {
        let db = state.db.lock().unwrap();
        queries::list_bookings(&db, query.city, query.date, query.q.as_deref(), limit)?
    };

    Ok(Json(bookings.iter().map(BookingView::from).collect()))
}

// GET /api/admin/summary
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDay {
    pub date: String,
    pub counts: BTreeMap<&'static str, i64>,
    pub total: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub start: String,
    pub end: String,
    pub capacity: i64,
    pub days: Vec<SummaryDay>,
    pub city_totals: BTreeMap<&'static str, i64>,
    pub grand_total: i64,
}

/// Capacity summary over the next ten days starting today in the reference
/// timezone, one cell per (date, city).
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SummaryResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let start = state.config.local_now().date_naive();
    let end = start + Duration::days(SUMMARY_DAYS - 1);

    let counts = {
        let db = state.db.lock().unwrap();
        queries::summary_counts(&db, start, end)?
    };

    let mut by_day: BTreeMap<NaiveDate, BTreeMap<&'static str, i64>> = BTreeMap::new();
    for offset in 0..SUMMARY_DAYS {
        let date = start + Duration::days(offset);
        let mut cells = BTreeMap::new();
        for city in City::ALL {
            cells.insert(city.as_str(), 0);
        }
        by_day.insert(date, cells);
    }

    for (date, city, count) in counts {
        if let Some(cells) = by_day.get_mut(&date) {
            cells.insert(city.as_str(), count);
        }
    }

    let mut city_totals: BTreeMap<&'static str, i64> = BTreeMap::new();
    for city in City::ALL {
        city_totals.insert(city.as_str(), 0);
    }

    let mut grand_total = 0;
    let days = by_day
        .into_iter()
        .map(|(date, counts)| {
            let total: i64 = counts.values().sum();
            for (city, count) in &counts {
                *city_totals.entry(*city).or_insert(0) += *count;
            }
            grand_total += total;
            SummaryDay {
                date: date.format("%Y-%m-%d").to_string(),
                counts,
                total,
            }
        })
        .collect();

    Ok(Json(SummaryResponse {
        start: start.format("%Y-%m-%d").to_string(),
        end: end.format("%Y-%m-%d").to_string(),
        capacity: state.config.slot_capacity,
        days,
        city_totals,
        grand_total,
    }))
}
