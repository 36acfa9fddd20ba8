use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{AdminBooking, Booking, BookingStatus, ProfileSummary};
use crate::services::sync::CacheScope;
use crate::state::AppState;

/// Owner dashboard shape: active work up top, finished work below.
/// Cancelled bookings appear in neither bucket.
#[derive(Debug, Serialize)]
pub struct PartitionedBookings {
    pub upcoming: Vec<Booking>,
    pub completed: Vec<Booking>,
}

pub fn partition(bookings: Vec<Booking>) -> PartitionedBookings {
    let mut upcoming = vec![];
    let mut completed = vec![];

    for booking in bookings {
        match booking.status {
            BookingStatus::Pending | BookingStatus::Confirmed => upcoming.push(booking),
            BookingStatus::Completed => completed.push(booking),
            BookingStatus::Cancelled => {}
        }
    }

    PartitionedBookings {
        upcoming,
        completed,
    }
}

#[derive(Debug, Serialize)]
pub struct BookingStats {
    pub total_bookings: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub completed: i64,
    pub cancelled: i64,
    pub total_revenue: i64,
    pub total_users: i64,
}

/// Revenue counts bookings the business has locked in or already
/// delivered. Pending requests and cancellations contribute nothing.
pub fn compute_stats(bookings: &[Booking], total_users: i64) -> BookingStats {
    let mut stats = BookingStats {
        total_bookings: bookings.len() as i64,
        pending: 0,
        confirmed: 0,
        completed: 0,
        cancelled: 0,
        total_revenue: 0,
        total_users,
    };

    for booking in bookings {
        match booking.status {
            BookingStatus::Pending => stats.pending += 1,
            BookingStatus::Confirmed => {
                stats.confirmed += 1;
                stats.total_revenue += booking.price;
            }
            BookingStatus::Completed => {
                stats.completed += 1;
                stats.total_revenue += booking.price;
            }
            BookingStatus::Cancelled => stats.cancelled += 1,
        }
    }

    stats
}

/// Fallback for the admin list when the joined read fails: attach
/// profile summaries by owner id, producing the same shape the join
/// would have. Owners without a profile row stay None.
pub fn merge_owner_profiles(
    bookings: Vec<Booking>,
    summaries: Vec<(String, ProfileSummary)>,
) -> Vec<AdminBooking> {
    let by_subject: HashMap<String, ProfileSummary> = summaries.into_iter().collect();

    bookings
        .into_iter()
        .map(|booking| {
            let owner = by_subject.get(&booking.owner_id).cloned();
            AdminBooking { booking, owner }
        })
        .collect()
}

// ── Cached view assembly ──

/// One owner's flat booking collection, read through the sync cache.
/// Only the flat set is cached; a cache rebuild replaces it wholesale.
fn owner_bookings(state: &Arc<AppState>, owner_id: &str) -> Result<Vec<Booking>, AppError> {
    let scope = CacheScope::Account(owner_id.to_string());
    if let Some(cached) = state.cache.get(&scope) {
        let bookings: Vec<Booking> =
            serde_json::from_value(cached).map_err(anyhow::Error::from)?;
        return Ok(bookings);
    }

    let bookings = {
        let db = state.db.lock().unwrap();
        queries::get_bookings_for_owner(&db, owner_id)?
    };
    state.cache.put(
        scope,
        serde_json::to_value(&bookings).map_err(anyhow::Error::from)?,
    );
    Ok(bookings)
}

/// One owner's partitioned dashboard. The partition is re-derived on
/// every call, never stored, so it cannot desync from the collection.
pub fn owner_view(state: &Arc<AppState>, owner_id: &str) -> Result<serde_json::Value, AppError> {
    let bookings = owner_bookings(state, owner_id)?;
    serde_json::to_value(partition(bookings)).map_err(|e| anyhow::Error::from(e).into())
}

/// The admin booking list with owner details. Prefers the joined read;
/// if that fails, falls back to two plain reads merged here so the
/// response shape never changes.
pub fn admin_view(state: &Arc<AppState>) -> Result<serde_json::Value, AppError> {
    if let Some(cached) = state.cache.get(&CacheScope::All) {
        return Ok(cached);
    }

    let enriched = {
        let db = state.db.lock().unwrap();
        match queries::get_all_bookings_with_owner(&db) {
            Ok(enriched) => enriched,
            Err(e) => {
                tracing::warn!(error = %e, "joined booking read failed, merging profiles instead");
                let bookings = queries::get_all_bookings(&db)?;
                let mut subjects: Vec<String> =
                    bookings.iter().map(|b| b.owner_id.clone()).collect();
                subjects.sort();
                subjects.dedup();
                let summaries = queries::get_profiles_for_subjects(&db, &subjects)?;
                merge_owner_profiles(bookings, summaries)
            }
        }
    };
    let view = serde_json::to_value(enriched).map_err(anyhow::Error::from)?;

    state.cache.put(CacheScope::All, view.clone());
    Ok(view)
}
