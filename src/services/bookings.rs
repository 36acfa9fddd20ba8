use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus};
use crate::services::auth::{self, Action, Identity};
use crate::services::sync;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewBookingRequest {
    pub service_id: String,
    pub pet_name: String,
    pub pet_type: String,
    pub pet_breed: Option<String>,
    pub booking_date: String,
    pub booking_time: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Wall-clock time at the cafe. Dates and times on bookings are naive
/// and business-local, so the in-the-past check has to happen in that
/// frame, not in UTC.
fn business_now(tz_offset_minutes: i32) -> NaiveDateTime {
    match FixedOffset::east_opt(tz_offset_minutes * 60) {
        Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
        None => Utc::now().naive_utc(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The target row is gone, but its id may still sit in cached views.
/// Drop every cached view so the next read rebuilds from the store.
fn prune_and_not_found(state: &Arc<AppState>, id: &str) -> AppError {
    state.cache.clear();
    AppError::NotFound(format!("booking {id}"))
}

pub fn create(
    state: &Arc<AppState>,
    identity: &Identity,
    req: NewBookingRequest,
) -> Result<Booking, AppError> {
    let service_id = req.service_id.trim();
    let pet_name = req.pet_name.trim();
    let pet_type = req.pet_type.trim();

    if service_id.is_empty() {
        return Err(AppError::Validation("service_id is required".to_string()));
    }
    if pet_name.is_empty() {
        return Err(AppError::Validation("pet_name is required".to_string()));
    }
    if pet_type.is_empty() {
        return Err(AppError::Validation("pet_type is required".to_string()));
    }

    let booking_date = NaiveDate::parse_from_str(req.booking_date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation("booking_date must be YYYY-MM-DD".to_string()))?;
    let booking_time = NaiveTime::parse_from_str(req.booking_time.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(req.booking_time.trim(), "%H:%M:%S"))
        .map_err(|_| AppError::Validation("booking_time must be HH:MM".to_string()))?;

    // Only the calendar date is checked; a slot earlier today still
    // books.
    if booking_date < business_now(state.config.tz_offset_minutes).date() {
        return Err(AppError::Validation(
            "booking_date must not be in the past".to_string(),
        ));
    }

    let service = {
        let db = state.db.lock().unwrap();
        queries::get_service_by_id(&db, service_id)?
    }
    .ok_or_else(|| AppError::Validation(format!("unknown service: {service_id}")))?;
    if !service.is_active {
        return Err(AppError::Validation(format!(
            "service is not bookable: {}",
            service.name
        )));
    }

    // Name and price are copied onto the booking so later catalog edits
    // never rewrite what the customer agreed to.
    let now = Utc::now().naive_utc();
    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        owner_id: identity.subject_id.clone(),
        service_name: service.name,
        price: service.price,
        pet_name: pet_name.to_string(),
        pet_type: pet_type.to_string(),
        pet_breed: non_empty(req.pet_breed),
        booking_date,
        booking_time,
        status: BookingStatus::Pending,
        phone: non_empty(req.phone).or_else(|| identity.phone.clone()),
        notes: non_empty(req.notes),
        created_at: now,
        updated_at: now,
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_booking(&db, &booking)?;
    }
    sync::publish_change(state, &booking.owner_id);

    Ok(booking)
}

/// Step a booking one stage forward along pending, confirmed,
/// completed, then back around to pending. Cancelled bookings are a
/// dead end and advancing one is a conflict, never a silent no-op.
pub fn advance(state: &Arc<AppState>, id: &str) -> Result<Booking, AppError> {
    let (owner_id, updated) = {
        let db = state.db.lock().unwrap();
        let booking =
            queries::get_booking_by_id(&db, id)?.ok_or_else(|| prune_and_not_found(state, id))?;

        let next = booking.status.advanced().ok_or_else(|| {
            AppError::Conflict(format!(
                "cannot advance a {} booking",
                booking.status.as_str()
            ))
        })?;

        queries::update_booking_status(&db, id, next)?;
        let updated = queries::get_booking_by_id(&db, id)?
            .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;
        (booking.owner_id, updated)
    };
    sync::publish_change(state, &owner_id);

    Ok(updated)
}

pub fn cancel(state: &Arc<AppState>, subject_id: &str, id: &str) -> Result<Booking, AppError> {
    let (owner_id, updated) = {
        let db = state.db.lock().unwrap();
        let booking =
            queries::get_booking_by_id(&db, id)?.ok_or_else(|| prune_and_not_found(state, id))?;

        auth::authorize(
            &db,
            subject_id,
            &Action::CancelBooking {
                owner_id: booking.owner_id.clone(),
            },
        )?;

        if !booking.status.cancellable() {
            return Err(AppError::Conflict(format!(
                "cannot cancel a {} booking",
                booking.status.as_str()
            )));
        }

        queries::update_booking_status(&db, id, BookingStatus::Cancelled)?;
        let updated = queries::get_booking_by_id(&db, id)?
            .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;
        (booking.owner_id, updated)
    };
    sync::publish_change(state, &owner_id);

    Ok(updated)
}

pub fn delete(state: &Arc<AppState>, id: &str) -> Result<(), AppError> {
    let owner_id = {
        let db = state.db.lock().unwrap();
        let booking =
            queries::get_booking_by_id(&db, id)?.ok_or_else(|| prune_and_not_found(state, id))?;
        queries::delete_booking(&db, id)?;
        booking.owner_id
    };
    sync::publish_change(state, &owner_id);

    Ok(())
}
